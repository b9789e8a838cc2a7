// Per-user configuration: `<user config dir>/blog-tool/config.json`.
//
// The file holds the GitHub identity and the defaults used by `push`. A
// missing, corrupt or token-less file is never fatal: the store falls back
// to the interactive first-run flow and writes a fresh file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::ui::Prompter;

/// Directory created under the user config dir.
pub const APP_DIR: &str = "blog-tool";
/// File name inside [`APP_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Persisted configuration. Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Repository name, without the owner.
    #[serde(rename = "repo")]
    pub repository: String,
    /// Personal access token.
    #[serde(rename = "token")]
    pub access_token: String,
    /// GitHub username, also the repository owner.
    pub username: String,
    pub default_branch: String,
    /// Directory prefix inside the repository, e.g. `/posts/`.
    pub default_path: String,
}

impl Configuration {
    /// Render as JSON indented with four spaces, the on-disk format.
    pub fn to_pretty_json(&self) -> Result<String, ConfigError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(ConfigError::Encode)?;
        // serde_json only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Path of the config file for the current user.
///
/// When the platform has no notion of a user config dir a warning is printed
/// and the path is resolved relative to the working directory instead.
pub fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR).join(CONFIG_FILE),
        None => {
            println!("Couldn't get user config path, falling back to ./{APP_DIR}/{CONFIG_FILE}");
            warn!("no user config directory available on this platform");
            PathBuf::from(APP_DIR).join(CONFIG_FILE)
        }
    }
}

/// Reads and writes the configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Store at [`default_config_path`].
    pub fn open_default() -> Self {
        Self::new(default_config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the file without any fallback.
    pub fn read(&self) -> Result<Configuration, ConfigError> {
        let raw = fs::read(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(ConfigError::Decode)
    }

    /// Load the configuration, running the interactive flow when the file is
    /// missing, corrupt or has an empty token. The flow runs at most once.
    pub fn load(&self, prompter: &mut dyn Prompter) -> Result<Configuration, ConfigError> {
        match self.read() {
            Ok(config) if !config.access_token.is_empty() => {
                debug!(path = %self.path.display(), "loaded configuration");
                Ok(config)
            }
            Ok(_) => {
                println!("Config file has no token. Let's create a new one.");
                self.create_interactive(prompter)
            }
            Err(ConfigError::Read { source, .. }) => {
                debug!(error = %source, "config file not readable");
                println!("Looks like this is your first time. Let's create a config file.");
                self.create_interactive(prompter)
            }
            Err(err) => {
                println!("{err}\nLet's create a new one.");
                self.create_interactive(prompter)
            }
        }
    }

    /// Ask for every field in turn and save the result.
    ///
    /// A failed save is reported but the answers are still returned, so the
    /// current invocation can go on with them.
    pub fn create_interactive(
        &self,
        prompter: &mut dyn Prompter,
    ) -> Result<Configuration, ConfigError> {
        let username = prompter.text("Github username")?;
        let repository = prompter.text("Repo name")?;
        println!(
            "Github Personal Token (can be created at https://github.com/settings/tokens \
             [make sure repo permissions are given])"
        );
        let access_token = prompter.secret("Token")?;
        let default_branch = prompter.text("Default branch to use")?;
        let default_path = prompter.text("Default directory to use (For root use '/')")?;

        let config = Configuration {
            repository,
            access_token,
            username,
            default_branch,
            default_path,
        };

        if let Err(err) = self.save(&config) {
            println!("{err}");
            warn!(error = %err, "configuration kept in memory only");
        }
        Ok(config)
    }

    /// Write `config` as indented JSON, creating the parent directory.
    pub fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let data = config.to_pretty_json()?;
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent).map_err(write_err)?;
        }
        write_file(&self.path, data.as_bytes()).map_err(write_err)?;
        debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    /// Load the configuration and render it for display.
    pub fn show(&self, prompter: &mut dyn Prompter) -> Result<String, ConfigError> {
        self.load(prompter)?.to_pretty_json()
    }

    /// Delete the config file. With `recreate`, run the interactive flow
    /// right after and return its result.
    pub fn reset(
        &self,
        recreate: bool,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Configuration>, ConfigError> {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed config file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(error = %err, "couldn't remove config file"),
        }
        if recreate {
            return self.create_interactive(prompter).map(Some);
        }
        Ok(None)
    }
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)?.write_all(data)
}
