// `push`: upload one local file through the Contents API.
//
// Flags given on the command line win over the stored configuration; the
// resolved values live only for this invocation and are never saved.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, warn};

use crate::api::{ApiResponse, ContentsApi, Credentials, PushRequest};
use crate::config::Configuration;
use crate::error::PushError;
use crate::ui;

/// Highest status code still treated as success.
///
/// Deliberately not `< 300`: a 251..=299 answer counts as a failure.
pub const SUCCESS_THRESHOLD: u16 = 250;

/// Command line overrides for one push. `None` means "use the stored default".
#[derive(Debug, Clone, Default)]
pub struct PushArgs {
    pub repository: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub remote_path: Option<String>,
    pub branch: Option<String>,
    pub sha: Option<String>,
    pub message: Option<String>,
    pub file: PathBuf,
}

/// A value that was not given on the command line and got filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Branch,
    Path,
    Message(String),
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Branch => write!(f, "Using default branch"),
            Fallback::Path => write!(f, "Path not provided, using default directory..."),
            Fallback::Message(name) => write!(f, "Message not provided. Using {name}"),
        }
    }
}

/// Effective parameters of a push, before the file is read.
#[derive(Debug, Clone)]
pub struct ResolvedPush {
    pub credentials: Credentials,
    pub repository: String,
    /// Request with an empty `content_base64`.
    pub request: PushRequest,
    pub fallbacks: Vec<Fallback>,
}

fn given(flag: &Option<String>) -> Option<&str> {
    flag.as_deref().filter(|v| !v.is_empty())
}

fn base_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

/// Merge the overrides in `args` with the stored `config`.
pub fn resolve(args: &PushArgs, config: &Configuration) -> ResolvedPush {
    let mut fallbacks = Vec::new();
    let name = base_name(&args.file);

    let repository = given(&args.repository).unwrap_or(&config.repository);
    let username = given(&args.username).unwrap_or(&config.username);
    let token = given(&args.token).unwrap_or(&config.access_token);

    let branch = match given(&args.branch) {
        Some(branch) => branch.to_string(),
        None => {
            fallbacks.push(Fallback::Branch);
            config.default_branch.clone()
        }
    };
    let remote_path = match given(&args.remote_path) {
        Some(path) => path.to_string(),
        None => {
            fallbacks.push(Fallback::Path);
            format!("{}{}", config.default_path, name)
        }
    };
    let message = match given(&args.message) {
        Some(message) => message.to_string(),
        None => {
            fallbacks.push(Fallback::Message(name.clone()));
            name
        }
    };

    ResolvedPush {
        credentials: Credentials {
            username: username.to_string(),
            token: token.to_string(),
        },
        repository: repository.to_string(),
        request: PushRequest {
            message,
            content_base64: String::new(),
            blob_sha: given(&args.sha).map(str::to_string),
            branch: Some(branch).filter(|b| !b.is_empty()),
            remote_path,
        },
        fallbacks,
    }
}

/// Standard padded base64, no line wrapping.
pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Map a response to the outcome of the push.
pub fn check_status(response: ApiResponse) -> Result<(), PushError> {
    if response.status > SUCCESS_THRESHOLD {
        return Err(PushError::Remote {
            status: response.status,
            body: response.body,
        });
    }
    Ok(())
}

/// Resolve, read, encode and upload. The file is read before any request
/// is made, so a missing file never reaches the network.
pub fn run(args: &PushArgs, config: &Configuration, api: &dyn ContentsApi) -> Result<(), PushError> {
    let ResolvedPush {
        credentials,
        repository,
        mut request,
        fallbacks,
    } = resolve(args, config);
    for fallback in &fallbacks {
        println!("{fallback}");
    }

    let bytes = fs::read(&args.file).map_err(|source| PushError::FileRead {
        path: args.file.clone(),
        source,
    })?;
    debug!(file = %args.file.display(), bytes = bytes.len(), "read local file");
    request.content_base64 = encode_content(&bytes);

    // A serialization failure is reported and the request still goes out.
    let body = match serde_json::to_vec(&request) {
        Ok(body) => body,
        Err(err) => {
            println!("couldn't form request, {err}");
            warn!(error = %err, "sending request without a body");
            Vec::new()
        }
    };

    let spinner = ui::spinner("Uploading...");
    let response = api.put_file(&credentials, &repository, &request.remote_path, body);
    spinner.finish_and_clear();

    check_status(response?)
}
