use std::cell::RefCell;
use std::fs;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use blog_tool::api::{ApiResponse, ContentsApi, Credentials};
use blog_tool::config::Configuration;
use blog_tool::error::PushError;
use blog_tool::push::{self, PushArgs};
use tempfile::tempdir;

struct Call {
    username: String,
    token: String,
    repository: String,
    remote_path: String,
    body: serde_json::Value,
}

/// Records every request and answers with a fixed status.
struct FakeApi {
    status: u16,
    body: &'static str,
    calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    fn answering(status: u16, body: &'static str) -> Self {
        FakeApi {
            status,
            body,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ContentsApi for FakeApi {
    fn put_file(
        &self,
        credentials: &Credentials,
        repository: &str,
        remote_path: &str,
        body: Vec<u8>,
    ) -> Result<ApiResponse, PushError> {
        self.calls.borrow_mut().push(Call {
            username: credentials.username.clone(),
            token: credentials.token.clone(),
            repository: repository.to_string(),
            remote_path: remote_path.to_string(),
            body: serde_json::from_slice(&body).unwrap(),
        });
        Ok(ApiResponse {
            status: self.status,
            body: self.body.to_string(),
        })
    }
}

fn config() -> Configuration {
    Configuration {
        repository: "blog".into(),
        access_token: "stored-token".into(),
        username: "octocat".into(),
        default_branch: "main".into(),
        default_path: "/posts/".into(),
    }
}

#[test]
fn created_file_is_success_and_body_carries_content() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("hello.md");
    fs::write(&file, b"# Hello\n\xff\x00").unwrap();

    let api = FakeApi::answering(201, "{}");
    let args = PushArgs {
        file: file.clone(),
        ..PushArgs::default()
    };
    push::run(&args, &config(), &api).unwrap();

    let calls = api.calls.borrow();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.username, "octocat");
    assert_eq!(call.token, "stored-token");
    assert_eq!(call.repository, "blog");
    assert_eq!(call.remote_path, "/posts/hello.md");
    assert_eq!(call.body["message"], "hello.md");
    assert_eq!(call.body["branch"], "main");
    assert!(call.body.get("sha").is_none());
    assert!(call.body.get("remote_path").is_none());

    let content = call.body["content"].as_str().unwrap();
    assert_eq!(STANDARD.decode(content).unwrap(), b"# Hello\n\xff\x00");
}

#[test]
fn overrides_reach_the_request_and_leave_config_untouched() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("x.md");
    fs::write(&file, "x").unwrap();

    let api = FakeApi::answering(200, "{}");
    let stored = config();
    let args = PushArgs {
        repository: Some("notes".into()),
        username: Some("hubot".into()),
        token: Some("cli-token".into()),
        remote_path: Some("/drafts/x.md".into()),
        branch: Some("dev".into()),
        sha: Some("95b966ae1c166bd92f8ae7d1c313e738c731dfc3".into()),
        message: Some("update x".into()),
        file,
    };
    push::run(&args, &stored, &api).unwrap();

    let calls = api.calls.borrow();
    let call = &calls[0];
    assert_eq!(call.username, "hubot");
    assert_eq!(call.token, "cli-token");
    assert_eq!(call.repository, "notes");
    assert_eq!(call.remote_path, "/drafts/x.md");
    assert_eq!(call.body["branch"], "dev");
    assert_eq!(call.body["sha"], "95b966ae1c166bd92f8ae7d1c313e738c731dfc3");
    assert_eq!(call.body["message"], "update x");
    assert_eq!(stored, config());
}

#[test]
fn missing_file_never_hits_the_network() {
    let dir = tempdir().unwrap();
    let api = FakeApi::answering(201, "{}");
    let args = PushArgs {
        file: dir.path().join("nope.md"),
        ..PushArgs::default()
    };

    let err = push::run(&args, &config(), &api).unwrap_err();
    assert!(matches!(err, PushError::FileRead { .. }));
    assert!(api.calls.borrow().is_empty());
}

#[test]
fn not_found_is_failure_with_body() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.md");
    fs::write(&file, "a").unwrap();

    let body = r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#;
    let api = FakeApi::answering(404, body);
    let args = PushArgs {
        file,
        ..PushArgs::default()
    };

    match push::run(&args, &config(), &api) {
        Err(err @ PushError::Remote { status: 404, .. }) => {
            assert_eq!(err.to_string(), format!("error received from github, {body}"));
        }
        other => panic!("expected 404 failure, got {other:?}"),
    }
}

#[test]
fn status_just_above_threshold_fails() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.md");
    fs::write(&file, "a").unwrap();

    let api = FakeApi::answering(251, "odd");
    let args = PushArgs {
        file,
        ..PushArgs::default()
    };
    assert!(matches!(
        push::run(&args, &config(), &api),
        Err(PushError::Remote { status: 251, .. })
    ));
    assert_eq!(api.calls.borrow().len(), 1);
}
