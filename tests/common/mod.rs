//! Shared test fixtures and helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sync_auth::config::AuthConfig;

/// Client-secret file with the out-of-band redirect and no endpoints.
pub const OOB_CLIENT_SECRET: &str = r#"{"web":{"client_id":"abc","client_secret":"xyz","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#;

/// Create a scratch dir holding a client-secret file with `content`.
pub fn temp_client_secret(content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let path = tmp.path().join("client_secret.json");
    std::fs::write(&path, content).unwrap();
    (tmp, path)
}

/// Config pointing the token endpoint at a mock server and storage into `dir`.
pub fn test_config(dir: &Path, server_url: &str) -> AuthConfig {
    AuthConfig {
        storage_file: dir.join("auth.json"),
        token_uri: format!("{}/token", server_url),
        ..AuthConfig::default()
    }
}

/// A successful token-endpoint answer carrying `refresh_token`.
pub fn token_body(refresh_token: &str) -> String {
    format!(
        r#"{{"access_token":"ya29.access","expires_in":3599,"refresh_token":"{}","scope":"https://www.googleapis.com/auth/drive","token_type":"Bearer"}}"#,
        refresh_token
    )
}

/// Any free loopback port. Racy in theory, fine for tests.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
