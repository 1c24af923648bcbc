//! Client credentials as downloaded from the provider's developer console.

use serde::Deserialize;
use std::path::Path;

use crate::error::BootstrapError;

/// The `web` section of the client-secret file.
#[derive(Debug, Clone, Deserialize)]
struct WebSection {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    web: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: Option<String>,
    pub token_uri: Option<String>,
}

impl ClientCredentials {
    /// Parse a client-secret document. It must carry a `web` object with a
    /// non-empty id, secret and at least one redirect URI.
    pub fn parse(content: &[u8]) -> Result<Self, BootstrapError> {
        let file: ClientSecretFile = serde_json::from_slice(content)
            .map_err(|e| BootstrapError::malformed(format!("invalid JSON: {}", e)))?;
        let web = match file.web {
            Some(v @ serde_json::Value::Object(_)) => v,
            Some(_) => return Err(BootstrapError::malformed("`web` is not an object")),
            None => return Err(BootstrapError::malformed("no `web` section")),
        };
        let web: WebSection = serde_json::from_value(web)
            .map_err(|e| BootstrapError::malformed(format!("bad `web` section: {}", e)))?;

        if web.client_id.trim().is_empty() {
            return Err(BootstrapError::malformed("missing `web.client_id`"));
        }
        if web.client_secret.trim().is_empty() {
            return Err(BootstrapError::malformed("missing `web.client_secret`"));
        }
        let redirect_uri = web
            .redirect_uris
            .into_iter()
            .next()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| BootstrapError::malformed("`web.redirect_uris` is empty"))?;

        Ok(Self {
            client_id: web.client_id,
            client_secret: web.client_secret,
            redirect_uri,
            auth_uri: web.auth_uri.filter(|u| !u.is_empty()),
            token_uri: web.token_uri.filter(|u| !u.is_empty()),
        })
    }
}

/// Read and parse the credentials file at `path`.
pub fn load(path: &Path) -> Result<ClientCredentials, BootstrapError> {
    let content = std::fs::read(path).map_err(|source| BootstrapError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(BootstrapError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let credentials = ClientCredentials::parse(&content)?;
    tracing::debug!(
        path = %path.display(),
        client_id = %credentials.client_id,
        redirect_uri = %credentials.redirect_uri,
        "loaded client credentials"
    );
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWNLOADED: &str = r#"{
  "web": {
    "client_id": "123.apps.googleusercontent.com",
    "project_id": "sync-project",
    "auth_uri": "https://accounts.google.com/o/oauth2/auth",
    "token_uri": "https://oauth2.googleapis.com/token",
    "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
    "client_secret": "s3cret",
    "redirect_uris": ["http://localhost:8080/callback", "urn:ietf:wg:oauth:2.0:oob"]
  }
}"#;

    fn reason(err: BootstrapError) -> String {
        match err {
            BootstrapError::MalformedCredentials { reason } => reason,
            other => panic!("expected MalformedCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_console_download() {
        let creds = ClientCredentials::parse(DOWNLOADED.as_bytes()).unwrap();
        assert_eq!(creds.client_id, "123.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "s3cret");
        assert_eq!(creds.redirect_uri, "http://localhost:8080/callback");
        assert_eq!(
            creds.auth_uri.as_deref(),
            Some("https://accounts.google.com/o/oauth2/auth")
        );
        assert_eq!(
            creds.token_uri.as_deref(),
            Some("https://oauth2.googleapis.com/token")
        );
    }

    #[test]
    fn test_parse_minimal() {
        let creds = ClientCredentials::parse(
            br#"{"web":{"client_id":"abc","client_secret":"xyz","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#,
        )
        .unwrap();
        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.redirect_uri, "urn:ietf:wg:oauth:2.0:oob");
        assert_eq!(creds.auth_uri, None);
        assert_eq!(creds.token_uri, None);
    }

    #[test]
    fn test_installed_section_is_not_web() {
        let err = ClientCredentials::parse(
            br#"{"installed":{"client_id":"abc","client_secret":"xyz","redirect_uris":["http://localhost"]}}"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("no `web` section"));
    }

    #[test]
    fn test_web_not_object() {
        let err = ClientCredentials::parse(br#"{"web":"nope"}"#).unwrap_err();
        assert!(reason(err).contains("not an object"));
    }

    #[test]
    fn test_invalid_json() {
        let err = ClientCredentials::parse(b"{web:").unwrap_err();
        assert!(reason(err).contains("invalid JSON"));
    }

    #[test]
    fn test_missing_secret() {
        let err = ClientCredentials::parse(
            br#"{"web":{"client_id":"abc","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("client_secret"));
    }

    #[test]
    fn test_empty_redirect_uris() {
        let err = ClientCredentials::parse(
            br#"{"web":{"client_id":"abc","client_secret":"xyz","redirect_uris":[]}}"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("redirect_uris"));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BootstrapError::FileRead { .. }));
    }

    #[test]
    fn test_load_empty_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");
        std::fs::write(&path, "  \n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::EmptyFile { .. }));
    }
}
