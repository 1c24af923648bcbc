//! Authorization-code flow against the provider's OAuth2 endpoints.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;
use crate::credentials::ClientCredentials;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("invalid endpoint URL {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("provider rejected the request (HTTP {status}): {error}{}", .description.as_deref().map(|d| format!(" - {}", d)).unwrap_or_default())]
    Provider {
        status: u16,
        error: String,
        description: Option<String>,
    },

    #[error("could not reach the token endpoint: {0}")]
    Transport(String),

    #[error("unreadable token response: {0}")]
    InvalidResponse(String),

    #[error(
        "provider did not return a refresh token; remove the app's access from your account permissions and try again"
    )]
    MissingRefreshToken,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// One client registration bound to a pair of endpoints.
pub struct OAuthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_uri: String,
    token_uri: String,
    agent: ureq::Agent,
}

impl OAuthClient {
    /// Endpoints from the credentials file win over the configured ones.
    pub fn new(credentials: &ClientCredentials, config: &AuthConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build();
        Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            redirect_uri: credentials.redirect_uri.clone(),
            auth_uri: credentials
                .auth_uri
                .clone()
                .unwrap_or_else(|| config.auth_uri.clone()),
            token_uri: credentials
                .token_uri
                .clone()
                .unwrap_or_else(|| config.token_uri.clone()),
            agent,
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Consent URL asking for offline access so a refresh token is issued.
    pub fn authorization_url(&self, scopes: &[String]) -> Result<Url, OAuthError> {
        let scope = scopes
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Url::parse_with_params(
            &self.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|source| OAuthError::InvalidEndpoint {
            url: self.auth_uri.clone(),
            source,
        })
    }

    /// Trade an authorization code for tokens.
    pub fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        tracing::debug!(token_uri = %self.token_uri, "exchanging authorization code");
        let result = self.agent.post(&self.token_uri).send_form(&[
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ]);

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(provider_error(status, &body));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(OAuthError::Transport(transport.to_string()));
            }
        };

        let tokens: TokenResponse = response
            .into_json()
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))?;
        tracing::debug!(
            expires_in = ?tokens.expires_in,
            scope = ?tokens.scope,
            has_refresh_token = tokens.refresh_token.is_some(),
            "token endpoint answered"
        );
        Ok(tokens)
    }

    /// Exchange a code and keep only the refresh token.
    pub fn fetch_refresh_token(&self, code: &str) -> Result<String, OAuthError> {
        self.exchange_code(code)?
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingRefreshToken)
    }
}

fn provider_error(status: u16, body: &str) -> OAuthError {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => OAuthError::Provider {
            status,
            error: parsed.error,
            description: parsed.error_description,
        },
        Err(_) => OAuthError::Provider {
            status,
            error: if body.trim().is_empty() {
                "empty response".to_string()
            } else {
                body.trim().to_string()
            },
            description: None,
        },
    }
}
