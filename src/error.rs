//! Failure taxonomy for the bootstrap steps.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::oauth::OAuthError;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(
        "Credentials path not found. Please input a path to your downloaded JSON credentials and try again."
    )]
    MissingArgument,

    #[error(
        "Could not read path to credentials file {}. Please check your path and try again",
        .path.display()
    )]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Credentials not found in {}. Please check your path and try again", .path.display())]
    EmptyFile { path: PathBuf },

    #[error(
        "Path did not include correct credentials ({reason}). Please check that you downloaded the right JSON credentials."
    )]
    MalformedCredentials { reason: String },

    #[error("No authorization code was entered")]
    MissingAuthorizationCode,

    #[error("Authorization was denied by the provider: {0}")]
    AuthorizationDenied(String),

    #[error("Could not receive the authorization redirect on {addr}: {reason}")]
    Callback { addr: String, reason: String },

    #[error("Error while trying to retrieve access token")]
    TokenExchange(#[from] OAuthError),

    #[error(
        "Could not store authentication config at {}. Please try again.",
        .path.display()
    )]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not talk to the terminal")]
    Terminal(#[source] io::Error),
}

impl BootstrapError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        BootstrapError::MalformedCredentials {
            reason: reason.into(),
        }
    }
}
