//! One-shot OAuth bootstrap: turn a downloaded client-secret file into a
//! refresh-token bundle for the sync process.

pub mod bootstrap;
pub mod bundle;
pub mod callback;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod prompt;
pub mod resolve;
