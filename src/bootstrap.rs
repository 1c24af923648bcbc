//! The bootstrap pipeline: load credentials, run the consent flow, store the
//! refresh-token bundle.
//!
//! Steps run strictly in order and the first failure ends the run. Nothing
//! touches the storage file until a refresh token is in hand.

use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::bundle::{AuthorizationBundle, PendingBundle};
use crate::callback::LoopbackListener;
use crate::config::AuthConfig;
use crate::credentials::{self, ClientCredentials};
use crate::error::BootstrapError;
use crate::oauth::OAuthClient;
use crate::prompt;

pub const SUCCESS_MESSAGE: &str = "Authorization successful! Ready to sync.";

/// How the operator interacts with the consent flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Try to launch the system browser on the consent URL.
    pub open_browser: bool,
    /// Capture the redirect on a local listener instead of asking for a paste.
    pub listen: bool,
}

/// Run the whole flow and return the bundle that was written.
pub fn run<R: BufRead, W: Write>(
    credentials_path: Option<&Path>,
    config: &AuthConfig,
    options: Options,
    input: R,
    mut output: W,
) -> Result<AuthorizationBundle, BootstrapError> {
    let path = credentials_path.ok_or(BootstrapError::MissingArgument)?;

    let (credentials, pending) = load_credentials(path)?;
    let bundle = authorize(&credentials, pending, config, options, input, &mut output)?;
    persist(&bundle, &config.storage_file, &mut output)?;
    Ok(bundle)
}

/// Step A: read the client-secret file and seed the bundle.
pub fn load_credentials(path: &Path) -> Result<(ClientCredentials, PendingBundle), BootstrapError> {
    let credentials = credentials::load(path)?;
    let pending = PendingBundle::from(&credentials);
    Ok((credentials, pending))
}

/// Step B: show the consent URL, collect the code, trade it for a refresh token.
pub fn authorize<R: BufRead, W: Write>(
    credentials: &ClientCredentials,
    pending: PendingBundle,
    config: &AuthConfig,
    options: Options,
    input: R,
    output: &mut W,
) -> Result<AuthorizationBundle, BootstrapError> {
    let client = OAuthClient::new(credentials, config);
    let url = client.authorization_url(&config.google_auth_scope)?;

    // Bind before printing so the browser can't race the listener.
    let listener = if options.listen {
        let listener = LoopbackListener::bind(client.redirect_uri())?;
        if listener.is_none() {
            tracing::warn!(
                redirect_uri = %client.redirect_uri(),
                "redirect URI is not an http loopback address; falling back to paste"
            );
        }
        listener
    } else {
        None
    };

    write_instructions(output, url.as_str(), listener.as_ref())
        .map_err(BootstrapError::Terminal)?;

    if options.open_browser {
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!(error = %e, "could not open a browser");
        }
    }

    let code = match listener {
        Some(listener) => listener.wait_for_code()?,
        None => prompt::ask_for_code(input, output)?,
    };

    let refresh_token = client.fetch_refresh_token(&code)?;
    Ok(pending.complete(refresh_token))
}

/// Step C: write the bundle and tell the operator.
pub fn persist<W: Write>(
    bundle: &AuthorizationBundle,
    storage_file: &Path,
    output: &mut W,
) -> Result<(), BootstrapError> {
    bundle.save(storage_file)?;
    writeln!(output, "{}", SUCCESS_MESSAGE.green()).map_err(BootstrapError::Terminal)?;
    Ok(())
}

fn write_instructions<W: Write>(
    output: &mut W,
    url: &str,
    listener: Option<&LoopbackListener>,
) -> std::io::Result<()> {
    writeln!(
        output,
        "\n{} {}",
        "Please visit the following url in your browser (you'll only have to do this once):".cyan(),
        url.green()
    )?;
    match listener {
        Some(listener) => writeln!(
            output,
            "\n{}",
            format!("Waiting for the browser to return to {} ...", listener.addr()).yellow()
        )?,
        None => writeln!(
            output,
            "\n{}",
            "Look in the url for ?code=XXXXXXXXX and copy everything after the '=' (or paste the whole url)"
                .yellow()
        )?,
    }
    output.flush()
}
