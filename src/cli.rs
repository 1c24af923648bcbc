use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sync-auth",
    version,
    about = "Authorize the sync process: exchange a one-time consent for a stored refresh token"
)]
pub struct Cli {
    /// Path to the client-secret JSON downloaded from the provider console
    #[arg(value_name = "CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Where to write the credential bundle (overrides storage_file)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// OAuth scope to request; repeat for several (overrides google_auth_scope)
    #[arg(long = "scope", value_name = "SCOPE", action = clap::ArgAction::Append)]
    pub scopes: Vec<String>,

    /// Config file (default: $SYNC_AUTH_CONFIG or the app config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Open the consent page in the default browser
    #[arg(long)]
    pub open: bool,

    /// Capture the redirect on the loopback redirect URI instead of pasting the code
    #[arg(long)]
    pub listen: bool,

    /// Show diagnostic output on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
