//! CLI mode

use crate::cli::Commands;
use crate::interfaces::cli::{CliError, run_cli_command};
use crate::runtime::lifetime::startup::install_crypto_provider;

/// Run CLI mode
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    install_crypto_provider();
    run_cli_command(cmd).await
}
