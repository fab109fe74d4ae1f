//! CLI interface module
//!
//! 命令直接连接数据库执行，不经过 HTTP 服务。

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::SurveyError> for CliError {
    fn from(err: crate::errors::SurveyError) -> Self {
        if err.is_internal() {
            CliError::StorageError(err.to_string())
        } else {
            CliError::CommandError(err.to_string())
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` 由 main 处理，不会到达这里。
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => commands::config_generate(output_path, force).await,

        Commands::IssueToken => commands::issue_token(),

        Commands::CreateLink { campaign, expiry } => {
            let services = commands::open_services().await?;
            commands::create_link(&services, campaign, expiry).await
        }

        Commands::ListLinks { campaign, json } => {
            let services = commands::open_services().await?;
            commands::list_links(&services, campaign, json).await
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),
    }
}
