//! Generate config command

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

/// Generate example configuration file
pub async fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if std::path::Path::new(&path).exists() && !force {
        return Err(CliError::CommandError(format!(
            "{} already exists. Use --force to overwrite.",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", path, e)))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {} set {} (or {}) before starting the server",
        "ℹ".bold().blue(),
        "survey.signing_secret".cyan(),
        "SV__SURVEY__SIGNING_SECRET".cyan()
    );

    Ok(())
}
