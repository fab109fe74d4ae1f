//! Link management commands

use chrono::Utc;
use colored::Colorize;

use crate::config::{SurveySettings, get_config};
use crate::interfaces::cli::CliError;
use crate::services::SurveyServices;
use crate::storage::{LinkFilter, LinkStatus, StorageFactory};
use crate::utils::TimeParser;

/// 打开数据库并构建核心服务
pub async fn open_services() -> Result<SurveyServices, CliError> {
    let config = get_config();
    let settings = SurveySettings::from_static(&config)
        .map_err(|e| CliError::ParseError(e.to_string()))?;
    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;
    Ok(SurveyServices::new(storage, &settings))
}

pub async fn create_link(
    services: &SurveyServices,
    campaign: Option<String>,
    expiry: Option<String>,
) -> Result<(), CliError> {
    let now = Utc::now();
    let expiry = expiry
        .map(|raw| {
            TimeParser::parse_expire_time_at(&raw, now)
                .map_err(|e| CliError::ParseError(format!("Invalid expiry '{}': {}", raw, e)))
        })
        .transpose()?;

    let link = services.registry.create_at(campaign, expiry, now).await?;

    println!("{} Created survey link {}", "✓".bold().green(), link.id.to_string().cyan());
    if let Some(ref campaign) = link.campaign_id {
        println!("  campaign: {}", campaign.magenta());
    }
    println!(
        "  expires:  {}",
        link.expires_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .yellow()
    );
    println!("  token:    {}", link.token);

    Ok(())
}

fn colorize_status(status: LinkStatus) -> String {
    match status {
        LinkStatus::Active => status.to_string().green().to_string(),
        LinkStatus::Expired => status.to_string().red().to_string(),
        LinkStatus::Responded => status.to_string().blue().to_string(),
    }
}

pub async fn list_links(
    services: &SurveyServices,
    campaign: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let filter = LinkFilter {
        campaign,
        ..Default::default()
    };
    let links = services.registry.list(&filter).await?;
    let now = Utc::now();
    let statuses = services.resolver.resolve_bulk(&links, now).await?;

    if json {
        let rows: Vec<serde_json::Value> = links
            .iter()
            .map(|link| {
                serde_json::json!({
                    "id": link.id,
                    "campaign_id": link.campaign_id,
                    "token": link.token,
                    "created_at": link.created_at.to_rfc3339(),
                    "expiry": link.expires_at.to_rfc3339(),
                    "status": statuses.get(&link.id),
                })
            })
            .collect();
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if links.is_empty() {
        println!("{}", "No survey links found".dimmed());
        return Ok(());
    }

    println!("{}", format!("{} survey link(s):", links.len()).bold());
    for link in &links {
        let status = statuses
            .get(&link.id)
            .copied()
            .map(colorize_status)
            .unwrap_or_default();
        let remaining = if link.is_expired_at(now) {
            String::new()
        } else {
            format!(" ({})", TimeParser::format_duration_human(now, link.expires_at))
        };
        println!(
            "  {} [{}] {}{}",
            link.id.to_string().cyan(),
            status,
            link.campaign_id.as_deref().unwrap_or("-").magenta(),
            remaining.dimmed()
        );
        println!("    {}", link.token.dimmed());
    }

    Ok(())
}
