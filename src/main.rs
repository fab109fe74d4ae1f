use clap::Parser;

use surveylinker::cli::{Cli, Commands};
use surveylinker::config::{get_config, init_config};
use surveylinker::runtime::modes;
use surveylinker::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            // guard 需要存活到进程结束
            let _log_guard = init_logging(&config.logging)?;
            modes::run_server().await
        }
        Some(cmd) => {
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
