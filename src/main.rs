use clap::Parser;
use tracing::warn;

use urlvault::cli::Cli;
use urlvault::config::AppConfig;
use urlvault::runtime::modes::{self, Mode};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match modes::detect_mode(cli.command.as_ref()) {
        Mode::Cli => {
            let Some(command) = cli.command else {
                return Ok(());
            };
            if let Err(e) = modes::run_cli(command, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        Mode::Server => {
            let _guard = match urlvault::system::logging::init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    std::process::exit(1);
                }
            };

            if config.ensure_jwt_secret() {
                warn!(
                    "auth.jwt_secret is not set, generated a random one. Sessions will not survive a restart"
                );
            }

            modes::run_server(config).await
        }
    }
}
