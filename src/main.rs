use anyhow::Context;
use clap::Parser;
use club_admin::domain::ports::ConfigProvider;
use club_admin::utils::error::ErrorSeverity;
use club_admin::utils::logger;
use club_admin::{AdminApp, ApiClient, CliConfig, LocalStorage, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if std::env::var("CLUB_ADMIN_LOG_FORMAT").as_deref() == Ok("json") {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match Settings::resolve(&cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    tracing::debug!("Settings: {:?}", settings);

    let client = ApiClient::from_config(&settings).context("failed to build the HTTP client")?;
    let storage = LocalStorage::new(settings.output_dir());
    let app = AdminApp::new(client, storage, settings.format);

    match app.run(&cli.command).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
