mod check_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    relay_capture::{AccessFilter, DisabledUploader, MediaUploader, Pipeline},
    relay_config::{RelayConfig, Severity},
    relay_inbox::DynalistInbox,
    relay_storage::R2Uploader,
    relay_telegram::{TelegramMediaSource, TelegramResponder},
    tokio_util::sync::CancellationToken,
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "inbox-relay",
    about = "Relay Telegram messages into a Dynalist inbox",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery in ./ and ~/.config/inbox-relay/).
    #[arg(long, global = true, env = "INBOX_RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll Telegram and relay messages (default when no subcommand is provided).
    Run,
    /// Validate the effective configuration and exit.
    CheckConfig,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load and validate the config, logging every diagnostic.
fn load_validated(path: Option<&std::path::Path>) -> anyhow::Result<RelayConfig> {
    let config = relay_config::load(path).context("failed to load configuration")?;
    let result = relay_config::validate(&config);
    for d in &result.diagnostics {
        match d.severity {
            Severity::Error => error!(path = %d.path, "{}", d.message),
            Severity::Warning => warn!(path = %d.path, "{}", d.message),
            Severity::Info => info!(path = %d.path, "{}", d.message),
        }
    }
    if result.has_errors() {
        anyhow::bail!(
            "invalid configuration ({} error(s)), run `inbox-relay check-config` for details",
            result.count(Severity::Error)
        );
    }
    Ok(config)
}

fn build_uploader(config: &RelayConfig) -> Arc<dyn MediaUploader> {
    if config.storage_enabled() {
        info!(bucket = %config.storage.bucket, "photo uploads enabled");
        Arc::new(R2Uploader::new(&config.storage))
    } else {
        info!("photo uploads disabled, photos will be refused");
        Arc::new(DisabledUploader)
    }
}

async fn run_relay(config: RelayConfig) -> anyhow::Result<()> {
    let authorized = config
        .telegram
        .authorized_user_id
        .context("telegram.authorized_user_id is not set")?;

    let bot = relay_telegram::build_bot(&config.telegram)?;
    relay_telegram::connect(&bot)
        .await
        .context("failed to connect to Telegram")?;

    let pipeline = Pipeline::new(
        AccessFilter::new(authorized),
        Arc::new(TelegramMediaSource::new(bot.clone())),
        build_uploader(&config),
        Arc::new(DynalistInbox::new(&config.inbox)),
    );
    let responder = TelegramResponder::new(bot.clone());

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                cancel.cancel();
            }
        });
    }

    relay_telegram::run_polling(
        &bot,
        &pipeline,
        &responder,
        config.telegram.poll_timeout_secs,
        cancel,
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    match cli.command {
        None | Some(Commands::Run) => {
            info!(version = env!("CARGO_PKG_VERSION"), "inbox-relay starting");
            let config = load_validated(cli.config.as_deref())?;
            run_relay(config).await
        },
        Some(Commands::CheckConfig) => check_commands::handle_check_config(cli.config.as_deref()),
    }
}
