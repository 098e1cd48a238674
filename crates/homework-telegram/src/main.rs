//! Homework status Telegram relay binary.
//!
//! Start the relay with:
//! ```bash
//! PRACTICUM_TOKEN=xxx TELEGRAM_TOKEN=yyy TELEGRAM_CHAT_ID=123 cargo run -p homework-telegram
//! ```

use std::time::Duration;

use clap::Parser;
use homework_core::config::{self, DEFAULT_ENDPOINT};
use homework_core::{Credentials, HttpStatusClient, PollCycleState, PollLoop, PollerConfig};
use homework_telegram::TelegramNotifier;
use tracing_subscriber::EnvFilter;

/// Homework bot - relays homework review status changes to Telegram
#[derive(Parser, Debug)]
#[command(name = "homework-bot")]
#[command(about = "Poll the homework status API and report changes to a Telegram chat")]
struct Args {
    /// Status API endpoint
    #[arg(long, env = "HOMEWORK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Seconds to wait between polls
    #[arg(long, env = "HOMEWORK_RETRY_SECS", default_value = "600")]
    retry_secs: u64,

    /// Timeout for each outbound HTTP request, in seconds
    #[arg(long, env = "HOMEWORK_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Connection attempts per poll before reporting a failure
    #[arg(long, env = "HOMEWORK_ATTEMPTS", default_value = "3")]
    attempts: u32,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables from the config directory first
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::dotenv();

    let filter = match args.verbose {
        0 => "homework_core=info,homework_telegram=info,homework_bot=info,teloxide=warn",
        1 => "homework_core=debug,homework_telegram=debug,homework_bot=debug,teloxide=info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let credentials = Credentials::from_env();
    if !credentials.has_all() {
        tracing::error!(
            missing = ?credentials.missing(),
            "One or more tokens are unavailable. Shutting down."
        );
        return Ok(());
    }
    let secrets = credentials.require()?;

    let poller_config = PollerConfig::new()
        .with_endpoint(args.endpoint)
        .with_retry_interval(Duration::from_secs(args.retry_secs))
        .with_request_timeout(Duration::from_secs(args.timeout_secs))
        .with_max_attempts(args.attempts);

    let notifier = TelegramNotifier::new(
        secrets.telegram_token.as_str(),
        &secrets.chat_id,
        poller_config.request_timeout,
    )?;

    match notifier.get_me().await {
        Ok(username) => tracing::info!(username = %username, "bot initialized"),
        Err(e) => tracing::warn!(error = %e, "could not fetch bot info, continuing"),
    }

    let client = HttpStatusClient::new(poller_config.clone(), secrets.practicum_token.as_str())?;
    tracing::info!(endpoint = %client.endpoint(), "status client ready");

    let mut poller = PollLoop::new(
        client,
        notifier,
        poller_config.retry_interval,
        PollCycleState::starting_now(),
    );

    if args.once {
        let outcome = poller.run_cycle().await;
        tracing::info!(outcome = ?outcome, "single cycle finished");
    } else {
        poller.run().await;
    }

    Ok(())
}
