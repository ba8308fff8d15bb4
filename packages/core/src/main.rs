use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::signal;

use slot_notifier::alerts::LogAlertSink;
use slot_notifier::availability::types::Subscription;
use slot_notifier::cli::Cli;
use slot_notifier::config::Config;
use slot_notifier::logging::init_logging;
use slot_notifier::scheduler::SlotScheduler;
use slot_notifier::services::gaps::GapsClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().unwrap_or_else(|err| {
        tracing::error!("Config error: {}", err);
        std::process::exit(1);
    });

    let subscription = Subscription {
        resource_id: cli.resource_id,
        date_from: cli.date_from,
        date_to: cli.date_to,
        poll_interval_millis: cli.poll_interval.unwrap_or(config.poll_interval_millis),
    };

    let provider = Arc::new(GapsClient::new(config.gaps_base_url));
    let mut scheduler = SlotScheduler::new(provider, Arc::new(LogAlertSink::new()));

    if let Err(err) = scheduler.start(subscription).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }

    tokio::select! {
        _ = scheduler.join() => {
            tracing::info!("Polling session finished");
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown signal received. Stopping polling.");
        }
    }

    scheduler.cancel();
}
