use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::watch;

use markov_agents::config::Config;
use markov_agents::execution::MockExecutionWorker;
use markov_agents::market::FixedSeries;
use markov_agents::message::Message;
use markov_agents::orchestrator::Orchestrator;
use markov_agents::transport::{Bus, Envelope};
use markov_agents::worker::AnalysisWorker;

const ORCHESTRATOR_ADDR: &str = "orchestrator";
const WORKER_ADDR: &str = "analysis-worker";
const EXECUTION_ADDR: &str = "execution-worker";

const INBOX_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_ansi(false)
        .json()
        .init();

    let assets = config.tracked_assets();
    tracing::info!(
        assets = assets.len(),
        target_return = config.goal.target_return,
        horizon_days = config.goal.time_horizon_days,
        "Starting markov-agents"
    );

    let bus = Bus::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Analysis worker with the in-repo market double; a live adapter plugs
    // into the same MarketData seam.
    let today = Utc::now().date_naive();
    let mut market = FixedSeries::new();
    for asset in &assets {
        market = market.with_synthetic(&asset.ticker, today, 366, 100.0, 0.001);
    }
    let worker_inbox = bus.register(WORKER_ADDR, INBOX_CAPACITY);
    let worker = AnalysisWorker::new(WORKER_ADDR, market);
    let worker_bus = bus.clone();
    let worker_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        worker.run(worker_bus, worker_inbox, worker_shutdown).await;
    });

    // Execution worker double behind the same message shapes as the real one.
    let initial_balances: HashMap<String, f64> =
        assets.iter().map(|a| (a.token_address.clone(), 100.0)).collect();
    let execution = MockExecutionWorker::new(initial_balances);
    let mut execution_inbox = bus.register(EXECUTION_ADDR, INBOX_CAPACITY);
    let execution_bus = bus.clone();
    let mut execution_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                maybe_envelope = execution_inbox.recv() => {
                    let Some(envelope) = maybe_envelope else { break; };
                    if let Message::Execute(command) = envelope.payload {
                        let response = execution.handle(&command);
                        execution_bus.send(
                            &envelope.reply_to,
                            Envelope {
                                request_id: envelope.request_id,
                                reply_to: EXECUTION_ADDR.to_string(),
                                payload: Message::ExecutionResult(response),
                            },
                        );
                    }
                }
                _ = execution_shutdown.changed() => {
                    if *execution_shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    });

    // Orchestrator owns the cycle state and the scheduled-swap list.
    let orchestrator_inbox = bus.register(ORCHESTRATOR_ADDR, INBOX_CAPACITY);
    let orchestrator = Orchestrator::new(
        ORCHESTRATOR_ADDR,
        WORKER_ADDR,
        EXECUTION_ADDR,
        assets,
        config.orchestrator_config(),
    );
    let orchestrator_bus = bus.clone();
    let orchestrator_shutdown = shutdown_rx.clone();
    let orchestrator_task = tokio::spawn(async move {
        orchestrator
            .run(orchestrator_bus, orchestrator_inbox, orchestrator_shutdown)
            .await;
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
    let _ = orchestrator_task.await;
    Ok(())
}
