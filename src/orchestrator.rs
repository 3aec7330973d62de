use std::collections::HashMap;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

use crate::error::AppError;
use crate::message::{
    ExecutionCommand, ExecutionResponse, Message, ScheduleRequest, ScheduleResponse, SwapCommand,
};
use crate::model::decision::PortfolioDecision;
use crate::model::plan::{Goal, Plan};
use crate::portfolio;
use crate::transport::{Address, Bus, Envelope};

pub const SCHEDULE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One asset the orchestrator fans out analysis for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAsset {
    pub name: String,
    pub ticker: String,
    pub token_address: String,
}

/// A future swap accepted through the schedule interface. Append-only until
/// its date arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSwap {
    pub from_asset: String,
    pub to_asset: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub user_id: String,
}

/// Record of a swap instruction dispatched to the execution worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub date: NaiveDate,
    pub from_asset: String,
    pub to_asset: String,
    pub amount: f64,
    pub reason: String,
}

/// Fan-out/fan-in bookkeeping for the cycle in flight. Owned exclusively by
/// the orchestrator; handlers mutate it run-to-completion, so there is no
/// interleaving to guard against.
#[derive(Debug, Default)]
struct CycleState {
    running: bool,
    /// Correlation table: minted request id -> asset name awaiting a reply.
    pending: HashMap<u64, String>,
    collected: Vec<Plan>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub goal: Goal,
    pub cycle_period: Duration,
    pub scan_period: Duration,
    /// Bounded fan-in wait; expiry is the IncompleteCycle failure transition.
    pub fanin_timeout: Duration,
    /// Fixed lot per dispatched swap instruction.
    pub swap_lot: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            goal: Goal::default(),
            cycle_period: Duration::from_secs(300),
            scan_period: Duration::from_secs(43_200),
            fanin_timeout: Duration::from_secs(60),
            swap_lot: 5.0,
        }
    }
}

/// An envelope with its destination, produced by a handler for the run loop
/// (or a test) to deliver.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub to: Address,
    pub envelope: Envelope,
}

/// Cycle orchestrator: periodically fans out one analysis request per
/// tracked asset, collects correlated responses, and releases the fan-in
/// barrier exactly once per cycle. At most one cycle is ever in flight.
pub struct Orchestrator {
    address: Address,
    worker_address: Address,
    execution_address: Address,
    assets: Vec<TrackedAsset>,
    cfg: OrchestratorConfig,
    next_request_id: u64,
    cycle: CycleState,
    scheduled_swaps: Vec<ScheduledSwap>,
    swap_history: Vec<SwapRecord>,
    last_decision: Option<PortfolioDecision>,
}

impl Orchestrator {
    pub fn new(
        address: &str,
        worker_address: &str,
        execution_address: &str,
        assets: Vec<TrackedAsset>,
        cfg: OrchestratorConfig,
    ) -> Self {
        Self {
            address: address.to_string(),
            worker_address: worker_address.to_string(),
            execution_address: execution_address.to_string(),
            assets,
            cfg,
            next_request_id: 0,
            cycle: CycleState::default(),
            scheduled_swaps: Vec::new(),
            swap_history: Vec::new(),
            last_decision: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.cycle.running
    }

    pub fn pending_count(&self) -> usize {
        self.cycle.pending.len()
    }

    pub fn collected_plans(&self) -> &[Plan] {
        &self.cycle.collected
    }

    pub fn scheduled_swaps(&self) -> &[ScheduledSwap] {
        &self.scheduled_swaps
    }

    pub fn swap_history(&self) -> &[SwapRecord] {
        &self.swap_history
    }

    pub fn last_decision(&self) -> Option<&PortfolioDecision> {
        self.last_decision.as_ref()
    }

    /// Idle -> Running: fan out one tagged request per tracked asset.
    /// A timer firing while a cycle is already running is rejected outright;
    /// no state changes, no duplicate fan-out.
    pub fn on_timer(&mut self) -> Vec<Outbound> {
        if self.cycle.running {
            tracing::info!("Planning cycle already running, skipping this tick");
            return Vec::new();
        }
        if self.assets.is_empty() {
            tracing::warn!("No tracked assets configured, cycle not started");
            return Vec::new();
        }

        self.cycle.running = true;
        self.cycle.collected.clear();
        self.cycle.pending.clear();

        tracing::info!(
            cycle = %uuid::Uuid::new_v4(),
            assets = self.assets.len(),
            target_return = self.cfg.goal.target_return,
            horizon_days = self.cfg.goal.time_horizon_days,
            "Starting planning cycle"
        );

        let mut out = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            self.next_request_id += 1;
            let request_id = self.next_request_id;
            self.cycle.pending.insert(request_id, asset.name.clone());
            out.push(Outbound {
                to: self.worker_address.clone(),
                envelope: Envelope {
                    request_id,
                    reply_to: self.address.clone(),
                    payload: Message::AnalysisRequest(crate::message::AnalysisRequest {
                        ticker: asset.ticker.clone(),
                        name: asset.name.clone(),
                        target_return: self.cfg.goal.target_return,
                        time_horizon_days: self.cfg.goal.time_horizon_days,
                    }),
                },
            });
        }
        out
    }

    /// Running -> Running on each correlated response; Running -> Idle plus
    /// the portfolio decision when the last response lands. Out-of-band and
    /// unknown-correlation responses are discarded, never queued.
    pub fn on_response(&mut self, request_id: u64, plan: Plan) -> Vec<Outbound> {
        if !self.cycle.running {
            tracing::warn!(request_id, "Response outside a running cycle, discarded");
            return Vec::new();
        }
        let Some(asset) = self.cycle.pending.remove(&request_id) else {
            tracing::warn!(request_id, "Unknown correlation id, response discarded");
            return Vec::new();
        };

        tracing::info!(
            asset = %asset,
            request_id,
            signal = plan.trading_signal.as_str(),
            score = plan.risk_adjusted_score,
            "Collected plan"
        );
        self.cycle.collected.push(plan);

        if !self.cycle.pending.is_empty() {
            return Vec::new();
        }
        self.complete_cycle()
    }

    /// Fan-in deadline expiry. Running -> Idle with an IncompleteCycle error
    /// naming the assets that never answered; partial plans are discarded.
    pub fn on_deadline(&mut self) -> Option<AppError> {
        if !self.cycle.running {
            return None;
        }
        let mut missing: Vec<String> = self.cycle.pending.values().cloned().collect();
        missing.sort();
        self.cycle.running = false;
        self.cycle.pending.clear();
        self.cycle.collected.clear();
        Some(AppError::IncompleteCycle { missing })
    }

    fn complete_cycle(&mut self) -> Vec<Outbound> {
        tracing::info!(
            plans = self.cycle.collected.len(),
            "All plans received, making portfolio decision"
        );
        let decision = portfolio::decide(&self.cycle.collected);
        tracing::info!(
            decision = ?decision,
            reasoning = decision.reasoning(),
            "Portfolio decision"
        );

        let out = self.dispatch_decision(&decision);
        self.last_decision = Some(decision);
        self.cycle.running = false;
        self.cycle.pending.clear();
        out
    }

    /// At most one swap instruction per completed cycle.
    fn dispatch_decision(&mut self, decision: &PortfolioDecision) -> Vec<Outbound> {
        let (Some(primary), Some(funding)) = (decision.primary_asset(), decision.funding_asset())
        else {
            tracing::info!("No on-chain action for this cycle");
            return Vec::new();
        };
        let (Some(primary_token), Some(funding_token)) =
            (self.token_address(primary), self.token_address(funding))
        else {
            tracing::warn!(primary = %primary, funding = %funding, "Token address missing, swap not dispatched");
            return Vec::new();
        };

        let swap = SwapCommand {
            token_in: funding_token,
            token_out: primary_token,
            amount_in: self.cfg.swap_lot,
            rate: 1.0,
        };
        self.swap_history.push(SwapRecord {
            date: Utc::now().date_naive(),
            from_asset: funding.to_string(),
            to_asset: primary.to_string(),
            amount: self.cfg.swap_lot,
            reason: decision.reasoning().to_string(),
        });

        self.next_request_id += 1;
        vec![Outbound {
            to: self.execution_address.clone(),
            envelope: Envelope {
                request_id: self.next_request_id,
                reply_to: self.address.clone(),
                payload: Message::Execute(ExecutionCommand::Swap(swap)),
            },
        }]
    }

    /// Validate and register a future swap. Unknown assets and past or
    /// unparseable dates are explicit rejections; nothing is defaulted.
    pub fn on_schedule_request(
        &mut self,
        request: &ScheduleRequest,
        today: NaiveDate,
    ) -> ScheduleResponse {
        match self.validate_schedule(request, today) {
            Ok(date) => {
                self.scheduled_swaps.push(ScheduledSwap {
                    from_asset: request.from_asset.clone(),
                    to_asset: request.to_asset.clone(),
                    amount: request.amount,
                    date,
                    user_id: request.user_id.clone(),
                });
                tracing::info!(
                    from = %request.from_asset,
                    to = %request.to_asset,
                    amount = request.amount,
                    date = %date,
                    "Scheduled swap registered"
                );
                ScheduleResponse {
                    success: true,
                    message: format!(
                        "Successfully scheduled swap of {} {} to {}",
                        request.amount, request.from_asset, request.to_asset
                    ),
                    date: date.format(SCHEDULE_DATE_FORMAT).to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Schedule request rejected");
                ScheduleResponse {
                    success: false,
                    message: e.to_string(),
                    date: String::new(),
                }
            }
        }
    }

    fn validate_schedule(
        &self,
        request: &ScheduleRequest,
        today: NaiveDate,
    ) -> Result<NaiveDate, AppError> {
        for asset in [&request.from_asset, &request.to_asset] {
            if !self.assets.iter().any(|a| &a.name == asset) {
                return Err(AppError::InvalidAsset(asset.clone()));
            }
        }
        let date = NaiveDate::parse_from_str(&request.date, SCHEDULE_DATE_FORMAT)
            .map_err(|_| AppError::InvalidDate(request.date.clone()))?;
        if date < today {
            return Err(AppError::InvalidDate(format!(
                "{} is in the past",
                request.date
            )));
        }
        Ok(date)
    }

    /// Low-frequency scan: dispatch and remove every entry scheduled for
    /// `today`. Touches only the schedule list and swap history, never the
    /// cycle state.
    pub fn on_scan_timer(&mut self, today: NaiveDate) -> Vec<Outbound> {
        let due: Vec<ScheduledSwap> = self
            .scheduled_swaps
            .iter()
            .filter(|s| s.date == today)
            .cloned()
            .collect();
        if due.is_empty() {
            return Vec::new();
        }
        tracing::info!(count = due.len(), "Dispatching scheduled swaps due today");

        let mut out = Vec::with_capacity(due.len());
        for swap in &due {
            let (Some(token_in), Some(token_out)) = (
                self.token_address(&swap.from_asset),
                self.token_address(&swap.to_asset),
            ) else {
                tracing::warn!(
                    from = %swap.from_asset,
                    to = %swap.to_asset,
                    "Token address missing, scheduled swap skipped"
                );
                continue;
            };
            self.next_request_id += 1;
            out.push(Outbound {
                to: self.execution_address.clone(),
                envelope: Envelope {
                    request_id: self.next_request_id,
                    reply_to: self.address.clone(),
                    payload: Message::Execute(ExecutionCommand::Swap(SwapCommand {
                        token_in,
                        token_out,
                        amount_in: swap.amount,
                        rate: 1.0,
                    })),
                },
            });
            self.swap_history.push(SwapRecord {
                date: today,
                from_asset: swap.from_asset.clone(),
                to_asset: swap.to_asset.clone(),
                amount: swap.amount,
                reason: "Scheduled swap execution".to_string(),
            });
        }
        self.scheduled_swaps.retain(|s| s.date != today);
        out
    }

    /// Execution results carry failure in the payload, not as a transport
    /// fault. No automatic retry.
    pub fn on_execution_result(&mut self, response: &ExecutionResponse) {
        if response.success {
            tracing::info!(message = %response.message, "Execution succeeded");
        } else {
            let err = AppError::ExecutionFailure(response.message.clone());
            tracing::error!(error = %err, "Execution failed");
        }
    }

    fn token_address(&self, name: &str) -> Option<String> {
        self.assets
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.token_address.clone())
    }

    /// Drive the state machine from the inbox, the cycle timer, the
    /// scheduled-swap scan, and the bounded fan-in deadline.
    pub async fn run(
        mut self,
        bus: Bus,
        mut inbox: mpsc::Receiver<Envelope>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut cycle_timer = tokio::time::interval(self.cfg.cycle_period);
        let mut scan_timer = tokio::time::interval(self.cfg.scan_period);
        let mut deadline: Option<tokio::time::Instant> = None;

        loop {
            let deadline_wait = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                _ = cycle_timer.tick() => {
                    let was_running = self.is_running();
                    let out = self.on_timer();
                    if !was_running && self.is_running() {
                        deadline = Some(tokio::time::Instant::now() + self.cfg.fanin_timeout);
                    }
                    self.send_all(&bus, out);
                }
                _ = scan_timer.tick() => {
                    let out = self.on_scan_timer(Utc::now().date_naive());
                    self.send_all(&bus, out);
                }
                _ = deadline_wait => {
                    deadline = None;
                    if let Some(e) = self.on_deadline() {
                        tracing::error!(error = %e, "Fan-in deadline expired, cycle abandoned");
                    }
                }
                maybe_envelope = inbox.recv() => {
                    let Some(envelope) = maybe_envelope else {
                        break;
                    };
                    let out = self.on_envelope(envelope);
                    if !self.is_running() {
                        deadline = None;
                    }
                    self.send_all(&bus, out);
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!(address = %self.address, "Orchestrator stopped");
    }

    fn on_envelope(&mut self, envelope: Envelope) -> Vec<Outbound> {
        match envelope.payload {
            Message::AnalysisResponse(response) => {
                self.on_response(envelope.request_id, response.plan)
            }
            Message::ScheduleSwap(request) => {
                let response = self.on_schedule_request(&request, Utc::now().date_naive());
                vec![Outbound {
                    to: envelope.reply_to,
                    envelope: Envelope {
                        request_id: envelope.request_id,
                        reply_to: self.address.clone(),
                        payload: Message::ScheduleResult(response),
                    },
                }]
            }
            Message::ExecutionResult(response) => {
                self.on_execution_result(&response);
                Vec::new()
            }
            other => {
                tracing::warn!(payload = ?other, "Unexpected message discarded");
                Vec::new()
            }
        }
    }

    fn send_all(&self, bus: &Bus, outbound: Vec<Outbound>) {
        for item in outbound {
            bus.send(&item.to, item.envelope);
        }
    }
}
