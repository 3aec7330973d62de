use chrono::{Days, NaiveDate, Utc};
use tokio::sync::{mpsc, watch};

use crate::market::MarketData;
use crate::markov::{build_forecast, classify, ClassifierConfig};
use crate::message::{AnalysisRequest, AnalysisResponse, Message};
use crate::model::plan::{Goal, Plan};
use crate::scorer::{default_plan, score_forecast};
use crate::transport::{Bus, Envelope};

/// Trailing window of daily closes fed to the classifier.
const LOOKBACK_DAYS: u64 = 365;

/// Single-threaded analysis worker: answers each fanned-out request with a
/// scored plan. Insufficient data never fails a request; it yields the
/// default plan so the fan-in barrier still advances.
pub struct AnalysisWorker<M: MarketData> {
    address: String,
    market: M,
    classifier_cfg: ClassifierConfig,
}

impl<M: MarketData> AnalysisWorker<M> {
    pub fn new(address: &str, market: M) -> Self {
        Self {
            address: address.to_string(),
            market,
            classifier_cfg: ClassifierConfig::default(),
        }
    }

    /// Classify, project, and score one asset as of `today`.
    pub fn handle_request(&self, request: &AnalysisRequest, today: NaiveDate) -> Plan {
        let start = today - Days::new(LOOKBACK_DAYS);
        let goal = Goal {
            target_return: request.target_return,
            time_horizon_days: request.time_horizon_days,
        };

        let series = match self.market.fetch(&request.ticker, start, today) {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(asset = %request.name, error = %e, "Market fetch failed");
                return default_plan(&request.name, &format!("market data unavailable: {e}"));
            }
        };

        match classify(&request.name, &series, &self.classifier_cfg) {
            Ok(model) => {
                let forecast = build_forecast(&request.name, &series, &model);
                tracing::info!(
                    asset = %request.name,
                    last_state = forecast.last_state.as_str(),
                    momentum = forecast.trend_momentum,
                    expected_return_30d = forecast.expected_return_30d,
                    risk = forecast.risk_score,
                    "Forecast ready"
                );
                score_forecast(&forecast, &goal)
            }
            Err(e) => {
                tracing::warn!(asset = %request.name, error = %e, "Classification skipped");
                default_plan(&request.name, &e.to_string())
            }
        }
    }

    /// Message loop: runs until the inbox closes or shutdown flips.
    pub async fn run(
        self,
        bus: Bus,
        mut inbox: mpsc::Receiver<Envelope>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                maybe_envelope = inbox.recv() => {
                    let Some(envelope) = maybe_envelope else {
                        break;
                    };
                    self.on_envelope(&bus, envelope);
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!(address = %self.address, "Analysis worker stopped");
    }

    fn on_envelope(&self, bus: &Bus, envelope: Envelope) {
        match envelope.payload {
            Message::AnalysisRequest(request) => {
                tracing::info!(
                    asset = %request.name,
                    request_id = envelope.request_id,
                    "Received analysis request"
                );
                let plan = self.handle_request(&request, Utc::now().date_naive());
                bus.send(
                    &envelope.reply_to,
                    Envelope {
                        request_id: envelope.request_id,
                        reply_to: self.address.clone(),
                        payload: Message::AnalysisResponse(AnalysisResponse { plan }),
                    },
                );
            }
            other => {
                tracing::warn!(address = %self.address, payload = ?other, "Unexpected message discarded");
            }
        }
    }
}
