use chrono::NaiveDate;
use markov_agents::error::AppError;
use markov_agents::message::{ExecutionCommand, ExecutionResponse, Message, ScheduleRequest};
use markov_agents::model::{Plan, PortfolioDecision, TradingSignal};
use markov_agents::orchestrator::{Orchestrator, OrchestratorConfig, Outbound, TrackedAsset};

fn assets() -> Vec<TrackedAsset> {
    ["BTC", "ETH", "LTC"]
        .iter()
        .enumerate()
        .map(|(i, name)| TrackedAsset {
            name: name.to_string(),
            ticker: format!("{name}-USD"),
            token_address: format!("0x{:040x}", i + 1),
        })
        .collect()
}

fn orchestrator() -> Orchestrator {
    Orchestrator::new(
        "orchestrator",
        "analysis-worker",
        "execution-worker",
        assets(),
        OrchestratorConfig::default(),
    )
}

fn plan(asset: &str, score: f64, signal: TradingSignal, strength: f64) -> Plan {
    Plan {
        asset: asset.to_string(),
        action: signal.action(),
        hold_duration_days: 30,
        projected_return: 1.05,
        confidence: 0.6,
        risk_adjusted_score: score,
        momentum_factor: 0.0,
        volatility_opportunity: 0.5,
        trading_signal: signal,
        signal_strength: strength,
        reasoning: String::new(),
    }
}

/// Map each fanned-out request id to the asset name it carries.
fn fan_out_ids(out: &[Outbound]) -> Vec<(u64, String)> {
    out.iter()
        .map(|o| match &o.envelope.payload {
            Message::AnalysisRequest(req) => (o.envelope.request_id, req.name.clone()),
            other => panic!("expected AnalysisRequest, got {other:?}"),
        })
        .collect()
}

#[test]
fn timer_fans_out_one_request_per_asset() {
    let mut orch = orchestrator();
    let out = orch.on_timer();

    assert!(orch.is_running());
    assert_eq!(out.len(), 3);
    assert_eq!(orch.pending_count(), 3);
    assert!(out.iter().all(|o| o.to == "analysis-worker"));

    let mut ids: Vec<u64> = out.iter().map(|o| o.envelope.request_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3, "correlation ids must be distinct");
}

#[test]
fn correlation_ids_are_monotonic_across_cycles() {
    let mut orch = orchestrator();
    let first: Vec<u64> = orch
        .on_timer()
        .iter()
        .map(|o| o.envelope.request_id)
        .collect();
    orch.on_deadline();
    let second: Vec<u64> = orch
        .on_timer()
        .iter()
        .map(|o| o.envelope.request_id)
        .collect();

    let max_first = *first.iter().max().unwrap();
    assert!(second.iter().all(|&id| id > max_first));
}

#[test]
fn duplicate_timer_is_rejected_mid_cycle() {
    let mut orch = orchestrator();
    let ids = fan_out_ids(&orch.on_timer());

    // Two of three replies land.
    for (id, name) in ids.iter().take(2) {
        let out = orch.on_response(*id, plan(name, 0.5, TradingSignal::Hold, 0.5));
        assert!(out.is_empty());
    }
    assert_eq!(orch.pending_count(), 1);
    assert_eq!(orch.collected_plans().len(), 2);

    // A timer firing now must change nothing.
    let out = orch.on_timer();
    assert!(out.is_empty());
    assert!(orch.is_running());
    assert_eq!(orch.pending_count(), 1);
    assert_eq!(orch.collected_plans().len(), 2);
}

#[test]
fn unknown_correlation_id_is_discarded() {
    let mut orch = orchestrator();
    let ids = fan_out_ids(&orch.on_timer());

    let out = orch.on_response(9_999, plan("BTC", 0.9, TradingSignal::Buy, 0.9));
    assert!(out.is_empty());
    assert_eq!(orch.pending_count(), ids.len());
    assert!(orch.collected_plans().is_empty());
}

#[test]
fn response_outside_a_running_cycle_is_discarded() {
    let mut orch = orchestrator();
    let out = orch.on_response(1, plan("BTC", 0.9, TradingSignal::Buy, 0.9));
    assert!(out.is_empty());
    assert!(!orch.is_running());
    assert!(orch.collected_plans().is_empty());
}

#[test]
fn completed_cycle_with_strong_buy_dispatches_one_swap() {
    let mut orch = orchestrator();
    let ids = fan_out_ids(&orch.on_timer());

    let mut out = Vec::new();
    for (id, name) in &ids {
        let p = match name.as_str() {
            "BTC" => plan("BTC", 0.9, TradingSignal::Buy, 0.8),
            "ETH" => plan("ETH", 0.5, TradingSignal::Hold, 0.5),
            _ => plan("LTC", 0.2, TradingSignal::Sell, 0.6),
        };
        out = orch.on_response(*id, p);
    }

    assert!(!orch.is_running());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, "execution-worker");
    match &out[0].envelope.payload {
        Message::Execute(ExecutionCommand::Swap(swap)) => {
            // Funding LTC into primary BTC.
            assert_eq!(swap.token_out, format!("0x{:040x}", 1));
            assert_eq!(swap.token_in, format!("0x{:040x}", 3));
            assert!((swap.amount_in - 5.0).abs() < f64::EPSILON);
        }
        other => panic!("expected swap command, got {other:?}"),
    }

    assert_eq!(orch.swap_history().len(), 1);
    assert_eq!(orch.swap_history()[0].from_asset, "LTC");
    assert_eq!(orch.swap_history()[0].to_asset, "BTC");

    match orch.last_decision() {
        Some(PortfolioDecision::ConcentratedBuy { primary_asset, .. }) => {
            assert_eq!(primary_asset, "BTC");
        }
        other => panic!("expected ConcentratedBuy, got {other:?}"),
    }
}

#[test]
fn completed_cycle_with_weak_signals_dispatches_nothing() {
    let mut orch = orchestrator();
    let ids = fan_out_ids(&orch.on_timer());

    let mut out = Vec::new();
    for (id, name) in &ids {
        out = orch.on_response(*id, plan(name, 0.5, TradingSignal::Hold, 0.5));
    }

    assert!(!orch.is_running());
    assert!(out.is_empty());
    assert!(orch.swap_history().is_empty());
    assert!(matches!(
        orch.last_decision(),
        Some(PortfolioDecision::Hold { .. })
    ));

    // The next timer starts a fresh cycle.
    assert_eq!(orch.on_timer().len(), 3);
}

#[test]
fn deadline_expiry_names_the_missing_assets() {
    let mut orch = orchestrator();
    let ids = fan_out_ids(&orch.on_timer());

    // Only BTC answers.
    let (btc_id, _) = ids.iter().find(|(_, name)| name == "BTC").unwrap();
    orch.on_response(*btc_id, plan("BTC", 0.5, TradingSignal::Hold, 0.5));

    let err = orch.on_deadline().expect("running cycle must expire");
    match err {
        AppError::IncompleteCycle { missing } => {
            assert_eq!(missing, vec!["ETH".to_string(), "LTC".to_string()]);
        }
        other => panic!("expected IncompleteCycle, got {other:?}"),
    }

    // Partial plans are discarded and the cycle slot is free again.
    assert!(!orch.is_running());
    assert!(orch.collected_plans().is_empty());
    assert_eq!(orch.on_timer().len(), 3);
}

#[test]
fn deadline_while_idle_is_a_no_op() {
    let mut orch = orchestrator();
    assert!(orch.on_deadline().is_none());
}

#[test]
fn schedule_accepts_a_future_swap() {
    let mut orch = orchestrator();
    let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
    let response = orch.on_schedule_request(
        &ScheduleRequest {
            from_asset: "BTC".to_string(),
            to_asset: "ETH".to_string(),
            amount: 2.5,
            date: "2026-09-01".to_string(),
            user_id: "user-1".to_string(),
        },
        today,
    );

    assert!(response.success, "{}", response.message);
    assert_eq!(response.date, "2026-09-01");
    assert_eq!(orch.scheduled_swaps().len(), 1);
    assert_eq!(orch.scheduled_swaps()[0].from_asset, "BTC");
}

#[test]
fn schedule_accepts_today() {
    let mut orch = orchestrator();
    let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
    let response = orch.on_schedule_request(
        &ScheduleRequest {
            from_asset: "BTC".to_string(),
            to_asset: "ETH".to_string(),
            amount: 1.0,
            date: "2026-08-27".to_string(),
            user_id: "user-1".to_string(),
        },
        today,
    );
    assert!(response.success);
}

#[test]
fn schedule_rejects_past_dates_without_registering() {
    let mut orch = orchestrator();
    let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
    let response = orch.on_schedule_request(
        &ScheduleRequest {
            from_asset: "BTC".to_string(),
            to_asset: "ETH".to_string(),
            amount: 2.5,
            date: "2026-08-26".to_string(),
            user_id: "user-1".to_string(),
        },
        today,
    );

    assert!(!response.success);
    assert!(response.message.contains("in the past"), "{}", response.message);
    assert!(response.date.is_empty());
    assert!(orch.scheduled_swaps().is_empty());
}

#[test]
fn schedule_rejects_unknown_assets_and_bad_dates() {
    let mut orch = orchestrator();
    let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

    let response = orch.on_schedule_request(
        &ScheduleRequest {
            from_asset: "DOGE".to_string(),
            to_asset: "ETH".to_string(),
            amount: 2.5,
            date: "2026-09-01".to_string(),
            user_id: "user-1".to_string(),
        },
        today,
    );
    assert!(!response.success);
    assert!(response.message.contains("DOGE"));

    let response = orch.on_schedule_request(
        &ScheduleRequest {
            from_asset: "BTC".to_string(),
            to_asset: "ETH".to_string(),
            amount: 2.5,
            date: "next tuesday".to_string(),
            user_id: "user-1".to_string(),
        },
        today,
    );
    assert!(!response.success);
    assert!(orch.scheduled_swaps().is_empty());
}

#[test]
fn scan_dispatches_and_removes_only_swaps_due_today() {
    let mut orch = orchestrator();
    let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

    for date in ["2026-08-27", "2026-09-15"] {
        let response = orch.on_schedule_request(
            &ScheduleRequest {
                from_asset: "BTC".to_string(),
                to_asset: "ETH".to_string(),
                amount: 3.0,
                date: date.to_string(),
                user_id: "user-1".to_string(),
            },
            today,
        );
        assert!(response.success);
    }

    let out = orch.on_scan_timer(today);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, "execution-worker");
    match &out[0].envelope.payload {
        Message::Execute(ExecutionCommand::Swap(swap)) => {
            assert!((swap.amount_in - 3.0).abs() < f64::EPSILON);
        }
        other => panic!("expected swap command, got {other:?}"),
    }

    assert_eq!(orch.scheduled_swaps().len(), 1);
    assert_eq!(
        orch.scheduled_swaps()[0].date,
        NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()
    );
    assert_eq!(orch.swap_history().len(), 1);
    assert_eq!(orch.swap_history()[0].reason, "Scheduled swap execution");

    // A second scan the same day finds nothing left.
    assert!(orch.on_scan_timer(today).is_empty());
}

#[test]
fn scan_never_touches_the_cycle_state() {
    let mut orch = orchestrator();
    let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
    orch.on_timer();
    assert!(orch.is_running());

    orch.on_scan_timer(today);
    assert!(orch.is_running());
    assert_eq!(orch.pending_count(), 3);
}

#[test]
fn execution_failures_are_reported_not_retried() {
    let mut orch = orchestrator();
    orch.on_execution_result(&ExecutionResponse {
        success: false,
        data: serde_json::Value::Null,
        message: "insufficient balance".to_string(),
    });
    // No retry means no new outbound and no schedule or history mutation.
    assert!(orch.swap_history().is_empty());
    assert!(orch.scheduled_swaps().is_empty());
}
