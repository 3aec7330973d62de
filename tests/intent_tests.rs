use markov_agents::intent::{Intent, IntentPayload};

fn payload(json: &str) -> IntentPayload {
    serde_json::from_str(json).unwrap()
}

#[test]
fn asset_analysis_with_explicit_goal() {
    let intent = Intent::from_payload(&payload(
        r#"{"intent": "asset_analysis", "assets": ["BTC"], "target_return": 1.2, "time_horizon": 90}"#,
    ));
    match intent {
        Intent::AssetAnalysis { asset, goal } => {
            assert_eq!(asset, "BTC");
            assert!((goal.target_return - 1.2).abs() < f64::EPSILON);
            assert_eq!(goal.time_horizon_days, 90);
        }
        other => panic!("expected AssetAnalysis, got {other:?}"),
    }
}

#[test]
fn asset_analysis_fills_goal_defaults() {
    let intent = Intent::from_payload(&payload(
        r#"{"intent": "asset_analysis", "assets": ["ETH"]}"#,
    ));
    match intent {
        Intent::AssetAnalysis { goal, .. } => {
            assert!((goal.target_return - 1.1).abs() < f64::EPSILON);
            assert_eq!(goal.time_horizon_days, 60);
        }
        other => panic!("expected AssetAnalysis, got {other:?}"),
    }
}

#[test]
fn asset_analysis_without_an_asset_is_unrecognized() {
    let intent = Intent::from_payload(&payload(r#"{"intent": "asset_analysis"}"#));
    assert!(matches!(intent, Intent::Unrecognized { .. }));
}

#[test]
fn swap_uses_the_default_lot_when_amount_is_missing() {
    let intent = Intent::from_payload(&payload(
        r#"{"intent": "execute_swap", "assets": ["BTC", "ETH"]}"#,
    ));
    match intent {
        Intent::Swap {
            from_asset,
            to_asset,
            amount,
        } => {
            assert_eq!(from_asset, "BTC");
            assert_eq!(to_asset, "ETH");
            assert!((amount - 5.0).abs() < f64::EPSILON);
        }
        other => panic!("expected Swap, got {other:?}"),
    }
}

#[test]
fn swap_with_one_asset_is_unrecognized() {
    let intent = Intent::from_payload(&payload(
        r#"{"intent": "execute_swap", "assets": ["BTC"], "amount": 2.0}"#,
    ));
    assert!(matches!(intent, Intent::Unrecognized { .. }));
}

#[test]
fn schedule_swap_requires_a_date() {
    let intent = Intent::from_payload(&payload(
        r#"{"intent": "schedule_swap", "assets": ["BTC", "ETH"], "amount": 3.0, "scheduled_date": "2026-09-01"}"#,
    ));
    match intent {
        Intent::ScheduleSwap {
            from_asset,
            to_asset,
            amount,
            date,
        } => {
            assert_eq!(from_asset, "BTC");
            assert_eq!(to_asset, "ETH");
            assert!((amount - 3.0).abs() < f64::EPSILON);
            assert_eq!(date, "2026-09-01");
        }
        other => panic!("expected ScheduleSwap, got {other:?}"),
    }

    let intent = Intent::from_payload(&payload(
        r#"{"intent": "schedule_swap", "assets": ["BTC", "ETH"]}"#,
    ));
    assert!(matches!(intent, Intent::Unrecognized { .. }));
}

#[test]
fn simple_intents_map_directly() {
    assert_eq!(
        Intent::from_payload(&payload(r#"{"intent": "check_balance"}"#)),
        Intent::CheckBalance
    );
    assert_eq!(
        Intent::from_payload(&payload(r#"{"intent": "general_question"}"#)),
        Intent::GeneralQuestion
    );
}

#[test]
fn unknown_intent_strings_carry_the_raw_value() {
    let intent = Intent::from_payload(&payload(r#"{"intent": "moon_when"}"#));
    match intent {
        Intent::Unrecognized { raw } => assert_eq!(raw, "moon_when"),
        other => panic!("expected Unrecognized, got {other:?}"),
    }
}
