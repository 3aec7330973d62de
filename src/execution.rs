use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::error::AppError;
use crate::message::{ExecutionCommand, ExecutionResponse};

impl ExecutionCommand {
    /// Parse a raw `{name, params}` command. Unrecognized names are an
    /// explicit UnknownCommand rejection.
    pub fn parse(raw: &Value) -> Result<ExecutionCommand, AppError> {
        serde_json::from_value(raw.clone()).map_err(|_| {
            let name = raw
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("<missing>");
            AppError::UnknownCommand(name.to_string())
        })
    }
}

/// In-process stand-in for the blockchain execution worker: tracks balances
/// and answers swap/balance commands. The real worker lives behind the same
/// message shapes on the other side of the transport.
#[derive(Clone, Default)]
pub struct MockExecutionWorker {
    balances: Arc<Mutex<HashMap<String, f64>>>,
}

impl MockExecutionWorker {
    pub fn new(initial_balances: HashMap<String, f64>) -> Self {
        Self {
            balances: Arc::new(Mutex::new(initial_balances)),
        }
    }

    pub fn handle(&self, command: &ExecutionCommand) -> ExecutionResponse {
        match command {
            ExecutionCommand::Swap(swap) => {
                let mut balances = match self.balances.lock() {
                    Ok(b) => b,
                    Err(_) => {
                        return failure("balance store unavailable");
                    }
                };
                let available = balances.get(&swap.token_in).copied().unwrap_or(0.0);
                if available < swap.amount_in {
                    return failure(&format!(
                        "insufficient {} balance: {} < {}",
                        swap.token_in, available, swap.amount_in
                    ));
                }
                *balances.entry(swap.token_in.clone()).or_insert(0.0) -= swap.amount_in;
                *balances.entry(swap.token_out.clone()).or_insert(0.0) +=
                    swap.amount_in * swap.rate;
                ExecutionResponse {
                    success: true,
                    data: json!({
                        "token_in": swap.token_in,
                        "token_out": swap.token_out,
                        "amount_in": swap.amount_in,
                    }),
                    message: format!("Swapped {} {} to {}", swap.amount_in, swap.token_in, swap.token_out),
                }
            }
            ExecutionCommand::GetBalances => {
                let balances = match self.balances.lock() {
                    Ok(b) => b.clone(),
                    Err(_) => {
                        return failure("balance store unavailable");
                    }
                };
                ExecutionResponse {
                    success: true,
                    data: json!({ "balances": balances }),
                    message: "Balances retrieved".to_string(),
                }
            }
        }
    }

    pub fn balance_of(&self, asset: &str) -> f64 {
        self.balances
            .lock()
            .map(|b| b.get(asset).copied().unwrap_or(0.0))
            .unwrap_or(0.0)
    }
}

fn failure(message: &str) -> ExecutionResponse {
    ExecutionResponse {
        success: false,
        data: Value::Null,
        message: message.to_string(),
    }
}
