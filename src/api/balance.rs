use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use crate::{blockchain::models::BalanceResponse, AppState};

// Defines the structure for the JSON output returned by our API.
#[derive(Debug, Serialize)]
pub struct BalanceOutput {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceResponse>,
}

// The handler function for the GET /wallet/balance endpoint.
pub async fn get_balance_handler(
    State(state): State<AppState>,
) -> Result<Json<BalanceOutput>, (StatusCode, String)> {
    let snapshot = state.coordinator.snapshot();

    match state.balances.balance(&snapshot).await {
        Ok(balance) => Ok(Json(BalanceOutput {
            connected: balance.is_some(),
            balance,
        })),
        Err(e) => {
            error!("Failed to get balance for {:?}: {:#}", snapshot.account, e);
            Err((
                StatusCode::BAD_GATEWAY,
                format!("Failed to fetch balance: {}", e),
            ))
        }
    }
}
