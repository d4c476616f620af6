use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    wallets::{ConnectArgs, ConnectorInfo, Notification, Prompt, WalletSnapshot},
    AppState,
};

// --- Request and Response Models ---

/// Request to connect a wallet
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    /// Id of a registered connector, e.g. `metamask`
    pub connector_id: String,
    /// Connector-specific factory arguments
    #[serde(default)]
    pub args: Option<ConnectArgs>,
}

/// Response for listing connectors
#[derive(Debug, Serialize)]
pub struct ListConnectorsResponse {
    pub connectors: Vec<ConnectorInfo>,
}

#[derive(Debug, Serialize)]
pub struct DismissResponse {
    pub dismissed: bool,
}

// --- Handlers ---

/// List the registered wallet connectors in display order
pub async fn list_connectors_handler(State(state): State<AppState>) -> Json<ListConnectorsResponse> {
    Json(ListConnectorsResponse {
        connectors: state.coordinator.registry().infos(),
    })
}

/// Current published wallet snapshot
pub async fn get_state_handler(State(state): State<AppState>) -> Json<WalletSnapshot> {
    Json(state.coordinator.snapshot())
}

/// Connect through a registered connector.
///
/// Waits for the attempt to settle. Connection failures are not HTTP errors: they show up
/// as prompts or notifications in the returned snapshot.
pub async fn connect_handler(
    State(state): State<AppState>,
    Json(input): Json<ConnectRequest>,
) -> Result<Json<WalletSnapshot>, (StatusCode, String)> {
    info!("Handling wallet connect request for: {}", input.connector_id);

    let connector = state
        .coordinator
        .registry()
        .find_by_id(&input.connector_id)
        .ok_or_else(|| {
            warn!("Unknown wallet connector requested: {}", input.connector_id);
            (
                StatusCode::NOT_FOUND,
                format!("Unknown wallet connector: {}", input.connector_id),
            )
        })?;

    state.coordinator.connect(connector, input.args).await;
    Ok(Json(state.coordinator.snapshot()))
}

/// Disconnect the active wallet and forget the saved session
pub async fn disconnect_handler(State(state): State<AppState>) -> Json<WalletSnapshot> {
    info!("Handling wallet disconnect request");
    state.coordinator.disconnect();
    state.balances.invalidate().await;
    Json(state.coordinator.snapshot())
}

/// Open the wallet selection modal
pub async fn show_selection_handler(State(state): State<AppState>) -> Json<WalletSnapshot> {
    state.coordinator.show_selection();
    Json(state.coordinator.snapshot())
}

/// Close the wallet selection modal
pub async fn hide_selection_handler(State(state): State<AppState>) -> Json<WalletSnapshot> {
    state.coordinator.hide_selection();
    Json(state.coordinator.snapshot())
}

/// Dismiss the install-provider or unsupported-network prompt
pub async fn dismiss_prompt_handler(
    State(state): State<AppState>,
    Path(prompt): Path<String>,
) -> Result<Json<WalletSnapshot>, (StatusCode, String)> {
    let prompt = prompt
        .parse::<Prompt>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    state.coordinator.dismiss_prompt(prompt);
    Ok(Json(state.coordinator.snapshot()))
}

pub async fn list_notifications_handler(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.coordinator.notifications())
}

pub async fn dismiss_notification_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DismissResponse>, (StatusCode, String)> {
    if state.coordinator.dismiss_notification(id) {
        Ok(Json(DismissResponse { dismissed: true }))
    } else {
        Err((StatusCode::NOT_FOUND, format!("Notification {} not found", id)))
    }
}

/// Create the wallet router
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/wallet/connectors", get(list_connectors_handler))
        .route("/wallet/state", get(get_state_handler))
        .route("/wallet/connect", post(connect_handler))
        .route("/wallet/disconnect", post(disconnect_handler))
        .route(
            "/wallet/selection",
            post(show_selection_handler).delete(hide_selection_handler),
        )
        .route("/wallet/prompts/:prompt", delete(dismiss_prompt_handler))
        .route("/wallet/notifications", get(list_notifications_handler))
        .route("/wallet/notifications/:id", delete(dismiss_notification_handler))
}
