//! # JSON-RPC Handler
//!
//! Dispatches wallet intents received on the stdio channel to the coordinator.
//!
//! ## Methods
//!
//! - `initialize` - server info and target network
//! - `wallet/connectors` - registered wallet connectors, in display order
//! - `wallet/state` - current published wallet snapshot
//! - `wallet/connect` - connect through `connector_id` (optional `args`)
//! - `wallet/disconnect` - disconnect and forget the saved session
//! - `wallet/showSelection` / `wallet/hideSelection` - wallet selection modal
//! - `wallet/dismissPrompt` - close the `install_provider` or `unsupported_network` prompt
//! - `wallet/notifications` / `wallet/dismissNotification` - transient error notifications
//! - `wallet/balance` - native balance of the connected account

use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    rpc::protocol::{error_codes, Request, Response},
    utils,
    wallets::{ConnectArgs, Prompt},
    AppState,
};

/// This is the main dispatcher for all incoming requests.
pub async fn handle_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let args = req.params_or_empty();
    let id = req.id.clone();
    let coordinator = &state.coordinator;

    let result: Result<Value, Response> = match req.method.as_str() {
        "initialize" => Ok(json!({
            "name": "evm_wallet_connect",
            "version": env!("CARGO_PKG_VERSION"),
            "network_id": coordinator.network_id(),
            "supported_chain_ids": state.config.supported_chain_ids,
        })),
        "wallet/connectors" => Ok(json!(coordinator.registry().infos())),
        "wallet/state" => snapshot_value(&state, &id),
        "wallet/connect" => handle_connect(&args, &state, &id).await,
        "wallet/disconnect" => {
            coordinator.disconnect();
            state.balances.invalidate().await;
            snapshot_value(&state, &id)
        }
        "wallet/showSelection" => {
            coordinator.show_selection();
            snapshot_value(&state, &id)
        }
        "wallet/hideSelection" => {
            coordinator.hide_selection();
            snapshot_value(&state, &id)
        }
        "wallet/dismissPrompt" => (|| {
            let prompt = utils::get_required_arg::<String>(&args, "prompt", &id)?;
            let prompt = prompt.parse::<Prompt>().map_err(|e| {
                Response::error(id.clone(), error_codes::INVALID_PARAMS, e)
            })?;
            coordinator.dismiss_prompt(prompt);
            snapshot_value(&state, &id)
        })(),
        "wallet/notifications" => Ok(json!(coordinator.notifications())),
        "wallet/dismissNotification" => (|| {
            let notification_id = utils::get_required_arg::<Uuid>(&args, "id", &id)?;
            Ok(json!({ "dismissed": coordinator.dismiss_notification(notification_id) }))
        })(),
        "wallet/balance" => {
            let snapshot = coordinator.snapshot();
            state
                .balances
                .balance(&snapshot)
                .await
                .map(|balance| json!({ "balance": balance }))
                .map_err(|e| {
                    error!("Failed to fetch balance: {:#}", e);
                    Response::error(id.clone(), error_codes::INTERNAL_ERROR, e.to_string())
                })
        }
        _ => Err(Response::error(
            id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        )),
    };

    Some(match result {
        Ok(value) => Response::success(id, value),
        Err(err_resp) => err_resp,
    })
}

async fn handle_connect(args: &Value, state: &AppState, id: &Value) -> Result<Value, Response> {
    let connector_id = utils::get_required_arg::<String>(args, "connector_id", id)?;
    let connect_args: Option<ConnectArgs> = args.get("args").and_then(|v| v.as_object()).cloned();

    let connector = state
        .coordinator
        .registry()
        .find_by_id(&connector_id)
        .ok_or_else(|| {
            Response::error(
                id.clone(),
                error_codes::UNKNOWN_CONNECTOR,
                format!("Unknown wallet connector: {}", connector_id),
            )
        })?;

    state.coordinator.connect(connector, connect_args).await;
    snapshot_value(state, id)
}

fn snapshot_value(state: &AppState, id: &Value) -> Result<Value, Response> {
    serde_json::to_value(state.coordinator.snapshot())
        .map_err(|e| Response::error(id.clone(), error_codes::INTERNAL_ERROR, e.to_string()))
}
