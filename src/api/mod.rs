//! # API Module
//!
//! HTTP bindings for the wallet connection lifecycle. The presentation layer reads the
//! published wallet snapshot and posts user intents back to the coordinator.
//!
//! ## Available Endpoints
//!
//! ### Wallet Connection
//! - `GET /wallet/connectors` - Registered wallet connectors, in display order
//! - `GET /wallet/state` - Published wallet snapshot
//! - `POST /wallet/connect` - Connect through a connector
//! - `POST /wallet/disconnect` - Disconnect and forget the saved session
//! - `POST /wallet/selection` / `DELETE /wallet/selection` - Wallet selection modal
//! - `DELETE /wallet/prompts/:prompt` - Dismiss a blocking prompt
//! - `GET /wallet/notifications` - Transient error notifications
//! - `DELETE /wallet/notifications/:id` - Dismiss a notification
//!
//! ### Account Data
//! - `GET /wallet/balance` - Native balance of the connected account

use axum::{routing::get, Router};

use crate::AppState;

pub mod balance;
pub mod health;
pub mod wallet;

/// Routes mounted under `/api`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_handler))
        .merge(wallet::create_wallet_router())
        .route("/wallet/balance", get(balance::get_balance_handler))
}
