// src/wallets/mod.rs

// Connection lifecycle: descriptors, session persistence and the coordinator
pub mod classifier;
pub mod connectors;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod session;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use classifier::{classify, Outcome, Prompt, Recovery};
pub use coordinator::WalletCoordinator;
pub use error::ActivationError;
pub use registry::WalletRegistry;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use state::{Notification, Prompts, WalletSnapshot};
pub use types::{ConnectArgs, ConnectorHandle, ConnectorInfo, ConnectorMessage, WalletConnector, WalletProvider};
