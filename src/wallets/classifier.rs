// src/wallets/classifier.rs

use serde::Serialize;

use crate::wallets::{error::ActivationError, types::WalletConnector};

/// Result of classifying an activation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoProviderInstalled,
    UnsupportedNetwork { chain_id: u64 },
    /// Whatever the connector's error hook made of it; `None` means suppressed.
    ConnectorSpecific(Option<String>),
}

/// Blocking prompts the presentation layer shows until dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    InstallProvider,
    UnsupportedNetwork,
}

impl std::str::FromStr for Prompt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "install_provider" | "install" => Ok(Prompt::InstallProvider),
            "unsupported_network" | "unsupported_chain" => Ok(Prompt::UnsupportedNetwork),
            other => Err(format!("Unknown prompt: {}", other)),
        }
    }
}

/// What the coordinator has to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub prompt: Option<Prompt>,
    pub notification: Option<String>,
    /// Terminal classes tear the whole session down.
    pub force_disconnect: bool,
}

pub fn classify(error: &ActivationError, connector: &dyn WalletConnector) -> Outcome {
    match error {
        ActivationError::NoEthereumProvider => Outcome::NoProviderInstalled,
        ActivationError::UnsupportedChainId { chain_id, .. } => Outcome::UnsupportedNetwork {
            chain_id: *chain_id,
        },
        other => Outcome::ConnectorSpecific(connector.on_error(other).map(|m| m.message)),
    }
}

impl Outcome {
    pub fn recovery(&self) -> Recovery {
        match self {
            Outcome::NoProviderInstalled => Recovery {
                prompt: Some(Prompt::InstallProvider),
                notification: None,
                force_disconnect: true,
            },
            Outcome::UnsupportedNetwork { .. } => Recovery {
                prompt: Some(Prompt::UnsupportedNetwork),
                notification: None,
                force_disconnect: true,
            },
            Outcome::ConnectorSpecific(message) => Recovery {
                prompt: None,
                notification: message.clone(),
                force_disconnect: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallets::types::{ConnectArgs, ConnectorHandle, ConnectorMessage};
    use std::sync::Arc;

    struct Loud;
    struct Quiet;

    impl WalletConnector for Loud {
        fn id(&self) -> &'static str {
            "loud"
        }
        fn name(&self) -> &'static str {
            "Loud"
        }
        fn factory(&self, _network_id: u64, _args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
            unreachable!("classifier tests never build handles")
        }
        fn on_error(&self, error: &ActivationError) -> Option<ConnectorMessage> {
            Some(ConnectorMessage::new(format!("loud: {}", error)))
        }
    }

    impl WalletConnector for Quiet {
        fn id(&self) -> &'static str {
            "quiet"
        }
        fn name(&self) -> &'static str {
            "Quiet"
        }
        fn factory(&self, _network_id: u64, _args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
            unreachable!("classifier tests never build handles")
        }
    }

    #[test]
    fn test_no_provider_forces_disconnect() {
        let outcome = classify(&ActivationError::NoEthereumProvider, &Loud);
        assert_eq!(outcome, Outcome::NoProviderInstalled);

        let recovery = outcome.recovery();
        assert_eq!(recovery.prompt, Some(Prompt::InstallProvider));
        assert!(recovery.force_disconnect);
        assert!(recovery.notification.is_none());
    }

    #[test]
    fn test_unsupported_chain_ignores_connector_hook() {
        let error = ActivationError::UnsupportedChainId {
            chain_id: 56,
            supported: vec![1],
        };
        let outcome = classify(&error, &Loud);
        assert_eq!(outcome, Outcome::UnsupportedNetwork { chain_id: 56 });
        assert_eq!(outcome.recovery().prompt, Some(Prompt::UnsupportedNetwork));
        assert!(outcome.recovery().force_disconnect);
    }

    #[test]
    fn test_connector_specific_uses_hook() {
        let outcome = classify(&ActivationError::UserRejected, &Loud);
        let recovery = outcome.recovery();
        assert_eq!(
            recovery.notification.as_deref(),
            Some("loud: the user rejected the connection request")
        );
        assert!(!recovery.force_disconnect);
        assert!(recovery.prompt.is_none());

        // Connectors without a hook suppress the message
        let outcome = classify(&ActivationError::Rpc("timeout".into()), &Quiet);
        assert_eq!(outcome, Outcome::ConnectorSpecific(None));
        assert!(outcome.recovery().notification.is_none());
    }

    #[test]
    fn test_prompt_parsing() {
        assert_eq!("install-provider".parse::<Prompt>(), Ok(Prompt::InstallProvider));
        assert_eq!("unsupported_network".parse::<Prompt>(), Ok(Prompt::UnsupportedNetwork));
        assert!("wallets".parse::<Prompt>().is_err());
    }
}
