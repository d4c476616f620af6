// src/wallets/registry.rs

use std::sync::Arc;

use crate::wallets::types::{ConnectorInfo, WalletConnector};

/// Ordered list of known wallet descriptors.
///
/// Order drives display priority in the selection UI; lookups return the first match.
#[derive(Clone, Default)]
pub struct WalletRegistry {
    connectors: Vec<Arc<dyn WalletConnector>>,
}

impl WalletRegistry {
    pub fn new(connectors: Vec<Arc<dyn WalletConnector>>) -> Self {
        Self { connectors }
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<dyn WalletConnector>> {
        self.connectors.iter().find(|c| c.id() == id).cloned()
    }

    pub fn all(&self) -> &[Arc<dyn WalletConnector>] {
        &self.connectors
    }

    pub fn infos(&self) -> Vec<ConnectorInfo> {
        self.connectors
            .iter()
            .map(|c| ConnectorInfo::of(c.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl std::fmt::Debug for WalletRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.connectors.iter().map(|c| c.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallets::types::{ConnectArgs, ConnectorHandle};

    struct Named(&'static str, &'static str);

    impl WalletConnector for Named {
        fn id(&self) -> &'static str {
            self.0
        }
        fn name(&self) -> &'static str {
            self.1
        }
        fn factory(&self, _network_id: u64, _args: Option<&ConnectArgs>) -> Arc<dyn ConnectorHandle> {
            unreachable!("registry tests never build handles")
        }
    }

    #[test]
    fn test_find_by_id_first_match_wins() {
        let registry = WalletRegistry::new(vec![
            Arc::new(Named("a", "First A")),
            Arc::new(Named("b", "B")),
            Arc::new(Named("a", "Second A")),
        ]);

        assert_eq!(registry.find_by_id("a").unwrap().name(), "First A");
        assert_eq!(registry.find_by_id("b").unwrap().name(), "B");
        assert!(registry.find_by_id("removed").is_none());
    }

    #[test]
    fn test_all_preserves_order() {
        let registry = WalletRegistry::new(vec![
            Arc::new(Named("z", "Z")),
            Arc::new(Named("a", "A")),
        ]);

        let ids: Vec<_> = registry.all().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(registry.infos()[0].name, "Z");
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
