//! Precomputed networks keyed by attribute.

use crate::network::{build_network, Network};
use crate::profile::ProfileTable;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::info;

/// Attribute keys the registry answers for, each bound to a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    University,
    Country,
    Degree,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 3] = [
        AttributeKey::University,
        AttributeKey::Country,
        AttributeKey::Degree,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::University => "university",
            AttributeKey::Country => "country",
            AttributeKey::Degree => "degree",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            AttributeKey::University => "university",
            AttributeKey::Country => "university_country",
            AttributeKey::Degree => "degree",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid attribute specified")]
pub struct NetworkNotFound {
    pub key: String,
}

/// One network per [`AttributeKey`], built eagerly and never mutated.
#[derive(Debug)]
pub struct NetworkRegistry {
    profiles: usize,
    networks: Vec<(AttributeKey, Network)>,
}

impl NetworkRegistry {
    pub fn build(table: &ProfileTable) -> Self {
        let networks = AttributeKey::ALL
            .into_iter()
            .map(|key| (key, build_network(table, key.column())))
            .collect();
        info!(profiles = table.len(), "precomputed attribute networks");
        NetworkRegistry {
            profiles: table.len(),
            networks,
        }
    }

    pub fn get(&self, key: &str) -> Result<&Network, NetworkNotFound> {
        AttributeKey::parse(key)
            .and_then(|k| self.networks.iter().find(|(nk, _)| *nk == k))
            .map(|(_, network)| network)
            .ok_or_else(|| NetworkNotFound {
                key: key.to_string(),
            })
    }

    pub fn profiles(&self) -> usize {
        self.profiles
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &Network)> {
        self.networks.iter().map(|(k, n)| (*k, n))
    }
}

/// Process-wide handle to the current registry.
///
/// Readers take a snapshot `Arc`; a rebuild swaps in a whole new registry.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    current: Arc<RwLock<Arc<NetworkRegistry>>>,
}

impl SharedRegistry {
    pub fn new(registry: NetworkRegistry) -> Self {
        SharedRegistry {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    pub fn snapshot(&self) -> Arc<NetworkRegistry> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swaps in `registry`, returning the one it replaced.
    pub fn replace(&self, registry: NetworkRegistry) -> Arc<NetworkRegistry> {
        let next = Arc::new(registry);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}
