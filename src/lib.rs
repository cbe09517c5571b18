//! Co-membership networks over academic profiles.
//!
//! Profiles sharing a university, country or degree are linked, each node is
//! scored with degree and betweenness centrality, and the results are served
//! as JSON to a force-directed visualization.

pub mod centrality;
pub mod export;
pub mod generate;
pub mod network;
pub mod profile;
pub mod registry;
pub mod server;

pub use centrality::{betweenness_centrality, degree_centrality, BetweennessOutcome};
pub use network::{build_network, Diagnostic, Link, Network, NetworkNode, NOT_FOUND};
pub use profile::{LoadError, LoaderConfig, Profile, ProfileTable};
pub use registry::{AttributeKey, NetworkNotFound, NetworkRegistry, SharedRegistry};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
