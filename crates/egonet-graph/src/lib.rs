pub mod edge;
pub mod graph;
pub mod metrics;
pub mod network;
pub mod triadic;

pub use edge::*;
pub use graph::*;
pub use metrics::{
    average_centrality, CentralityKind, CentralityScores, ClusterGroup, EgoScope, MetricsEngine,
    ISOLATE_SENTINEL,
};
pub use network::*;
pub use triadic::*;
