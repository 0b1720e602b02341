//! Relational statistics over an [`EgoNetwork`].
//!
//! Most statistics come in two scopes: over the full graph, or over the
//! ego-free view. The ego is tied to every alter by construction, so with it
//! included every centrality is dominated by the ego and the graph is always
//! a single component of diameter two.

mod centrality;
mod clustering;
mod homophily;
mod structure;
mod tabulation;

pub use centrality::{
    betweenness_centrality, closeness_centrality, degree_centrality, eigenvector_centrality,
};
pub use clustering::{average_clustering, clustering_coefficients, ClusterGroup, ClusteringByValue};
pub use tabulation::Breakdown;

use crate::{EgoNetwork, SocialGraph};
use egonet_core::{AnalysisConfig, PersonId};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Reported for alters that the ego-free view drops as isolates.
pub const ISOLATE_SENTINEL: f64 = -1.0;

pub type CentralityScores = BTreeMap<PersonId, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EgoScope {
    WithEgo,
    WithoutEgo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CentralityKind {
    Degree,
    Betweenness,
    Closeness,
    Eigenvector,
}

impl fmt::Display for CentralityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CentralityKind::Degree => "degree",
            CentralityKind::Betweenness => "betweenness",
            CentralityKind::Closeness => "closeness",
            CentralityKind::Eigenvector => "eigenvector",
        };
        write!(f, "{}", s)
    }
}

pub struct MetricsEngine<'a> {
    network: &'a EgoNetwork,
    config: AnalysisConfig,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(network: &'a EgoNetwork, config: AnalysisConfig) -> Self {
        Self { network, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Graph for `scope` plus the alters dropped from it as isolates.
    fn scoped(&self, scope: EgoScope) -> (Cow<'a, SocialGraph>, BTreeSet<PersonId>) {
        match scope {
            EgoScope::WithEgo => (Cow::Borrowed(self.network.graph()), BTreeSet::new()),
            EgoScope::WithoutEgo => {
                let view = self.network.without_ego_view();
                let isolates = view.isolates().clone();
                (Cow::Owned(view.into_graph()), isolates)
            }
        }
    }
}

/// Arithmetic mean of the values, skipping sentinel entries.
pub fn average_centrality(scores: &CentralityScores) -> Option<f64> {
    let values: Vec<f64> = scores
        .values()
        .copied()
        .filter(|v| *v != ISOLATE_SENTINEL)
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
