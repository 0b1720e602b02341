use crate::EgoNetwork;
use egonet_core::{ContextId, EgoNetError, PersonId, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriadicClosure {
    /// Share of inspected pairs whose members are adjacent, in [0, 1].
    pub hit_rate: f64,
    pub pairs_inspected: usize,
}

/// Tests strong triadic closure: two alters the ego is strongly tied to
/// should tend to be tied to each other.
pub struct TriadicClosureValidator<'a> {
    network: &'a EgoNetwork,
}

impl<'a> TriadicClosureValidator<'a> {
    pub fn new(network: &'a EgoNetwork) -> Self {
        Self { network }
    }

    /// Alters at the far end of the ego's strong edges.
    pub fn strong_alters(&self) -> Vec<PersonId> {
        let ego = self.network.ego();
        self.network
            .graph()
            .edges()
            .filter(|(key, tie)| tie.strong && key.touches(ego))
            .filter_map(|(key, _)| key.other(ego))
            .collect()
    }

    pub fn validate(&self) -> Result<TriadicClosure> {
        let alters = self.strong_alters();
        if alters.is_empty() {
            return Err(EgoNetError::EmptyStrongTieSet);
        }
        Ok(self.closure_over(&alters))
    }

    /// Only strong ties to alters known from `context` are paired.
    pub fn validate_within_context(&self, context: ContextId) -> Result<TriadicClosure> {
        self.network.contexts().get(context)?;
        let alters = self.strong_alters();
        if alters.is_empty() {
            return Err(EgoNetError::EmptyStrongTieSet);
        }
        let store = self.network.store();
        let in_context: Vec<PersonId> = alters
            .into_iter()
            .filter(|id| store.get(*id).and_then(|p| p.known_from) == Some(context))
            .collect();
        Ok(self.closure_over(&in_context))
    }

    fn closure_over(&self, alters: &[PersonId]) -> TriadicClosure {
        let graph = self.network.graph();
        let mut hits = 0usize;
        let mut pairs = 0usize;
        for (i, &u) in alters.iter().enumerate() {
            for &v in &alters[i + 1..] {
                pairs += 1;
                if graph.has_edge(u, v) {
                    hits += 1;
                }
            }
        }
        debug!(strong = alters.len(), pairs, hits, "Inspected strong-tie pairs");

        let hit_rate = if pairs == 0 {
            0.0
        } else {
            hits as f64 / pairs as f64
        };
        TriadicClosure {
            hit_rate,
            pairs_inspected: pairs,
        }
    }
}
