use crate::{EdgeKey, Tie};
use egonet_core::{EgoNetError, PersonId, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Undirected attributed graph over person ids. No self-loops, no
/// parallel edges; every edge carries a [`Tie`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialGraph {
    adjacency: BTreeMap<PersonId, BTreeSet<PersonId>>,
    ties: BTreeMap<EdgeKey, Tie>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the node was already present.
    pub fn add_node(&mut self, id: PersonId) -> bool {
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, BTreeSet::new());
        true
    }

    /// Removes the node and every edge touching it.
    pub fn remove_node(&mut self, id: PersonId) -> bool {
        let Some(neighbors) = self.adjacency.remove(&id) else {
            return false;
        };
        for neighbor in neighbors {
            if let Some(set) = self.adjacency.get_mut(&neighbor) {
                set.remove(&id);
            }
            self.ties.remove(&EdgeKey::new(id, neighbor));
        }
        true
    }

    pub fn contains_node(&self, id: PersonId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Adds an edge between two existing nodes. An existing edge keeps its
    /// tie; self-loops are ignored. Returns whether a new edge was created.
    pub fn add_edge(&mut self, a: PersonId, b: PersonId, tie: Tie) -> Result<bool> {
        for id in [a, b] {
            if !self.contains_node(id) {
                return Err(EgoNetError::unknown_node(id));
            }
        }
        if a == b {
            return Ok(false);
        }
        let key = EdgeKey::new(a, b);
        if self.ties.contains_key(&key) {
            return Ok(false);
        }
        self.ties.insert(key, tie);
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.insert(b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.insert(a);
        }
        Ok(true)
    }

    pub fn has_edge(&self, a: PersonId, b: PersonId) -> bool {
        self.ties.contains_key(&EdgeKey::new(a, b))
    }

    pub fn tie(&self, a: PersonId, b: PersonId) -> Option<&Tie> {
        self.ties.get(&EdgeKey::new(a, b))
    }

    pub fn tie_mut(&mut self, a: PersonId, b: PersonId) -> Option<&mut Tie> {
        self.ties.get_mut(&EdgeKey::new(a, b))
    }

    pub fn neighbors(&self, id: PersonId) -> Option<&BTreeSet<PersonId>> {
        self.adjacency.get(&id)
    }

    pub fn degree(&self, id: PersonId) -> Option<usize> {
        self.adjacency.get(&id).map(|n| n.len())
    }

    pub fn nodes(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Tie)> {
        self.ties.iter()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.ties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn isolates(&self) -> Vec<PersonId> {
        self.adjacency
            .iter()
            .filter(|(_, n)| n.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Structural copy with one node (and its edges) left out.
    pub fn without_node(&self, id: PersonId) -> SocialGraph {
        let mut copy = self.clone();
        copy.remove_node(id);
        copy
    }

    /// Subgraph induced by `nodes`; ids not in the graph are skipped.
    pub fn induced_subgraph(&self, nodes: &BTreeSet<PersonId>) -> SocialGraph {
        let adjacency = self
            .adjacency
            .iter()
            .filter(|(id, _)| nodes.contains(*id))
            .map(|(id, n)| (*id, n.intersection(nodes).copied().collect()))
            .collect();
        let ties = self
            .ties
            .iter()
            .filter(|(key, _)| {
                let (a, b) = key.endpoints();
                nodes.contains(&a) && nodes.contains(&b)
            })
            .map(|(key, tie)| (*key, *tie))
            .collect();
        SocialGraph { adjacency, ties }
    }

    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        (2 * self.edge_count()) as f64 / (n * (n - 1)) as f64
    }

    /// Hop distances from `source` to every reachable node, source included.
    pub fn bfs_distances(&self, source: PersonId) -> HashMap<PersonId, usize> {
        let mut dist = HashMap::new();
        if !self.contains_node(source) {
            return dist;
        }
        let mut queue = VecDeque::new();
        dist.insert(source, 0);
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for &neighbor in &self.adjacency[&current] {
                if !dist.contains_key(&neighbor) {
                    dist.insert(neighbor, d + 1);
                    queue.push_back(neighbor);
                }
            }
        }
        dist
    }

    pub fn connected_components(&self) -> Vec<BTreeSet<PersonId>> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::new();
        for id in self.nodes() {
            if seen.contains(&id) {
                continue;
            }
            let component: BTreeSet<PersonId> = self.bfs_distances(id).into_keys().collect();
            seen.extend(component.iter().copied());
            components.push(component);
        }
        components
    }

    pub(crate) fn dense(&self) -> DenseAdjacency {
        let ids: Vec<PersonId> = self.nodes().collect();
        let index: HashMap<PersonId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let neighbors = ids
            .iter()
            .map(|id| self.adjacency[id].iter().map(|n| index[n]).collect())
            .collect();
        DenseAdjacency { ids, neighbors }
    }
}

/// Index-addressed adjacency lists for the metric kernels.
pub(crate) struct DenseAdjacency {
    pub ids: Vec<PersonId>,
    pub neighbors: Vec<Vec<usize>>,
}

impl DenseAdjacency {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Hop distances from `source`; unreachable nodes hold `None`.
    pub fn distances_from(&self, source: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.len()];
        dist[source] = Some(0);
        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            let next = dist[v].map(|d| d + 1);
            for &w in &self.neighbors[v] {
                if dist[w].is_none() {
                    dist[w] = next;
                    queue.push_back(w);
                }
            }
        }
        dist
    }
}
