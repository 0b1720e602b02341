use crate::metrics::MetricsEngine;
use crate::triadic::TriadicClosureValidator;
use crate::{SocialGraph, Tie};
use egonet_core::{
    check_tie_strength, AnalysisConfig, AttributeStore, AttributeValue, ColorConfig,
    ContextCategory, ContextId, ContextRegistry, EgoNetError, Person, PersonId, PersonRef, Result,
    Roster, SamplingConfig,
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Explicit node → color assignment for renderers.
pub type NodeColors = BTreeMap<PersonId, String>;

/// Owns the roster and the graph derived from it. Every operation that adds
/// or removes a person touches both in the same call, so the graph's node set
/// always equals the roster's id set.
#[derive(Debug, Clone)]
pub struct EgoNetwork {
    ego: PersonId,
    store: AttributeStore,
    graph: SocialGraph,
    contexts: ContextRegistry,
    colors: NodeColors,
    color_config: ColorConfig,
}

impl EgoNetwork {
    /// Network holding only the ego. Fails if the ego row itself is invalid.
    pub fn new(ego: Person) -> Result<Self> {
        let ego_id = ego.id;
        let mut store = AttributeStore::new();
        store.insert(ego)?;
        let mut graph = SocialGraph::new();
        graph.add_node(ego_id);
        Ok(Self {
            ego: ego_id,
            store,
            graph,
            contexts: ContextRegistry::new(),
            colors: NodeColors::new(),
            color_config: ColorConfig::default(),
        })
    }

    /// Builds the network the way a fetched roster arrives: every alter is
    /// tied to the ego, then alter–alter edges come from the mutual lists.
    pub fn from_roster(roster: Roster) -> Result<Self> {
        roster.validate()?;
        let Roster { ego, people } = roster;

        let mut mutual_lists = Vec::with_capacity(people.len());
        let mut alters = Vec::with_capacity(people.len());
        let mut ego_row = None;
        for person in people {
            mutual_lists.push((person.id, person.mutual_friends.clone()));
            if person.id == ego {
                ego_row = Some(person);
            } else {
                alters.push(person);
            }
        }

        let mut network = Self::new(ego_row.ok_or(EgoNetError::MissingEgo)?)?;
        for alter in alters {
            network.add_alter(alter)?;
        }
        for (id, mutuals) in mutual_lists {
            network.infer_mutual_edges(id, mutuals)?;
        }

        info!(
            people = network.store.len(),
            edges = network.graph.edge_count(),
            "Loaded ego network"
        );
        Ok(network)
    }

    pub fn with_color_config(mut self, config: ColorConfig) -> Self {
        self.color_config = config;
        self
    }

    pub fn ego(&self) -> PersonId {
        self.ego
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    pub fn contexts(&self) -> &ContextRegistry {
        &self.contexts
    }

    pub fn colors(&self) -> &NodeColors {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Graph node set equals roster id set.
    pub fn is_consistent(&self) -> bool {
        self.graph.nodes().eq(self.store.ids())
    }

    /// Inserts the roster row and its node. Rows with an out-of-range tie
    /// strength or unusable attribute keys are refused before either is touched.
    pub fn add_person(&mut self, person: Person) -> Result<()> {
        let id = person.id;
        self.store.insert(person)?;
        self.graph.add_node(id);
        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Adds a person together with their direct tie to the ego.
    pub fn add_alter(&mut self, person: Person) -> Result<()> {
        let id = person.id;
        let tie = Tie::to_alter(&person);
        self.add_person(person)?;
        self.graph.add_edge(self.ego, id, tie)?;
        Ok(())
    }

    pub fn add_direct_edge(&mut self, a: PersonId, b: PersonId) -> Result<()> {
        let tie = self.tie_for(a, b);
        self.graph.add_edge(a, b, tie)?;
        Ok(())
    }

    /// Records `mutual_ids` on the person's row and ties them to every id that
    /// is a roster member. Ids outside the roster never become nodes.
    /// Returns the number of edges created.
    pub fn infer_mutual_edges<I>(&mut self, person_id: PersonId, mutual_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = PersonId>,
    {
        if !self.graph.contains_node(person_id) {
            return Err(EgoNetError::unknown_node(person_id));
        }
        let mutual_ids: BTreeSet<PersonId> = mutual_ids.into_iter().collect();

        let mut created = 0;
        for &other in &mutual_ids {
            if other == person_id || !self.store.contains(other) {
                continue;
            }
            let tie = self.tie_for(person_id, other);
            if self.graph.add_edge(person_id, other, tie)? {
                created += 1;
            }
        }

        self.store
            .person_mut(person_id)?
            .mutual_friends
            .extend(mutual_ids);
        Ok(created)
    }

    /// Restricts every stored mutual set to current roster members.
    pub fn prune_dangling_mutuals(&mut self) -> usize {
        let removed = self.store.prune_dangling_mutuals();
        info!(removed, "Pruned dangling mutual-friend references");
        removed
    }

    pub fn random_downsample(&mut self, target_count: usize) -> Result<Vec<PersonId>> {
        self.random_downsample_with_rng(target_count, &mut rand::rng())
    }

    /// Down-samples to the configured target, seeding the RNG when a seed is
    /// set. A roster already at or below the target is left alone.
    pub fn downsample_with_config(&mut self, config: &SamplingConfig) -> Result<Vec<PersonId>> {
        if self.store.len() <= config.target_count {
            debug!(
                size = self.store.len(),
                target = config.target_count,
                "Roster within sampling target"
            );
            return Ok(Vec::new());
        }
        match config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.random_downsample_with_rng(config.target_count, &mut rng)
            }
            None => self.random_downsample(config.target_count),
        }
    }

    /// Removes `len() - target_count` random alters along with their rows,
    /// edges and colors. The ego is never removed. Returns the removed ids.
    pub fn random_downsample_with_rng<R>(
        &mut self,
        target_count: usize,
        rng: &mut R,
    ) -> Result<Vec<PersonId>>
    where
        R: Rng + ?Sized,
    {
        let current = self.store.len();
        if target_count < 1 || target_count >= current {
            return Err(EgoNetError::InvalidSize {
                requested: target_count,
                current,
            });
        }

        let candidates: Vec<PersonId> = self.store.ids().filter(|id| *id != self.ego).collect();
        let mut removed: Vec<PersonId> = candidates
            .choose_multiple(rng, current - target_count)
            .copied()
            .collect();
        removed.sort_unstable();

        for &id in &removed {
            self.store.remove(id);
            self.graph.remove_node(id);
            self.colors.remove(&id);
        }
        debug_assert!(self.is_consistent());

        info!(
            kept = self.store.len(),
            removed = removed.len(),
            "Down-sampled roster; run prune_dangling_mutuals before mutual-count metrics"
        );
        Ok(removed)
    }

    /// Snapshot of the graph with the ego and the isolates its removal leaves
    /// behind taken out. The network itself is not touched.
    pub fn without_ego_view(&self) -> EgoFreeView {
        let mut graph = self.graph.without_node(self.ego);
        let isolates: BTreeSet<PersonId> = graph.isolates().into_iter().collect();
        for &id in &isolates {
            graph.remove_node(id);
        }
        let colors = self
            .colors
            .iter()
            .filter(|(id, _)| graph.contains_node(**id))
            .map(|(id, color)| (*id, color.clone()))
            .collect();
        debug!(
            nodes = graph.node_count(),
            isolates = isolates.len(),
            "Created ego-free view"
        );
        EgoFreeView {
            ego: self.ego,
            graph,
            isolates,
            colors,
        }
    }

    pub fn set_strong_tie(&mut self, person: impl Into<PersonRef>, strong: bool) -> Result<()> {
        let id = self.alter_id(person.into())?;
        self.store.person_mut(id)?.strong_tie = Some(strong);
        if let Some(tie) = self.graph.tie_mut(self.ego, id) {
            tie.strong = strong;
        }
        Ok(())
    }

    pub fn set_tie_strength(&mut self, person: impl Into<PersonRef>, strength: f64) -> Result<()> {
        check_tie_strength(strength)?;
        let id = self.alter_id(person.into())?;
        self.store.person_mut(id)?.tie_strength = Some(strength);
        if let Some(tie) = self.graph.tie_mut(self.ego, id) {
            tie.weight = strength;
        }
        Ok(())
    }

    pub fn code_known_from(&mut self, person: impl Into<PersonRef>, context: ContextId) -> Result<()> {
        self.contexts.get(context)?;
        let id = self.store.resolve(&person.into())?;
        self.store.person_mut(id)?.known_from = Some(context);
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        person: impl Into<PersonRef>,
        attribute: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let id = self.store.resolve(&person.into())?;
        self.store.set_attribute(id, attribute, value)
    }

    pub fn register_context(&mut self, label: impl Into<String>, category: ContextCategory) -> ContextId {
        self.contexts.register(label, category)
    }

    pub fn register_fallback_context(&mut self, label: impl Into<String>) -> ContextId {
        self.contexts.register_fallback(label)
    }

    /// Removes a context and clears it from every person coded with it.
    pub fn retire_context(&mut self, context: ContextId) -> Result<()> {
        self.contexts.retire(context)?;
        let coded: Vec<PersonId> = self
            .store
            .people_known_from(context)
            .iter()
            .map(|p| p.id)
            .collect();
        for id in coded {
            self.store.person_mut(id)?.known_from = None;
        }
        Ok(())
    }

    /// Colors every node by its value for `attribute`. The ego always gets
    /// the configured ego color; values missing from `palette` get the
    /// fallback color.
    pub fn define_colors(
        &mut self,
        attribute: &str,
        palette: &BTreeMap<AttributeValue, String>,
    ) -> Result<&NodeColors> {
        let column = self.store.column(attribute)?;
        let mut colors = NodeColors::new();
        for id in self.graph.nodes() {
            let color = if id == self.ego {
                self.color_config.ego.clone()
            } else {
                self.store
                    .get(id)
                    .and_then(|p| self.store.value(p, &column))
                    .and_then(|v| palette.get(&v).cloned())
                    .unwrap_or_else(|| self.color_config.fallback.clone())
            };
            colors.insert(id, color);
        }
        self.colors = colors;
        Ok(&self.colors)
    }

    pub fn name_to_id(&self, name: &str) -> Result<PersonId> {
        self.store.name_to_id(name)
    }

    pub fn id_to_name(&self, id: PersonId) -> Result<&str> {
        self.store.id_to_name(id)
    }

    pub fn metrics(&self) -> MetricsEngine<'_> {
        MetricsEngine::new(self, AnalysisConfig::default())
    }

    pub fn metrics_with(&self, config: AnalysisConfig) -> MetricsEngine<'_> {
        MetricsEngine::new(self, config)
    }

    pub fn triadic_closure(&self) -> TriadicClosureValidator<'_> {
        TriadicClosureValidator::new(self)
    }

    fn alter_id(&self, person: PersonRef) -> Result<PersonId> {
        let id = self.store.resolve(&person)?;
        if id == self.ego {
            return Err(EgoNetError::UnknownPerson(format!(
                "{} is the ego, not an alter",
                person
            )));
        }
        Ok(id)
    }

    fn tie_for(&self, a: PersonId, b: PersonId) -> Tie {
        let alter = if a == self.ego {
            b
        } else if b == self.ego {
            a
        } else {
            return Tie::default();
        };
        self.store
            .get(alter)
            .map(Tie::to_alter)
            .unwrap_or_default()
    }
}

/// Read-only ego-free snapshot. Dropping it is all the "restore" there is.
#[derive(Debug, Clone)]
pub struct EgoFreeView {
    ego: PersonId,
    graph: SocialGraph,
    isolates: BTreeSet<PersonId>,
    colors: NodeColors,
}

impl EgoFreeView {
    pub fn ego(&self) -> PersonId {
        self.ego
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    /// Alters left with no edges once the ego was removed.
    pub fn isolates(&self) -> &BTreeSet<PersonId> {
        &self.isolates
    }

    pub fn colors(&self) -> &NodeColors {
        &self.colors
    }

    pub fn into_graph(self) -> SocialGraph {
        self.graph
    }
}
