use super::MetricsEngine;
use egonet_core::{AttributeValue, Result};
use std::collections::BTreeMap;
use tracing::debug;

impl<'a> MetricsEngine<'a> {
    /// Mean share of same-valued contacts per attribute value.
    ///
    /// For every alter with a value `v`, the share is the number of roster
    /// mutual friends holding `v`, plus one if the ego holds `v`, over the
    /// number of mutual friends plus one. An alter with no mutual friends in
    /// the roster contributes 0 but still counts toward the mean. The ego
    /// only serves as the extra comparison point and is never scored itself.
    /// Alters without a value are skipped; a missing value never matches.
    pub fn associativity_by_attribute(&self, attribute: &str) -> Result<BTreeMap<AttributeValue, f64>> {
        let store = self.network.store();
        let ego = self.network.ego();
        let column = store.groupable_column(attribute)?;
        let ego_value = store.get(ego).and_then(|p| store.value(p, &column));

        let mut shares: BTreeMap<AttributeValue, Vec<f64>> = BTreeMap::new();
        let mut dangling = 0usize;
        for person in store.iter().filter(|p| p.id != ego) {
            let Some(value) = store.value(person, &column) else {
                continue;
            };

            let mut hits = 0usize;
            let mut total = 0usize;
            for mutual in person.mutual_friends.iter().filter(|m| **m != ego) {
                let Some(friend) = store.get(*mutual) else {
                    dangling += 1;
                    continue;
                };
                if store.value(friend, &column).as_ref() == Some(&value) {
                    hits += 1;
                }
                total += 1;
            }

            let share = if total == 0 {
                0.0
            } else {
                if ego_value.as_ref() == Some(&value) {
                    hits += 1;
                }
                hits as f64 / (total + 1) as f64
            };
            shares.entry(value).or_default().push(share);
        }

        if dangling > 0 {
            debug!(dangling, "Skipped mutual friends outside the roster");
        }

        Ok(shares
            .into_iter()
            .map(|(value, values)| {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (value, mean)
            })
            .collect())
    }
}
