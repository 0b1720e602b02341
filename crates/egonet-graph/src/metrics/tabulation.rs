use super::MetricsEngine;
use egonet_core::{AttributeValue, Column, ContextId, Result};
use std::collections::BTreeMap;

/// Relative frequency of each value of an attribute within some group.
/// People with no value are tallied under `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub counts: BTreeMap<Option<AttributeValue>, usize>,
    pub sample_size: usize,
}

impl Breakdown {
    fn tally<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<AttributeValue>>,
    {
        let mut counts = BTreeMap::new();
        let mut sample_size = 0;
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
            sample_size += 1;
        }
        Self {
            counts,
            sample_size,
        }
    }

    pub fn shares(&self) -> BTreeMap<Option<AttributeValue>, f64> {
        self.counts
            .iter()
            .map(|(value, count)| (value.clone(), *count as f64 / self.sample_size as f64))
            .collect()
    }

    /// Share of `value`; 0 when it does not occur.
    pub fn share(&self, value: impl Into<AttributeValue>) -> f64 {
        match self.counts.get(&Some(value.into())) {
            Some(count) => *count as f64 / self.sample_size as f64,
            None => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_size == 0
    }
}

impl<'a> MetricsEngine<'a> {
    /// Value distribution of `attribute` over the whole roster, ego included.
    pub fn attribute_breakdown(&self, attribute: &str) -> Result<Breakdown> {
        let store = self.network.store();
        let column = store.groupable_column(attribute)?;
        Ok(Breakdown::tally(
            store.iter().map(|p| store.value(p, &column)),
        ))
    }

    /// Distribution of `attribute_two` among people whose `attribute_one`
    /// equals `group_value`.
    pub fn attribute_by_attribute(
        &self,
        attribute_one: &str,
        group_value: &AttributeValue,
        attribute_two: &str,
    ) -> Result<Breakdown> {
        let store = self.network.store();
        let group_column = store.column(attribute_one)?;
        let column = store.column(attribute_two)?;
        Ok(Breakdown::tally(
            store
                .iter()
                .filter(|p| store.value(p, &group_column).as_ref() == Some(group_value))
                .map(|p| store.value(p, &column)),
        ))
    }

    /// [`attribute_by_attribute`](Self::attribute_by_attribute) with the group
    /// fixed to the people known from `context`.
    pub fn context_breakdown(&self, context: ContextId, attribute: &str) -> Result<Breakdown> {
        self.network.contexts().get(context)?;
        self.attribute_by_attribute(
            &Column::KnownFrom.to_string(),
            &AttributeValue::Int(context as i64),
            attribute,
        )
    }
}
