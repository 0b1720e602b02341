use crate::{AttributeValue, ContextId, EgoNetError, Gender, PersonId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One roster row: a person in the ego's network and everything the analyst
/// has coded about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub tie_strength: Option<f64>,
    #[serde(default)]
    pub strong_tie: Option<bool>,
    #[serde(default)]
    pub known_from: Option<ContextId>,
    /// May reference people outside the roster after sampling or a partial load.
    #[serde(default)]
    pub mutual_friends: BTreeSet<PersonId>,
}

impl Person {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: Gender::Unspecified,
            attributes: BTreeMap::new(),
            tie_strength: None,
            strong_tie: None,
            known_from: None,
            mutual_friends: BTreeSet::new(),
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes
            .insert(crate::attributes::normalize_column(name), value.into());
        self
    }

    pub fn with_tie_strength(mut self, strength: f64) -> Self {
        self.tie_strength = Some(strength);
        self
    }

    pub fn with_strong_tie(mut self, strong: bool) -> Self {
        self.strong_tie = Some(strong);
        self
    }

    pub fn with_known_from(mut self, context: ContextId) -> Self {
        self.known_from = Some(context);
        self
    }

    pub fn with_mutual_friends<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = PersonId>,
    {
        self.mutual_friends.extend(ids);
        self
    }

    /// Weight of the tie to the ego; uncoded strength counts as a full tie.
    pub fn tie_weight(&self) -> f64 {
        self.tie_strength.unwrap_or(1.0)
    }

    pub fn is_strong_tie(&self) -> bool {
        self.strong_tie.unwrap_or(false)
    }
}

/// Tie strength must be a finite value in [0, 1].
pub fn check_tie_strength(strength: f64) -> Result<()> {
    if (0.0..=1.0).contains(&strength) {
        Ok(())
    } else {
        Err(EgoNetError::InvalidTieStrength(strength))
    }
}

/// Hand-off from an external loader: the ego id and every person fetched,
/// in fetch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub ego: PersonId,
    pub people: Vec<Person>,
}

impl Roster {
    pub fn new(ego: PersonId, people: Vec<Person>) -> Self {
        Self { ego, people }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let roster: Roster = serde_json::from_str(json)?;
        roster.validate()?;
        Ok(roster)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.people.iter().any(|p| p.id == self.ego) {
            return Err(EgoNetError::MissingEgo);
        }
        let mut seen = BTreeSet::new();
        for person in &self.people {
            if !seen.insert(person.id) {
                return Err(EgoNetError::DuplicatePerson(person.id));
            }
            if let Some(strength) = person.tie_strength {
                check_tie_strength(strength)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_tie_data_maps_to_defaults() {
        let p = Person::new(7, "Ada");
        assert_eq!(p.tie_weight(), 1.0);
        assert!(!p.is_strong_tie());

        let p = p.with_tie_strength(0.25).with_strong_tie(true);
        assert_eq!(p.tie_weight(), 0.25);
        assert!(p.is_strong_tie());
    }

    #[test]
    fn roster_json_requires_ego_row() {
        let json = r#"{"ego": 1, "people": [{"id": 2, "name": "Bea"}]}"#;
        assert!(matches!(Roster::from_json(json), Err(EgoNetError::MissingEgo)));

        let json = r#"{
            "ego": 1,
            "people": [
                {"id": 1, "name": "Me", "gender": "female"},
                {"id": 2, "name": "Bea", "mutual_friends": [1, 99], "known_from": 3}
            ]
        }"#;
        let roster = Roster::from_json(json).unwrap();
        assert_eq!(roster.people.len(), 2);
        assert_eq!(roster.people[1].known_from, Some(3));
        assert!(roster.people[1].mutual_friends.contains(&99));
    }

    #[test]
    fn roster_json_rejects_out_of_range_tie_strength() {
        let json = r#"{
            "ego": 1,
            "people": [
                {"id": 1, "name": "Me"},
                {"id": 2, "name": "Bea", "tie_strength": 7.5}
            ]
        }"#;
        assert!(matches!(
            Roster::from_json(json),
            Err(EgoNetError::InvalidTieStrength(s)) if s == 7.5
        ));
        assert!(check_tie_strength(0.0).is_ok());
        assert!(check_tie_strength(f64::INFINITY).is_err());
    }

    #[test]
    fn roster_rejects_duplicate_ids() {
        let roster = Roster::new(1, vec![Person::new(1, "Me"), Person::new(1, "Me again")]);
        assert!(matches!(roster.validate(), Err(EgoNetError::DuplicatePerson(1))));
    }
}
