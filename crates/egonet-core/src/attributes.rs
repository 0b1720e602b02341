use crate::person::check_tie_strength;
use crate::{AttributeValue, ContextId, EgoNetError, Person, PersonId, PersonRef, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Canonical form of a column name: trimmed, lowercase, spaces as underscores.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Normalized name for a custom column; empty names and built-in names are
/// refused.
fn custom_column_name(name: &str) -> Result<String> {
    let normalized = normalize_column(name);
    if normalized.is_empty() || Column::built_in(&normalized).is_some() {
        return Err(EgoNetError::InvalidAttribute(format!(
            "'{}' cannot be coded as a custom attribute",
            name
        )));
    }
    Ok(normalized)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    Name,
    Gender,
    TieStrength,
    StrongTie,
    KnownFrom,
    Mutuals,
    Custom(String),
}

impl Column {
    pub const BUILT_IN: [Column; 7] = [
        Column::Id,
        Column::Name,
        Column::Gender,
        Column::TieStrength,
        Column::StrongTie,
        Column::KnownFrom,
        Column::Mutuals,
    ];

    fn built_in(normalized: &str) -> Option<Column> {
        match normalized {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "gender" => Some(Column::Gender),
            "tie_strength" => Some(Column::TieStrength),
            "strong_tie" => Some(Column::StrongTie),
            "known_from" => Some(Column::KnownFrom),
            "mutuals" | "mutual_friends" => Some(Column::Mutuals),
            _ => None,
        }
    }

    /// `id` and `mutuals` identify rows rather than describe them.
    pub fn is_groupable(&self) -> bool {
        !matches!(self, Column::Id | Column::Mutuals)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Gender => "gender",
            Column::TieStrength => "tie_strength",
            Column::StrongTie => "strong_tie",
            Column::KnownFrom => "known_from",
            Column::Mutuals => "mutuals",
            Column::Custom(name) => name.as_str(),
        };
        write!(f, "{}", s)
    }
}

/// The roster table: one row per person, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    rows: BTreeMap<PersonId, Person>,
    custom_columns: BTreeSet<String>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row. Custom attribute keys are normalized on the way in, so a
    /// loaded `"Known Since"` is reachable as `known_since`.
    pub fn insert(&mut self, mut person: Person) -> Result<()> {
        if self.rows.contains_key(&person.id) {
            return Err(EgoNetError::DuplicatePerson(person.id));
        }
        if let Some(strength) = person.tie_strength {
            check_tie_strength(strength)?;
        }
        let mut attributes = BTreeMap::new();
        for (name, value) in std::mem::take(&mut person.attributes) {
            let column = custom_column_name(&name)?;
            if attributes.insert(column, value).is_some() {
                return Err(EgoNetError::InvalidAttribute(format!(
                    "'{}' collides with another attribute of person {}",
                    name, person.id
                )));
            }
        }
        person.attributes = attributes;
        for column in person.attributes.keys() {
            self.custom_columns.insert(column.clone());
        }
        self.rows.insert(person.id, person);
        Ok(())
    }

    pub fn remove(&mut self, id: PersonId) -> Option<Person> {
        self.rows.remove(&id)
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.rows.get_mut(&id)
    }

    pub fn person(&self, id: PersonId) -> Result<&Person> {
        self.rows
            .get(&id)
            .ok_or_else(|| EgoNetError::UnknownPerson(id.to_string()))
    }

    pub fn person_mut(&mut self, id: PersonId) -> Result<&mut Person> {
        self.rows
            .get_mut(&id)
            .ok_or_else(|| EgoNetError::UnknownPerson(id.to_string()))
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.rows.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.rows.values()
    }

    /// First person (by id) whose name matches exactly.
    pub fn name_to_id(&self, name: &str) -> Result<PersonId> {
        self.rows
            .values()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .ok_or_else(|| EgoNetError::UnknownPerson(name.to_string()))
    }

    pub fn id_to_name(&self, id: PersonId) -> Result<&str> {
        self.person(id).map(|p| p.name.as_str())
    }

    pub fn resolve(&self, person: &PersonRef) -> Result<PersonId> {
        match person {
            PersonRef::Id(id) if self.contains(*id) => Ok(*id),
            PersonRef::Id(id) => Err(EgoNetError::UnknownPerson(id.to_string())),
            PersonRef::Name(name) => self.name_to_id(name),
        }
    }

    pub fn ids_to_names(&self) -> BTreeMap<PersonId, String> {
        self.rows
            .values()
            .map(|p| (p.id, p.name.clone()))
            .collect()
    }

    /// Every column currently known, built-ins first.
    pub fn columns(&self) -> Vec<Column> {
        Column::BUILT_IN
            .iter()
            .cloned()
            .chain(self.custom_columns.iter().cloned().map(Column::Custom))
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<Column> {
        let normalized = normalize_column(name);
        if let Some(column) = Column::built_in(&normalized) {
            return Ok(column);
        }
        if self.custom_columns.contains(&normalized) {
            return Ok(Column::Custom(normalized));
        }
        Err(EgoNetError::InvalidAttribute(format!(
            "'{}' is not a roster column",
            name
        )))
    }

    /// Like [`column`](Self::column) but refuses identity columns.
    pub fn groupable_column(&self, name: &str) -> Result<Column> {
        let column = self.column(name)?;
        if !column.is_groupable() {
            return Err(EgoNetError::InvalidAttribute(format!(
                "'{}' is not a groupable attribute",
                column
            )));
        }
        Ok(column)
    }

    pub fn value(&self, person: &Person, column: &Column) -> Option<AttributeValue> {
        match column {
            Column::Id => Some(AttributeValue::Int(person.id as i64)),
            Column::Name => Some(AttributeValue::Text(person.name.clone())),
            Column::Gender => Some(person.gender.into()),
            Column::TieStrength => person
                .tie_strength
                .map(|s| AttributeValue::Text(format!("{}", s))),
            Column::StrongTie => person.strong_tie.map(|s| AttributeValue::Int(s as i64)),
            Column::KnownFrom => person.known_from.map(|c| AttributeValue::Int(c as i64)),
            Column::Mutuals => Some(AttributeValue::Int(person.mutual_friends.len() as i64)),
            Column::Custom(name) => person.attributes.get(name).cloned(),
        }
    }

    /// Codes a custom attribute, registering the column on first use.
    pub fn set_attribute(
        &mut self,
        id: PersonId,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let normalized = custom_column_name(name)?;
        let person = self.person_mut(id)?;
        person.attributes.insert(normalized.clone(), value.into());
        self.custom_columns.insert(normalized);
        Ok(())
    }

    pub fn people_known_from(&self, context: ContextId) -> Vec<&Person> {
        self.rows
            .values()
            .filter(|p| p.known_from == Some(context))
            .collect()
    }

    /// Roster members in a person's stored mutual set; dangling ids are skipped.
    pub fn mutual_friends_of(&self, id: PersonId) -> Result<Vec<&Person>> {
        let person = self.person(id)?;
        Ok(person
            .mutual_friends
            .iter()
            .filter_map(|m| self.rows.get(m))
            .collect())
    }

    pub fn friend_info(&self, id: PersonId) -> Result<Vec<(Column, Option<AttributeValue>)>> {
        let person = self.person(id)?;
        Ok(self
            .columns()
            .into_iter()
            .map(|c| {
                let v = self.value(person, &c);
                (c, v)
            })
            .collect())
    }

    /// Drops mutual-friend ids that are not roster members. Returns how many
    /// references were removed.
    pub fn prune_dangling_mutuals(&mut self) -> usize {
        let members: BTreeSet<PersonId> = self.rows.keys().copied().collect();
        let mut removed = 0;
        for person in self.rows.values_mut() {
            let before = person.mutual_friends.len();
            person.mutual_friends.retain(|m| members.contains(m));
            removed += before - person.mutual_friends.len();
        }
        removed
    }
}
