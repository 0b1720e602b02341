use egonet_core::{Person, PersonId};
use serde::{Deserialize, Serialize};

/// Unordered pair of endpoints, stored low id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    lo: PersonId,
    hi: PersonId,
}

impl EdgeKey {
    pub fn new(a: PersonId, b: PersonId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn endpoints(&self) -> (PersonId, PersonId) {
        (self.lo, self.hi)
    }

    pub fn touches(&self, id: PersonId) -> bool {
        self.lo == id || self.hi == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other(&self, id: PersonId) -> Option<PersonId> {
        if self.lo == id {
            Some(self.hi)
        } else if self.hi == id {
            Some(self.lo)
        } else {
            None
        }
    }
}

/// Attributes carried by every edge. Both fields always hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tie {
    pub strong: bool,
    pub weight: f64,
}

impl Default for Tie {
    fn default() -> Self {
        Self {
            strong: false,
            weight: 1.0,
        }
    }
}

impl Tie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tie between the ego and `alter`, taken from the alter's coding.
    pub fn to_alter(alter: &Person) -> Self {
        Self {
            strong: alter.is_strong_tie(),
            weight: alter.tie_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_strong(mut self, strong: bool) -> Self {
        self.strong = strong;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_key_is_order_independent() {
        assert_eq!(EdgeKey::new(5, 2), EdgeKey::new(2, 5));
        let key = EdgeKey::new(5, 2);
        assert_eq!(key.endpoints(), (2, 5));
        assert_eq!(key.other(2), Some(5));
        assert_eq!(key.other(9), None);
    }

    #[test]
    fn alter_tie_uses_defaults_for_missing_codes() {
        let tie = Tie::to_alter(&Person::new(3, "Cal"));
        assert_eq!(tie, Tie::default());

        let tie = Tie::to_alter(&Person::new(3, "Cal").with_strong_tie(true).with_tie_strength(0.4));
        assert!(tie.strong);
        assert_eq!(tie.weight, 0.4);
    }
}
