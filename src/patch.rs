//! Three-state fields for partial updates
//!
//! An update payload must tell apart a field that was left out (keep the
//! stored value), a field sent as `null` (clear it) and a field sent with a
//! value (replace it). `Option<Option<T>>` can express that but reads poorly,
//! so update payloads use [`Patch`] for every optional column.
//!
//! With serde, annotate the field with `#[serde(default)]`: a missing key
//! deserializes to [`Patch::Absent`], `null` to [`Patch::Null`].
//!
//! ```rust
//! use electoral::patch::Patch;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Payload {
//!     #[serde(default)]
//!     voting_table_id: Patch<i64>,
//! }
//!
//! let absent: Payload = serde_json::from_str("{}").unwrap();
//! assert!(absent.voting_table_id.is_absent());
//!
//! let cleared: Payload = serde_json::from_str(r#"{"voting_table_id":null}"#).unwrap();
//! assert_eq!(cleared.voting_table_id, Patch::Null);
//!
//! let set: Payload = serde_json::from_str(r#"{"voting_table_id":7}"#).unwrap();
//! assert_eq!(set.voting_table_id, Patch::Value(7));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single field of a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not supplied; leave the stored value untouched
    Absent,
    /// Field explicitly `null`; clear the stored value
    Null,
    /// Field supplied with a new value
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// The supplied value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(value),
        }
    }

    /// Apply this patch to an optional stored column
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(value) => *target = Some(value),
        }
    }

    /// Collapse into the nested-option form
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(value) => Some(Some(value)),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// A present `Option` is an explicit assignment: `None` clears
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_optional_column() {
        let mut column = Some(3);
        Patch::Absent.apply_to(&mut column);
        assert_eq!(column, Some(3));

        Patch::Value(9).apply_to(&mut column);
        assert_eq!(column, Some(9));

        Patch::Null.apply_to(&mut column);
        assert_eq!(column, None);
    }

    #[test]
    fn test_nested_option_form() {
        assert_eq!(Patch::<i64>::Absent.into_option(), None);
        assert_eq!(Patch::<i64>::Null.into_option(), Some(None));
        assert_eq!(Patch::Value(1).into_option(), Some(Some(1)));
        assert_eq!(Patch::Value(5).value(), Some(&5));
    }
}
