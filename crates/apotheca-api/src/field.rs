//! Explicit three-state optional field.
//!
//! Partial updates need to tell "leave this alone" apart from "clear this".
//! `Field<T>` makes that distinction once, for every optional field, instead
//! of each call site guessing from `Option<T>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field in a partial update: omitted, explicitly null, or present.
///
/// On the wire an omitted field is absent from the JSON object, a null
/// field is `null`, and a present field carries its value. Struct fields of
/// this type must be annotated with
/// `#[serde(default, skip_serializing_if = "Field::is_omitted")]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Omitted,
    Null,
    Present(T),
}

impl<T> Field<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `Some(v)` becomes `Present(v)`, `None` becomes `Omitted`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Omitted, Self::Present)
    }

    /// Apply this field to an optional target value.
    pub fn apply_to_option(self, target: &mut Option<T>) {
        match self {
            Self::Omitted => {}
            Self::Null => *target = None,
            Self::Present(v) => *target = Some(v),
        }
    }
}

impl<T: Default> Field<T> {
    /// Apply this field to a value whose "cleared" state is `T::default()`.
    pub fn apply_or_default(self, target: &mut T) {
        match self {
            Self::Omitted => {}
            Self::Null => *target = T::default(),
            Self::Present(v) => *target = v,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Only reached when the containing struct forgot `skip_serializing_if`.
            Self::Omitted | Self::Null => serializer.serialize_none(),
            Self::Present(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Absent keys never reach here; `#[serde(default)]` yields `Omitted`.
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Self::Null, Self::Present))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct ShelfPatch {
        #[serde(default, skip_serializing_if = "Field::is_omitted")]
        location: Field<String>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: ShelfPatch = serde_json::from_value(json!({})).unwrap();
        let null: ShelfPatch = serde_json::from_value(json!({ "location": null })).unwrap();
        let value: ShelfPatch = serde_json::from_value(json!({ "location": "Shelf A" })).unwrap();

        assert_eq!(absent.location, Field::Omitted);
        assert_eq!(null.location, Field::Null);
        assert_eq!(value.location, Field::Present("Shelf A".into()));
    }

    #[test]
    fn serializes_omitted_as_missing_key() {
        let omitted = serde_json::to_value(ShelfPatch { location: Field::Omitted }).unwrap();
        let null = serde_json::to_value(ShelfPatch { location: Field::Null }).unwrap();

        assert_eq!(omitted, json!({}));
        assert_eq!(null, json!({ "location": null }));
    }

    #[test]
    fn apply_to_option_clears_on_null() {
        let mut target = Some(3);
        Field::Omitted.apply_to_option(&mut target);
        assert_eq!(target, Some(3));
        Field::Null.apply_to_option(&mut target);
        assert_eq!(target, None);
        Field::Present(7).apply_to_option(&mut target);
        assert_eq!(target, Some(7));
    }

    #[test]
    fn apply_or_default_resets_lists() {
        let mut list = vec!["a".to_string()];
        Field::<Vec<String>>::Null.apply_or_default(&mut list);
        assert!(list.is_empty());
    }
}
