//! Registry of enum types and their ordered labels.

use std::collections::HashMap;

use super::schema::EnumRow;
use crate::error::{GenError, Result};

/// Enum type name to ordered label list.
///
/// Types keep first-seen order; labels keep row order. Rows are expected to
/// arrive sorted by the catalog query, and the builder only groups them.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    order: Vec<String>,
    labels: HashMap<String, Vec<String>>,
}

impl EnumRegistry {
    /// Build the registry from raw catalog rows.
    ///
    /// Empty labels are dropped, and a type left without labels gets no entry.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = EnumRow>,
    {
        let mut registry = Self::default();

        for row in rows {
            if row.label.is_empty() {
                continue;
            }
            match registry.labels.get_mut(&row.type_name) {
                Some(labels) => labels.push(row.label),
                None => {
                    registry.order.push(row.type_name.clone());
                    registry.labels.insert(row.type_name, vec![row.label]);
                }
            }
        }

        registry
    }

    /// Check if a type is registered.
    pub fn has(&self, type_name: &str) -> bool {
        self.labels.contains_key(type_name)
    }

    /// Ordered labels of a registered type.
    ///
    /// # Errors
    ///
    /// Returns `GenError::EnumLookup` when the type is not registered.
    pub fn labels_of(&self, type_name: &str) -> Result<&[String]> {
        self.labels
            .get(type_name)
            .map(Vec::as_slice)
            .ok_or_else(|| GenError::EnumLookup(type_name.to_string()))
    }

    /// Registered type names in first-seen order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<EnumRow> {
        vec![
            EnumRow::new("status", "active", 1.0),
            EnumRow::new("mood", "happy", 1.0),
            EnumRow::new("status", "inactive", 2.0),
            EnumRow::new("mood", "sad", 2.0),
        ]
    }

    #[test]
    fn test_groups_by_type_in_first_seen_order() {
        let registry = EnumRegistry::build(rows());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["status", "mood"]);
        assert_eq!(registry.labels_of("status").unwrap(), ["active", "inactive"]);
        assert_eq!(registry.labels_of("mood").unwrap(), ["happy", "sad"]);
    }

    #[test]
    fn test_does_not_resort_labels() {
        let registry = EnumRegistry::build(vec![
            EnumRow::new("level", "high", 3.0),
            EnumRow::new("level", "low", 1.0),
        ]);
        assert_eq!(registry.labels_of("level").unwrap(), ["high", "low"]);
    }

    #[test]
    fn test_empty_labels_not_stored() {
        let registry = EnumRegistry::build(vec![EnumRow::new("ghost", "", 1.0)]);
        assert!(!registry.has("ghost"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_missing_type_fails() {
        let registry = EnumRegistry::build(rows());
        assert!(registry.has("status"));
        assert!(!registry.has("color"));
        let err = registry.labels_of("color").unwrap_err();
        assert!(matches!(err, GenError::EnumLookup(ref name) if name == "color"));
    }
}
