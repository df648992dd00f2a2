//! Product variant - one colour code ingested from one file

use serde::{Deserialize, Serialize};

use crate::entities::operation::OperationData;

/// The colour-scoped top-level record. `color` is the merge key across files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,

    /// Name of the file this variant was read from
    pub file_name: String,

    pub color: String,

    #[serde(default)]
    pub operations: Vec<OperationData>,

    /// Union of every operation's `all_sizes`
    #[serde(default)]
    pub unique_sizes: Vec<String>,
}

impl ProductVariant {
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            color: color.into(),
            operations: Vec::new(),
            unique_sizes: Vec::new(),
        }
    }

    pub fn operation(&self, stt: &str) -> Option<&OperationData> {
        self.operations.iter().find(|op| op.stt == stt)
    }

    /// Index of the operation for `stt`, inserting `make()` if absent
    pub fn operation_index_or_insert_with<F>(&mut self, stt: &str, make: F) -> usize
    where
        F: FnOnce() -> OperationData,
    {
        match self.operations.iter().position(|op| op.stt == stt) {
            Some(idx) => idx,
            None => {
                self.operations.push(make());
                self.operations.len() - 1
            }
        }
    }

    /// Total number of configurations across all operations
    pub fn config_count(&self) -> usize {
        self.operations.iter().map(|op| op.configs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_lookup_by_stt() {
        let mut variant = ProductVariant::new("a-RED", "a.csv", "RED");
        variant
            .operations
            .push(OperationData::new("010", "Join Shoulder", "SEWING"));

        assert!(variant.operation("010").is_some());
        assert!(variant.operation("020").is_none());
    }

    #[test]
    fn test_operation_index_or_insert_keeps_one_per_stt() {
        let mut variant = ProductVariant::new("a-RED", "a.csv", "RED");
        let first =
            variant.operation_index_or_insert_with("010", || OperationData::new("010", "A", "S"));
        let second =
            variant.operation_index_or_insert_with("010", || OperationData::new("010", "B", "S"));

        assert_eq!(first, second);
        assert_eq!(variant.operations.len(), 1);
        assert_eq!(variant.operations[0].description, "A");
    }

    #[test]
    fn test_variant_json_roundtrip() {
        let mut variant = ProductVariant::new("a-RED", "a.csv", "RED");
        variant
            .operations
            .push(OperationData::new("010", "Join Shoulder", "SEWING"));
        variant.unique_sizes = vec!["M".to_string(), "S".to_string()];

        let json = serde_json::to_string(&variant).unwrap();
        let parsed: ProductVariant = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, variant);
    }
}
