//! Operation step records - configurations and consumed materials

use serde::{Deserialize, Serialize};

use crate::entities::tech_specs::TechSpecs;

/// A physical material/component consumed at an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialInfo {
    /// Leading whitespace-delimited token of `name`
    pub code: String,

    /// Full material line as written on the sheet
    pub name: String,

    /// Size labels this material is used for
    #[serde(default)]
    pub sizes: Vec<String>,
}

impl MaterialInfo {
    pub fn new(name: impl Into<String>, sizes: Vec<String>) -> Self {
        let name = name.into();
        let code = name.split_whitespace().next().unwrap_or_default().to_string();
        Self { code, name, sizes }
    }

    /// True if any of this material's sizes appears in `sizes`
    pub fn applies_to_any(&self, sizes: &[String]) -> bool {
        self.sizes.iter().any(|s| sizes.contains(s))
    }
}

/// One machine/technical configuration of an operation, scoped to a sub-variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationConfig {
    /// Sub-variant id, zero-padded to three digits on raw sheets
    pub variant_id: String,

    pub machine: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,

    #[serde(default)]
    pub applicable_sizes: Vec<String>,

    pub needle_type: String,
    pub needle_size: String,
    pub seam: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitch_cm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needle_throw: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wage_group: Option<String>,

    #[serde(default)]
    pub detail_general: String,

    #[serde(default)]
    pub detail_sku: String,
}

impl OperationConfig {
    pub fn new(variant_id: impl Into<String>, applicable_sizes: Vec<String>) -> Self {
        Self {
            variant_id: variant_id.into(),
            applicable_sizes,
            ..Default::default()
        }
    }

    /// Technical fields in their exported grouping
    pub fn tech_specs(&self) -> TechSpecs {
        TechSpecs {
            needle_type: self.needle_type.clone(),
            needle_size: self.needle_size.clone(),
            seam: self.seam.clone(),
            stitch_cm: self.stitch_cm.clone().unwrap_or_default(),
            needle_throw: self.needle_throw.clone().unwrap_or_default(),
        }
    }

    /// Copy parsed technical fields onto this config
    pub fn apply_tech_specs(&mut self, specs: TechSpecs) {
        self.needle_type = specs.needle_type;
        self.needle_size = specs.needle_size;
        self.seam = specs.seam;
        self.stitch_cm = non_empty(specs.stitch_cm);
        self.needle_throw = non_empty(specs.needle_throw);
    }
}

/// One operation step (`stt`) within a colour variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationData {
    /// Operation step code, unique within a colour variant
    pub stt: String,

    pub description: String,

    pub section: String,

    #[serde(default)]
    pub configs: Vec<OperationConfig>,

    #[serde(default)]
    pub materials: Vec<MaterialInfo>,

    #[serde(default)]
    pub all_sizes: Vec<String>,
}

impl OperationData {
    pub fn new(
        stt: impl Into<String>,
        description: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            stt: stt.into(),
            description: description.into(),
            section: section.into(),
            ..Default::default()
        }
    }

    /// Get the configuration for a sub-variant id
    pub fn config(&self, variant_id: &str) -> Option<&OperationConfig> {
        self.configs.iter().find(|c| c.variant_id == variant_id)
    }

    /// Index of the configuration for `variant_id`, inserting `make()` if absent
    pub fn config_index_or_insert_with<F>(&mut self, variant_id: &str, make: F) -> usize
    where
        F: FnOnce() -> OperationConfig,
    {
        match self.configs.iter().position(|c| c.variant_id == variant_id) {
            Some(idx) => idx,
            None => {
                self.configs.push(make());
                self.configs.len() - 1
            }
        }
    }

    /// Materials whose sizes intersect the given configuration's sizes
    pub fn materials_for<'a>(
        &'a self,
        config: &'a OperationConfig,
    ) -> impl Iterator<Item = &'a MaterialInfo> + 'a {
        self.materials
            .iter()
            .filter(move |m| m.applies_to_any(&config.applicable_sizes))
    }
}

/// Empty strings become `None`
pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_material_code_is_leading_token() {
        let mat = MaterialInfo::new("TH-4020 Thread 40/2 white", vec![]);
        assert_eq!(mat.code, "TH-4020");
        assert_eq!(mat.name, "TH-4020 Thread 40/2 white");
    }

    #[test]
    fn test_material_code_of_blank_name() {
        let mat = MaterialInfo::new("", vec![]);
        assert_eq!(mat.code, "");
    }

    #[test]
    fn test_config_index_or_insert_is_unique_per_variant() {
        let mut op = OperationData::new("010", "Join Shoulder", "SEWING");
        let a = op.config_index_or_insert_with("001", || OperationConfig::new("001", vec![]));
        let b = op.config_index_or_insert_with("002", || OperationConfig::new("002", vec![]));
        let again = op.config_index_or_insert_with("001", || OperationConfig::new("001", vec![]));

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(op.configs.len(), 2);
    }

    #[test]
    fn test_materials_for_config_intersects_sizes() {
        let mut op = OperationData::new("010", "Join Shoulder", "SEWING");
        op.materials.push(MaterialInfo::new("Thread small", sizes(&["S", "M"])));
        op.materials.push(MaterialInfo::new("Thread large", sizes(&["XL"])));
        let cfg = OperationConfig::new("001", sizes(&["M", "L"]));

        let names: Vec<&str> = op.materials_for(&cfg).map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Thread small"]);
    }

    #[test]
    fn test_tech_specs_round_trip_through_config() {
        let mut cfg = OperationConfig::new("001", vec![]);
        cfg.apply_tech_specs(TechSpecs::parse(
            "Type: DBx1 | N.Size: 14 | Seam: SS | Stitch:  | Throw: 2.5",
        ));

        assert_eq!(cfg.stitch_cm, None);
        assert_eq!(cfg.needle_throw.as_deref(), Some("2.5"));
        assert_eq!(
            cfg.tech_specs().to_string(),
            "Type: DBx1 | N.Size: 14 | Seam: SS | Stitch:  | Throw: 2.5"
        );
    }
}
