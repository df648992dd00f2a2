//! Rebuilds the variant graph from an exported summary document
//!
//! Column order: operation id, sub-variant id, section, colour code,
//! description, machine, material name, technical specs, sizes, mod level,
//! wage group. Rows with fewer than eight fields are dropped.

use tracing::trace;

use crate::entities::operation::non_empty;
use crate::entities::{MaterialInfo, OperationConfig, OperationData, ProductVariant, TechSpecs};
use crate::parser::sizes::{split_size_list, union_into, union_sorted};
use crate::parser::ParseOptions;

/// Minimum number of fields for a data row to be considered
pub const MIN_SUMMARY_FIELDS: usize = 8;

/// Material name the exporter writes when a configuration has no material
pub const PLACEHOLDER_MATERIAL: &str = "N/A";

/// One data row, borrowed from the tokenized line
struct SummaryRow<'a> {
    stt: &'a str,
    variant_id: &'a str,
    section: &'a str,
    color: &'a str,
    description: &'a str,
    machine: &'a str,
    material: &'a str,
    tech_specs: &'a str,
    sizes: Vec<String>,
    mod_level: &'a str,
    wage_group: &'a str,
}

impl<'a> SummaryRow<'a> {
    fn from_fields(fields: &'a [String]) -> Option<Self> {
        if fields.len() < MIN_SUMMARY_FIELDS {
            return None;
        }
        let get = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("");
        Some(Self {
            stt: get(0),
            variant_id: get(1),
            section: get(2),
            color: get(3),
            description: get(4),
            machine: get(5),
            material: get(6),
            tech_specs: get(7),
            sizes: split_size_list(get(8)),
            mod_level: get(9),
            wage_group: get(10),
        })
    }
}

/// Reconstruct one `ProductVariant` per colour from the rows after the header
pub fn reconstruct(data_rows: &[Vec<String>], file_name: &str, options: &ParseOptions) -> Vec<ProductVariant> {
    let mut variants: Vec<ProductVariant> = Vec::new();

    for (idx, fields) in data_rows.iter().enumerate() {
        let Some(row) = SummaryRow::from_fields(fields) else {
            trace!(row = idx + 2, fields = fields.len(), "skipping short summary row");
            continue;
        };

        let variant_idx = match variants.iter().position(|v| v.color == row.color) {
            Some(i) => i,
            None => {
                variants.push(ProductVariant::new(
                    format!("import-{}", row.color),
                    file_name,
                    row.color,
                ));
                variants.len() - 1
            }
        };
        let variant = &mut variants[variant_idx];

        let op_idx = variant.operation_index_or_insert_with(row.stt, || {
            OperationData::new(row.stt, row.description, row.section)
        });
        let operation = &mut variant.operations[op_idx];

        // A configuration is built from the first row carrying its sub-variant id
        operation.config_index_or_insert_with(row.variant_id, || build_config(&row));

        merge_material(operation, &row, options.merge_material_sizes);

        union_sorted(&mut operation.all_sizes, &row.sizes);
        union_sorted(&mut variant.unique_sizes, &row.sizes);
    }

    variants
}

fn build_config(row: &SummaryRow<'_>) -> OperationConfig {
    let mut config = OperationConfig::new(row.variant_id, row.sizes.clone());
    config.machine = row.machine.to_string();
    config.apply_tech_specs(TechSpecs::parse(row.tech_specs));
    config.mod_level = non_empty(row.mod_level.to_string());
    config.wage_group = non_empty(row.wage_group.to_string());
    config
}

/// First-seen material wins unless `merge_sizes` is set, in which case a
/// repeated material name extends the earlier entry's sizes.
fn merge_material(operation: &mut OperationData, row: &SummaryRow<'_>, merge_sizes: bool) {
    if row.material.is_empty() || row.material == PLACEHOLDER_MATERIAL {
        return;
    }
    match operation.materials.iter_mut().find(|m| m.name == row.material) {
        Some(existing) if merge_sizes => union_into(&mut existing.sizes, &row.sizes),
        Some(_) => {}
        None => operation
            .materials
            .push(MaterialInfo::new(row.material, row.sizes.clone())),
    }
}
