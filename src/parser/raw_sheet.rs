//! Row-by-row state machine for raw production sheets
//!
//! Each row is first classified into a [`RowKind`] against the current
//! [`SheetState`], then the state is advanced by that classification. The
//! label cell (first field) is matched case-insensitively, in priority order:
//!
//! 1. `production section` updates the running section
//! 2. a three-digit code opens a new operation
//! 3. `variant:` opens a configuration (needs an open operation)
//! 4. a config label sets one field (needs an open configuration)
//! 5. `material :` enters the material block
//! 6. any other row inside the material block is a material line
//!
//! Rows before the first operation, and rows that match nothing, are dropped.

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use crate::entities::operation::non_empty;
use crate::entities::{MaterialInfo, OperationConfig, OperationData};
use crate::parser::sizes::{extract_sizes, union_into};
use crate::parser::ParseOptions;

static VARIANT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)variant:\s*(\d+)").expect("static regex must compile"));
static STITCH_PER_CM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)stitch\s*/\s*cm\s*:\s*([\d.]+)").expect("static regex must compile")
});
static NEEDLE_THROW_MM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)needle\s*throw\s*/\s*mm\s*:\s*([\d.]+)").expect("static regex must compile")
});
static EDGE_MM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)edge/mm\s*([\d.]+)").expect("static regex must compile"));

/// Material names this short or shorter are layout noise
const MIN_MATERIAL_NAME_CHARS: usize = 5;

/// Sub-variant id used when the label carries no number
const UNKNOWN_VARIANT_ID: &str = "000";

/// Description used when an operation row has none
const MISSING_DESCRIPTION: &str = "N/A";

/// A value destined for one field of the open configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    Machine(String),
    NeedleType(String),
    NeedleSize {
        size: String,
        stitch_cm: Option<String>,
        needle_throw: Option<String>,
    },
    Seam {
        seam: String,
        edge: Option<String>,
    },
    ModLevel(String),
    WageGroup(String),
    DetailGeneral(String),
    DetailSku(String),
    Attachment(String),
}

impl ConfigUpdate {
    fn apply(self, config: &mut OperationConfig) {
        match self {
            ConfigUpdate::Machine(v) => config.machine = v,
            ConfigUpdate::NeedleType(v) => config.needle_type = v,
            ConfigUpdate::NeedleSize {
                size,
                stitch_cm,
                needle_throw,
            } => {
                config.needle_size = size;
                if stitch_cm.is_some() {
                    config.stitch_cm = stitch_cm;
                }
                if needle_throw.is_some() {
                    config.needle_throw = needle_throw;
                }
            }
            ConfigUpdate::Seam { seam, edge } => {
                config.seam = seam;
                if edge.is_some() {
                    config.edge = edge;
                }
            }
            ConfigUpdate::ModLevel(v) => config.mod_level = non_empty(v),
            ConfigUpdate::WageGroup(v) => config.wage_group = non_empty(v),
            ConfigUpdate::DetailGeneral(v) => config.detail_general = v,
            ConfigUpdate::DetailSku(v) => config.detail_sku = v,
            ConfigUpdate::Attachment(v) => {
                if !v.is_empty() {
                    config.attachments.push(v);
                }
            }
        }
    }
}

type Extractor = fn(value: String, row: &[String]) -> ConfigUpdate;

/// Config labels in match order, each with the extractor for its row
const CONFIG_LABELS: [(&str, Extractor); 9] = [
    ("machine :", |v, _| ConfigUpdate::Machine(v)),
    ("needle type :", |v, _| ConfigUpdate::NeedleType(v)),
    ("needle size :", |v, row| {
        let joined = row.join(",");
        ConfigUpdate::NeedleSize {
            size: v,
            stitch_cm: first_capture(&STITCH_PER_CM, &joined),
            needle_throw: first_capture(&NEEDLE_THROW_MM, &joined),
        }
    }),
    ("description seam :", |v, _| {
        let edge = first_capture(&EDGE_MM, &v);
        ConfigUpdate::Seam { seam: v, edge }
    }),
    ("modification level", |v, _| ConfigUpdate::ModLevel(v)),
    ("wage group", |v, _| ConfigUpdate::WageGroup(v)),
    ("description detail general", |v, _| ConfigUpdate::DetailGeneral(v)),
    ("description detail sku", |v, _| ConfigUpdate::DetailSku(v)),
    ("attachments :", |v, _| ConfigUpdate::Attachment(v)),
];

/// What a single sheet row means in the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Section(String),
    OperationStart { stt: String, description: String },
    VariantHeader { variant_id: String, sizes: Vec<String> },
    ConfigValue(ConfigUpdate),
    MaterialHeader,
    MaterialLine { name: String, sizes: Vec<String> },
    Ignored,
}

/// Parser context threaded through the row loop
#[derive(Debug, Clone, Default)]
pub struct SheetState {
    pub operations: Vec<OperationData>,
    current_operation: Option<usize>,
    current_config: Option<usize>,
    in_material_section: bool,
    current_section: String,
}

impl SheetState {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            current_section: section.into(),
            ..Default::default()
        }
    }

    pub fn current_section(&self) -> &str {
        &self.current_section
    }

    pub fn in_material_section(&self) -> bool {
        self.in_material_section
    }

    /// Decide what `row` means given the state so far
    pub fn classify(&self, row: &[String], vendor_filter: &str) -> RowKind {
        let label = row.first().map(|s| s.trim()).unwrap_or("");
        let lower = label.to_lowercase();

        if lower.contains("production section") {
            return RowKind::Section(label_value(row, label));
        }

        if is_operation_code(label) {
            let description = [row.get(2), row.get(1)]
                .into_iter()
                .flatten()
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
                .unwrap_or(MISSING_DESCRIPTION);
            return RowKind::OperationStart {
                stt: label.to_string(),
                description: description.to_string(),
            };
        }

        if self.current_operation.is_none() {
            return RowKind::Ignored;
        }

        if lower.contains("variant:") {
            let variant_id = first_capture(&VARIANT_ID, label)
                .map(|id| format!("{:0>3}", id))
                .unwrap_or_else(|| UNKNOWN_VARIANT_ID.to_string());
            let size_cell = [row.get(1), row.get(2)]
                .into_iter()
                .flatten()
                .find(|s| !s.is_empty())
                .map(String::as_str)
                .unwrap_or("");
            return RowKind::VariantHeader {
                variant_id,
                sizes: extract_sizes(size_cell),
            };
        }

        if self.current_config.is_some() {
            if let Some((_, extract)) = CONFIG_LABELS.iter().find(|(l, _)| lower.contains(l)) {
                return RowKind::ConfigValue(extract(label_value(row, label), row));
            }
        }

        if lower == "material :" {
            return RowKind::MaterialHeader;
        }

        let is_vendor_row = !vendor_filter.is_empty() && lower.contains(&vendor_filter.to_lowercase());
        if self.in_material_section && !label.is_empty() && !is_vendor_row {
            if label.chars().count() > MIN_MATERIAL_NAME_CHARS {
                return RowKind::MaterialLine {
                    name: label.to_string(),
                    sizes: extract_sizes(row.get(1).map(String::as_str).unwrap_or("")),
                };
            }
        }

        RowKind::Ignored
    }

    /// Apply one classified row and return the next state
    pub fn advance(mut self, kind: RowKind) -> Self {
        match kind {
            RowKind::Section(value) => {
                if !value.is_empty() {
                    self.current_section = value;
                }
                let section = self.current_section.clone();
                if let Some(op) = self.operation_mut() {
                    op.section = section;
                }
            }
            RowKind::OperationStart { stt, description } => {
                let idx = match self.operations.iter().position(|op| op.stt == stt) {
                    Some(existing) => existing,
                    None => {
                        self.operations.push(OperationData::new(
                            stt,
                            description,
                            self.current_section.clone(),
                        ));
                        self.operations.len() - 1
                    }
                };
                self.current_operation = Some(idx);
                self.current_config = None;
                self.in_material_section = false;
            }
            RowKind::VariantHeader { variant_id, sizes } => {
                let mut opened = None;
                if let Some(op) = self.operation_mut() {
                    union_into(&mut op.all_sizes, &sizes);
                    let idx = op.config_index_or_insert_with(&variant_id, || {
                        OperationConfig::new(variant_id.clone(), Vec::new())
                    });
                    union_into(&mut op.configs[idx].applicable_sizes, &sizes);
                    opened = Some(idx);
                }
                self.current_config = opened;
            }
            RowKind::ConfigValue(update) => {
                if let Some(config) = self.config_mut() {
                    update.apply(config);
                }
            }
            RowKind::MaterialHeader => self.in_material_section = true,
            RowKind::MaterialLine { name, sizes } => {
                let config_sizes = self
                    .config_mut()
                    .map(|c| c.applicable_sizes.clone())
                    .unwrap_or_default();
                if let Some(op) = self.operation_mut() {
                    let sizes = if !sizes.is_empty() {
                        sizes
                    } else if !config_sizes.is_empty() {
                        config_sizes
                    } else {
                        op.all_sizes.clone()
                    };
                    op.materials.push(MaterialInfo::new(name, sizes));
                }
            }
            RowKind::Ignored => {}
        }
        self
    }

    fn operation_mut(&mut self) -> Option<&mut OperationData> {
        self.current_operation
            .and_then(|idx| self.operations.get_mut(idx))
    }

    fn config_mut(&mut self) -> Option<&mut OperationConfig> {
        let cfg_idx = self.current_config?;
        self.operation_mut()
            .and_then(|op| op.configs.get_mut(cfg_idx))
    }
}

/// Walk all rows and return the operations they describe (before size reconciliation)
pub fn walk(rows: &[Vec<String>], options: &ParseOptions) -> Vec<OperationData> {
    rows.iter()
        .enumerate()
        .fold(SheetState::new(&options.default_section), |state, (idx, row)| {
            let kind = state.classify(row, &options.vendor_filter);
            trace!(
                row = idx + 1,
                section = state.current_section(),
                in_material = state.in_material_section(),
                ?kind,
                "classified sheet row"
            );
            state.advance(kind)
        })
        .operations
}

/// Exactly three ASCII digits
fn is_operation_code(label: &str) -> bool {
    label.len() == 3 && label.bytes().all(|b| b.is_ascii_digit())
}

/// Value of a label row: the second field if present, else the text after the label's colon
fn label_value(row: &[String], label: &str) -> String {
    if let Some(value) = row.get(1).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        return value.to_string();
    }
    label
        .split(':')
        .nth(1)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn run(rows: &[Vec<String>]) -> Vec<OperationData> {
        walk(rows, &ParseOptions::default())
    }

    #[test]
    fn test_minimal_sheet() {
        let ops = run(&[
            row(&["010", "", "Join Shoulder"]),
            row(&["Variant: 1", "S M L"]),
            row(&["Machine : Flatlock"]),
            row(&["Material :"]),
            row(&["Thread 40/2", "S M L"]),
        ]);

        assert_eq!(ops.len(), 1);
        let op = &ops[0];
        assert_eq!(op.stt, "010");
        assert_eq!(op.description, "Join Shoulder");
        assert_eq!(op.section, "SEWING");
        assert_eq!(op.all_sizes, vec!["S", "M", "L"]);
        let cfg = op.config("001").unwrap();
        assert_eq!(cfg.machine, "Flatlock");
        assert_eq!(cfg.applicable_sizes, vec!["S", "M", "L"]);
        assert_eq!(op.materials.len(), 1);
        assert_eq!(op.materials[0].name, "Thread 40/2");
        assert_eq!(op.materials[0].sizes, vec!["S", "M", "L"]);
    }

    #[test]
    fn test_state_transitions() {
        let state = SheetState::new("SEWING")
            .advance(RowKind::Section("CUTTING".to_string()))
            .advance(RowKind::OperationStart {
                stt: "010".to_string(),
                description: "Cut".to_string(),
            })
            .advance(RowKind::MaterialHeader);
        assert_eq!(state.current_section(), "CUTTING");
        assert!(state.in_material_section());

        let state = state.advance(RowKind::OperationStart {
            stt: "020".to_string(),
            description: "Bundle".to_string(),
        });
        assert!(!state.in_material_section());
        assert_eq!(state.operations[1].section, "CUTTING");
    }

    #[test]
    fn test_rows_before_first_operation_are_ignored() {
        let state = SheetState::new("SEWING");
        assert_eq!(
            state.classify(&row(&["Variant: 1", "S"]), "inteos"),
            RowKind::Ignored
        );
        assert_eq!(
            state.classify(&row(&["Machine : Flatlock"]), "inteos"),
            RowKind::Ignored
        );
    }

    #[test]
    fn test_section_persists_and_retro_applies() {
        let ops = run(&[
            row(&["Production section", "CUTTING"]),
            row(&["010", "Cut panels"]),
            row(&["020", "Bundle"]),
            row(&["Production section: ASSEMBLY"]),
            row(&["030", "Join"]),
        ]);
        let sections: Vec<&str> = ops.iter().map(|o| o.section.as_str()).collect();
        assert_eq!(sections, vec!["CUTTING", "ASSEMBLY", "ASSEMBLY"]);
        assert_eq!(ops[0].description, "Cut panels");
    }

    #[test]
    fn test_variant_id_padding_and_default() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Variant: 7", "s;m"]),
            row(&["Variant: none", "", "XL"]),
        ]);
        let ids: Vec<&str> = ops[0].configs.iter().map(|c| c.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["007", "000"]);
        assert_eq!(ops[0].configs[1].applicable_sizes, vec!["XL"]);
        assert_eq!(ops[0].all_sizes, vec!["S", "M", "XL"]);
    }

    #[test]
    fn test_needle_size_row_picks_up_inline_numbers() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Variant: 1", "S"]),
            row(&[
                "Needle size :",
                "14",
                "Stitch / cm : 4.5",
                "Needle throw / mm: 2",
            ]),
            row(&["Description seam :", "Overlock edge/mm 6"]),
            row(&["Needle type : DBx1"]),
        ]);
        let cfg = &ops[0].configs[0];
        assert_eq!(cfg.needle_size, "14");
        assert_eq!(cfg.stitch_cm.as_deref(), Some("4.5"));
        assert_eq!(cfg.needle_throw.as_deref(), Some("2"));
        assert_eq!(cfg.seam, "Overlock edge/mm 6");
        assert_eq!(cfg.edge.as_deref(), Some("6"));
        assert_eq!(cfg.needle_type, "DBx1");
    }

    #[test]
    fn test_config_fields_and_attachments() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Variant: 2", "M"]),
            row(&["Modification level", "3"]),
            row(&["Wage group", "B"]),
            row(&["Description detail general", "Keep seam flat"]),
            row(&["Description detail SKU", "Use red thread"]),
            row(&["Attachments :", "Folder 20mm"]),
            row(&["Attachments :", "Guide"]),
            row(&["Attachments :"]),
        ]);
        let cfg = &ops[0].configs[0];
        assert_eq!(cfg.mod_level.as_deref(), Some("3"));
        assert_eq!(cfg.wage_group.as_deref(), Some("B"));
        assert_eq!(cfg.detail_general, "Keep seam flat");
        assert_eq!(cfg.detail_sku, "Use red thread");
        assert_eq!(cfg.attachments, vec!["Folder 20mm", "Guide"]);
    }

    #[test]
    fn test_config_labels_need_open_config() {
        let ops = run(&[row(&["010", "Join"]), row(&["Machine : Flatlock"])]);
        assert!(ops[0].configs.is_empty());
    }

    #[test]
    fn test_material_lines_filter_noise_and_vendor_rows() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Variant: 1", "S M"]),
            row(&["Material :"]),
            row(&["Inteos export 2024"]),
            row(&["abc"]),
            row(&["Label woven care"]),
            row(&["Thread 40/2 navy", "xl"]),
        ]);
        let op = &ops[0];
        let names: Vec<&str> = op.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Label woven care", "Thread 40/2 navy"]);
        assert_eq!(op.materials[0].sizes, vec!["S", "M"]);
        assert_eq!(op.materials[1].sizes, vec!["XL"]);
        assert_eq!(op.materials[0].code, "Label");
    }

    #[test]
    fn test_material_section_resets_on_new_operation() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Material :"]),
            row(&["Thread 40/2 navy", "S"]),
            row(&["020", "Hem"]),
            row(&["Thread 40/2 navy", "S"]),
        ]);
        assert_eq!(ops[0].materials.len(), 1);
        assert!(ops[1].materials.is_empty());
    }

    #[test]
    fn test_material_without_config_uses_operation_sizes() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Material :"]),
            row(&["Thread 40/2 navy"]),
        ]);
        assert!(ops[0].materials[0].sizes.is_empty());
    }

    #[test]
    fn test_repeated_operation_code_reopens_operation() {
        let ops = run(&[
            row(&["010", "Join"]),
            row(&["Variant: 1", "S"]),
            row(&["010", "Join again"]),
            row(&["Variant: 2", "M"]),
        ]);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].description, "Join");
        assert_eq!(ops[0].configs.len(), 2);
    }

    #[test]
    fn test_operation_code_must_be_three_digits() {
        let state = SheetState::new("SEWING");
        assert_eq!(state.classify(&row(&["0100", "x"]), ""), RowKind::Ignored);
        assert_eq!(state.classify(&row(&["01a", "x"]), ""), RowKind::Ignored);
        assert_eq!(
            state.classify(&row(&["045"]), ""),
            RowKind::OperationStart {
                stt: "045".to_string(),
                description: "N/A".to_string()
            }
        );
    }

    #[test]
    fn test_label_value_fallback_to_colon_text() {
        assert_eq!(label_value(&row(&["Machine : Flatlock"]), "Machine : Flatlock"), "Flatlock");
        assert_eq!(label_value(&row(&["Machine : A", "B"]), "Machine : A"), "B");
        assert_eq!(label_value(&row(&["Machine"]), "Machine"), "");
    }
}
