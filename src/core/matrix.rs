//! Operation matrix view-model
//!
//! Built from an immutable variant list. Selection, search text and the
//! compact flag belong to the view; the parsed model is never touched.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::entities::{OperationConfig, OperationData, ProductVariant, TechSpecs};
use crate::parser::sizes::natural_cmp;
use crate::parser::summary::PLACEHOLDER_MATERIAL;

/// One rendered line: a (stt, colour, configuration, material) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub stt: String,
    pub variant_id: String,
    pub section: String,
    pub color: String,
    pub description: String,
    pub machine: String,
    pub material: String,
    pub tech_specs: TechSpecs,
    pub sizes: Vec<String>,
    pub mod_level: Option<String>,
    pub wage_group: Option<String>,
    /// First row of its `stt` group
    pub first_of_stt: bool,
}

impl MatrixRow {
    fn build(
        variant: &ProductVariant,
        op: &OperationData,
        config: &OperationConfig,
        material: &str,
        sizes: &[String],
    ) -> Self {
        Self {
            stt: op.stt.clone(),
            variant_id: config.variant_id.clone(),
            section: op.section.clone(),
            color: variant.color.clone(),
            description: op.description.clone(),
            machine: config.machine.clone(),
            material: material.to_string(),
            tech_specs: config.tech_specs(),
            sizes: sizes.to_vec(),
            mod_level: config.mod_level.clone(),
            wage_group: config.wage_group.clone(),
            first_of_stt: false,
        }
    }

    /// Sizes in numeric-aware display order
    pub fn display_sizes(&self) -> Vec<String> {
        let mut sizes = self.sizes.clone();
        sizes.sort_by(|a, b| natural_cmp(a, b));
        sizes
    }
}

/// Counts shown under the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixFooter {
    pub colors_viewed: usize,
    pub colors_total: usize,
    pub process_steps: usize,
}

/// Selection state over a variant list
#[derive(Debug, Clone)]
pub struct MatrixView<'a> {
    variants: &'a [ProductVariant],
    selected: BTreeSet<String>,
    search: String,
    compact: bool,
}

impl<'a> MatrixView<'a> {
    /// Every colour starts selected
    pub fn new(variants: &'a [ProductVariant]) -> Self {
        Self {
            variants,
            selected: variants.iter().map(|v| v.color.clone()).collect(),
            search: String::new(),
            compact: false,
        }
    }

    pub fn variants(&self) -> &'a [ProductVariant] {
        self.variants
    }

    /// Distinct colour codes, ascending
    pub fn all_colors(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|v| v.color.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct operation steps across all variants, numeric-aware order
    pub fn all_stts(&self) -> Vec<String> {
        let mut stts: Vec<String> = self
            .variants
            .iter()
            .flat_map(|v| v.operations.iter().map(|op| op.stt.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        stts.sort_by(|a, b| natural_cmp(a, b));
        stts
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Colour options matching the search text (case-insensitive substring)
    pub fn filtered_colors(&self) -> Vec<String> {
        let needle = self.search.to_lowercase();
        self.all_colors()
            .into_iter()
            .filter(|c| c.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn toggle(&mut self, color: &str) {
        if !self.selected.remove(color) {
            self.selected.insert(color.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.all_colors().into_iter().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Replace the selection. Unknown colours are kept, they simply match nothing.
    pub fn select<I, S>(&mut self, colors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = colors.into_iter().map(Into::into).collect();
    }

    /// Narrow the selection to colours that also match the search text
    pub fn restrict_to_search(&mut self) {
        let visible: BTreeSet<String> = self.filtered_colors().into_iter().collect();
        self.selected.retain(|c| visible.contains(c));
    }

    pub fn is_selected(&self, color: &str) -> bool {
        self.selected.contains(color)
    }

    /// Selected colours in ascending order
    pub fn selected_colors(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Selected variants in collection order
    pub fn selected_variants(&self) -> impl Iterator<Item = &'a ProductVariant> + '_ {
        self.variants
            .iter()
            .filter(move |v| self.selected.contains(&v.color))
    }

    /// Expand the selection into matrix rows, grouped by `stt`
    pub fn rows(&self) -> Vec<MatrixRow> {
        let mut rows = Vec::new();

        for stt in self.all_stts() {
            let group_start = rows.len();
            for variant in self.selected_variants() {
                let Some(op) = variant.operation(&stt) else {
                    continue;
                };
                for config in &op.configs {
                    let mut matched = op.materials_for(config).peekable();
                    if matched.peek().is_none() {
                        rows.push(MatrixRow::build(
                            variant,
                            op,
                            config,
                            PLACEHOLDER_MATERIAL,
                            &config.applicable_sizes,
                        ));
                        continue;
                    }
                    for material in matched {
                        rows.push(MatrixRow::build(variant, op, config, &material.name, &material.sizes));
                    }
                }
            }
            if let Some(first) = rows.get_mut(group_start) {
                first.first_of_stt = true;
            }
        }

        rows
    }

    pub fn footer(&self) -> MatrixFooter {
        MatrixFooter {
            colors_viewed: self.selected_variants().count(),
            colors_total: self.all_colors().len(),
            process_steps: self.all_stts().len(),
        }
    }
}
