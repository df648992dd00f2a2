//! Table formatting for matrix and listing commands
//!
//! Rows are built from typed [`CellValue`]s keyed by column, then rendered
//! as aligned text (TSV), CSV or a Markdown table.
//!
//! # Text Wrapping
//!
//! `TableConfig::with_wrap(width)` turns long description, material and size
//! cells into word-wrapped multi-line rows. CSV output is always single-line
//! so it stays pipeable.

use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::TechSpecs;
use crate::parser::summary::PLACEHOLDER_MATERIAL;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Print a count line after the table
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            show_summary: true,
        }
    }
}

impl TableConfig {
    pub fn with_wrap(width: usize) -> Self {
        Self {
            wrap_width: Some(width),
            ..Self::default()
        }
    }

    /// No wrapping, no summary
    pub fn for_pipe() -> Self {
        Self {
            wrap_width: None,
            show_summary: false,
        }
    }
}

/// Break `text` into lines of at most `max_width` characters at word boundaries
pub(crate) fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() { 0 } else { current.chars().count() + 1 };
        if needed + word.chars().count() <= max_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Operation step; continuation rows of a step group render as a dot
    Step { stt: String, first: bool },
    /// Colour code
    Color(String),
    /// Plain text
    Text(String),
    /// Machine name; empty means manual work
    Machine(String),
    /// Material name; the placeholder renders dimmed
    Material(String),
    /// Technical specs
    Tech(TechSpecs),
    /// Size labels, space separated
    Sizes(Vec<String>),
    /// Optional short value, "-" when absent
    Optional(Option<String>),
    Number(usize),
    Empty,
}

impl CellValue {
    /// Text as shown to a reader (TSV and Markdown)
    fn display(&self) -> String {
        match self {
            CellValue::Step { stt, first: true } => stt.clone(),
            CellValue::Step { first: false, .. } => "·".to_string(),
            CellValue::Color(c) => c.clone(),
            CellValue::Text(s) | CellValue::Material(s) => s.clone(),
            CellValue::Machine(m) if m.is_empty() => "Manual".to_string(),
            CellValue::Machine(m) => m.clone(),
            CellValue::Tech(t) => tech_summary(t),
            CellValue::Sizes(sizes) => sizes.join(" "),
            CellValue::Optional(v) => v.clone().unwrap_or_else(|| "-".to_string()),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        let text = truncate_str(&self.display(), width.saturating_sub(1).max(1));
        let styled = match self {
            CellValue::Step { first: true, .. } => style(text).bold(),
            CellValue::Step { first: false, .. } => style(text).dim(),
            CellValue::Color(_) => style(text).cyan().bold(),
            CellValue::Material(m) if m == PLACEHOLDER_MATERIAL => style(text).dim(),
            CellValue::Machine(m) if m.is_empty() => style(text).dim(),
            CellValue::Sizes(_) => style(text).yellow(),
            CellValue::Number(n) => return format!("{:>width$}", n, width = width),
            CellValue::Empty | CellValue::Optional(None) => style(text).dim(),
            _ => style(text),
        };
        format!("{:<width$}", styled, width = width)
    }

    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    pub fn format_md(&self) -> String {
        let text = match self {
            CellValue::Step { first: false, .. } => String::new(),
            CellValue::Color(c) => format!("**{}**", c),
            _ => self.display(),
        };
        text.replace('|', "\\|")
    }

    /// Unstyled machine-readable value
    pub fn raw(&self) -> String {
        match self {
            CellValue::Step { stt, .. } => stt.clone(),
            CellValue::Color(s) | CellValue::Text(s) | CellValue::Machine(s) | CellValue::Material(s) => {
                s.clone()
            }
            CellValue::Tech(t) => t.to_string(),
            CellValue::Sizes(sizes) => sizes.join(" "),
            CellValue::Optional(v) => v.clone().unwrap_or_default(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn display_width(&self) -> usize {
        self.display().chars().count()
    }

    fn wraps(&self) -> bool {
        matches!(
            self,
            CellValue::Text(_) | CellValue::Material(_) | CellValue::Sizes(_) | CellValue::Tech(_)
        )
    }
}

/// `DBx1 · 14 · SS · 4.5/cm`, with `-` for missing parts
fn tech_summary(t: &TechSpecs) -> String {
    let dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let stitch = if t.stitch_cm.is_empty() {
        "-".to_string()
    } else {
        format!("{}/cm", t.stitch_cm)
    };
    format!(
        "{} · {} · {} · {}",
        dash(&t.needle_type),
        dash(&t.needle_size),
        dash(&t.seam),
        stitch
    )
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn output(&self, rows: &[TableRow], format: OutputFormat, visible_columns: &[&str]) {
        print!("{}", self.render(rows, format, visible_columns));
    }

    pub fn render(&self, rows: &[TableRow], format: OutputFormat, visible_columns: &[&str]) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows, visible_columns),
            OutputFormat::Md => self.render_md(rows, visible_columns),
            _ => self.render_tsv(rows, visible_columns),
        }
    }

    fn visible(&self, visible_columns: &[&str]) -> Vec<&'a ColumnDef> {
        self.columns
            .iter()
            .filter(|c| visible_columns.contains(&c.key))
            .collect()
    }

    fn calculate_widths(&self, rows: &[TableRow], visible_columns: &[&str]) -> Vec<usize> {
        self.visible(visible_columns)
            .into_iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                let natural = col.header.len().max(max_content + 2);
                match self.config.wrap_width {
                    Some(wrap) => natural.min(col.width.max(wrap + 2)),
                    None => natural.min(col.width),
                }
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow], visible_columns: &[&str]) -> String {
        let widths = self.calculate_widths(rows, visible_columns);
        let mut out = String::new();

        let header: Vec<String> = self
            .visible(visible_columns)
            .into_iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            match self.config.wrap_width {
                Some(wrap) => self.render_row_wrapped(&mut out, row, visible_columns, &widths, wrap),
                None => {
                    let parts: Vec<String> = self
                        .visible(visible_columns)
                        .into_iter()
                        .zip(&widths)
                        .map(|(col, w)| match row.get(col.key) {
                            Some(value) => value.format_tsv(*w),
                            None => CellValue::Empty.format_tsv(*w),
                        })
                        .collect();
                    out.push_str(parts.join(" ").trim_end());
                    out.push('\n');
                }
            }
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!("{} {}(s)\n", style(rows.len()).cyan(), self.noun));
        }
        out
    }

    fn render_row_wrapped(
        &self,
        out: &mut String,
        row: &TableRow,
        visible_columns: &[&str],
        widths: &[usize],
        wrap_width: usize,
    ) {
        let cells: Vec<Vec<String>> = self
            .visible(visible_columns)
            .into_iter()
            .map(|col| match row.get(col.key) {
                Some(value) if value.wraps() => wrap_text(&value.display(), wrap_width),
                Some(value) => vec![value.display()],
                None => vec!["-".to_string()],
            })
            .collect();

        let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        for line_idx in 0..max_lines {
            let parts: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(lines, w)| {
                    let content = lines.get(line_idx).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", content, width = *w)
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }
    }

    fn render_csv(&self, rows: &[TableRow], visible_columns: &[&str]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.visible(visible_columns).into_iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = self
                .visible(visible_columns)
                .into_iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow], visible_columns: &[&str]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.visible(visible_columns).into_iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = self
                .visible(visible_columns)
                .into_iter()
                .map(|col| {
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }
}
