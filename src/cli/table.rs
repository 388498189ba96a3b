//! Table formatting utilities for CLI list commands
//!
//! Every entity renders through the same [`TableFormatter`], so list and
//! search output looks identical across the six entity groups.
//!
//! # Text Wrapping
//!
//! - Use `TableConfig::with_wrap(width)` to enable word-wrapped multi-line rows
//! - CSV and ID formats remain single-line for pipability
//! - TSV and Md formats support wrapped output

use console::style;
use std::fmt::Write as _;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::pagination::{PageState, DEFAULT_MAX_VISIBLE};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Show the pager and summary lines after the table
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
    /// Create config with text wrapping enabled at the specified width
    pub fn with_wrap(width: usize) -> Self {
        Self {
            wrap_width: Some(width),
            show_summary: true,
        }
    }

    /// Create config optimized for piping (no wrapping, no summary)
    pub fn for_pipe() -> Self {
        Self {
            wrap_width: None,
            show_summary: false,
        }
    }
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    // Don't wrap if text already fits or width is too small to be useful
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !current_line.is_empty() && current_line.chars().count() + 1 + word_len <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            continue;
        }

        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }

        // Force-break words longer than a line
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current_line = piece;
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Record identifier (cyan)
    Id(i64),
    /// Plain text, truncated to the column width
    Text(String),
    /// E-mail address (underlined on terminals)
    Email(String),
    /// Whole number
    Number(i64),
    /// Money amount, two decimals, right-aligned
    Amount(f64),
    /// List of labels shown comma-separated
    Tags(Vec<String>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width.saturating_sub(2)), width = width)
            }
            CellValue::Email(s) => format!(
                "{:<width$}",
                style(truncate_str(s, width.saturating_sub(2))).underlined(),
                width = width
            ),
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Amount(a) => format!(
                "{:>width$}",
                style(format!("{:.2}", a)).green(),
                width = width
            ),
            CellValue::Tags(tags) => format!(
                "{:<width$}",
                style(truncate_str(&tags.join(", "), width.saturating_sub(2))).magenta(),
                width = width
            ),
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Tags(tags) => escape_csv(&tags.join(", ")),
            CellValue::Text(s) | CellValue::Email(s) => escape_csv(s),
            other => other.raw(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Empty => "-".to_string(),
            other => other.raw(),
        };
        // Escape pipe characters for markdown tables
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Text(s) | CellValue::Email(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Amount(a) => format!("{:.2}", a),
            CellValue::Tags(tags) => tags.join(", "),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and width
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

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    /// Add a text cell, using [`CellValue::Empty`] for blank strings
    pub fn text(self, key: &'static str, value: &str) -> Self {
        let value = if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        };
        self.cell(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Render the page-number window, e.g. `‹ 1 [2] 3 4 5 ›`
///
/// The arrows are dimmed when there is no previous/next page.
pub fn format_pager(page: &PageState) -> String {
    let arrow = |glyph: &str, enabled: bool| {
        if enabled {
            style(glyph.to_string()).bold().to_string()
        } else {
            style(glyph.to_string()).dim().to_string()
        }
    };

    let mut parts = vec![arrow("‹", page.has_previous())];
    for n in page.window(DEFAULT_MAX_VISIBLE) {
        if n == page.current_page {
            parts.push(style(format!("[{}]", n)).cyan().bold().to_string());
        } else {
            parts.push(n.to_string());
        }
    }
    parts.push(arrow("›", page.has_next()));
    parts.join(" ")
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    entity_name_plural: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            entity_name_plural: entity_name,
            config: TableConfig::default(),
        }
    }

    /// Set a custom plural name (e.g., "budget categories")
    pub fn with_plural(mut self, plural: &'static str) -> Self {
        self.entity_name_plural = plural;
        self
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in the specified format
    pub fn output<I>(&self, rows: I, page: &PageState, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        print!("{}", self.render(rows, page, format));
    }

    /// Render rows in the specified format
    ///
    /// JSON and YAML are serialized from the records themselves by the
    /// caller; here they fall back to TSV.
    pub fn render<I>(&self, rows: I, page: &PageState, format: OutputFormat) -> String
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.render_csv(&rows),
            OutputFormat::Md => self.render_md(&rows),
            OutputFormat::Id => self.render_ids(&rows),
            _ => self.render_tsv(&rows, page),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);

                // +2 leaves room for truncate_str's ellipsis; cap at the
                // declared width but allow shrinking
                let natural_width = col.header.len().max(max_content.saturating_add(2));
                natural_width.min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow], page: &PageState) -> String {
        let mut out = String::new();
        let widths = self.calculate_widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        let _ = writeln!(out, "{}", header.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        let _ = writeln!(out, "{}", "-".repeat(total_width));

        for row in rows {
            match self.config.wrap_width {
                Some(wrap_width) => self.render_tsv_row_wrapped(&mut out, row, &widths, wrap_width),
                None => self.render_tsv_row_truncated(&mut out, row, &widths),
            }
        }

        if self.config.show_summary {
            let _ = writeln!(out);
            if rows.is_empty() {
                let _ = writeln!(out, "No {} found.", self.entity_name_plural);
            } else {
                let noun = if page.total_items == 1 {
                    self.entity_name
                } else {
                    self.entity_name_plural
                };
                let _ = writeln!(
                    out,
                    "{}   Page {} of {} ({} {})",
                    format_pager(page),
                    page.current_page,
                    page.total_pages.max(1),
                    style(page.total_items).cyan(),
                    noun
                );
            }
        }

        out
    }

    fn render_tsv_row_truncated(&self, out: &mut String, row: &TableRow, widths: &[usize]) {
        let parts: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .map(|(col, w)| match row.get(col.key) {
                Some(value) => value.format_tsv(*w),
                None => format!("{:<width$}", "-", width = *w),
            })
            .collect();
        let _ = writeln!(out, "{}", parts.join(" ").trim_end());
    }

    fn render_tsv_row_wrapped(
        &self,
        out: &mut String,
        row: &TableRow,
        widths: &[usize],
        wrap_width: usize,
    ) {
        // Only Text and Tags cells wrap
        let wrapped_cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| match row.get(col.key) {
                Some(value @ (CellValue::Text(_) | CellValue::Tags(_))) => {
                    wrap_text(&value.raw(), wrap_width)
                }
                Some(value) => vec![value.raw()],
                None => vec!["-".to_string()],
            })
            .collect();

        let max_lines = wrapped_cells.iter().map(|c| c.len()).max().unwrap_or(1);

        for line_idx in 0..max_lines {
            let parts: Vec<String> = wrapped_cells
                .iter()
                .enumerate()
                .map(|(col_idx, lines)| {
                    let width = widths.get(col_idx).copied().unwrap_or(10);
                    let content = lines.get(line_idx).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", content, width = width)
                })
                .collect();
            let _ = writeln!(out, "{}", parts.join(" ").trim_end());
        }

        // Blank line between multi-line rows for readability
        if max_lines > 1 {
            let _ = writeln!(out);
        }
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        let _ = writeln!(out, "{}", headers.join(","));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            let _ = writeln!(out, "{}", values.join(","));
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        let _ = writeln!(out, "| {} |", headers.join(" | "));

        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        let _ = writeln!(out, "|{}|", separators.join("|"));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            let _ = writeln!(out, "| {} |", values.join(" | "));
        }
        out
    }

    fn render_ids(&self, rows: &[TableRow]) -> String {
        rows.iter().map(|row| format!("{}\n", row.id)).collect()
    }
}
