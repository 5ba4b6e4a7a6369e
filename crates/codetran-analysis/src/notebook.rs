//! Notebook (`.ipynb`)-shaped document transformation.
//!
//! No single upstream file backs this module; it follows the `nbformat`
//! cell-list shape used by the original system's own notebook description,
//! rendered with the `serde_json`-based tagged-cell idiom used throughout
//! this crate.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{AnalysisError, AnalysisResult};

/// A parsed notebook document: ordered cells plus top-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookDocument {
    /// Cells in source order.
    pub cells: Vec<NotebookCell>,
    /// Top-level notebook metadata (kernelspec, language_info, ...).
    pub metadata: Map<String, Value>,
    /// `nbformat` major version.
    pub nbformat: u32,
    /// `nbformat` minor version.
    pub nbformat_minor: u32,
}

/// One notebook cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookCell {
    /// Cell kind; unrecognized `cell_type` values fall back to `Raw`.
    #[serde(rename = "cell_type")]
    pub kind: CellKind,
    /// Cell source, stored as a single string (nbformat's array form is
    /// joined on parse and re-split to one string per line on write).
    pub source: String,
    /// Per-cell metadata, preserved across transformation.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Execution outputs; cleared for translated code cells.
    #[serde(default)]
    pub outputs: Vec<Value>,
    /// Execution counter; cleared for translated code cells.
    #[serde(default)]
    pub execution_count: Option<u64>,
}

/// The three notebook cell kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Executable source.
    Code,
    /// Prose, passed through unchanged.
    Markdown,
    /// Opaque payload, passed through unchanged.
    Raw,
}

/// Per-cell translation outcome recorded on the `translation` metadata key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellTranslation {
    /// Detected or supplied source language.
    pub source_language: String,
    /// Requested target language.
    pub target_language: String,
    /// Confidence reported by the translation call.
    pub confidence: f64,
}

/// Aggregate statistics produced by [`transform`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookStats {
    /// Total cell count.
    pub total_cells: usize,
    /// Code cells encountered.
    pub code_cells: usize,
    /// Markdown cells encountered.
    pub markdown_cells: usize,
    /// Code cells translated successfully.
    pub translated_cells: usize,
    /// Code cells whose translation failed.
    pub failed_cells: usize,
    /// Error text for each failed cell, in source order.
    pub failures: Vec<String>,
}

/// Parse `raw` as a notebook document.
pub fn parse(raw: &str) -> AnalysisResult<NotebookDocument> {
    let value: Value = serde_json::from_str(raw)?;
    let obj = value
        .as_object()
        .ok_or_else(|| AnalysisError::InvalidNotebook("top-level document is not an object".to_string()))?;

    let cells_value = obj
        .get("cells")
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::InvalidNotebook("missing \"cells\" array".to_string()))?;

    let mut cells = Vec::with_capacity(cells_value.len());
    for raw_cell in cells_value {
        cells.push(parse_cell(raw_cell)?);
    }

    let metadata = obj.get("metadata").and_then(Value::as_object).cloned().unwrap_or_default();
    let nbformat = obj.get("nbformat").and_then(Value::as_u64).unwrap_or(4) as u32;
    let nbformat_minor = obj.get("nbformat_minor").and_then(Value::as_u64).unwrap_or(5) as u32;

    Ok(NotebookDocument { cells, metadata, nbformat, nbformat_minor })
}

fn parse_cell(raw_cell: &Value) -> AnalysisResult<NotebookCell> {
    let obj = raw_cell
        .as_object()
        .ok_or_else(|| AnalysisError::InvalidNotebook("cell is not an object".to_string()))?;

    let kind = match obj.get("cell_type").and_then(Value::as_str) {
        Some("code") => CellKind::Code,
        Some("markdown") => CellKind::Markdown,
        _ => CellKind::Raw,
    };

    let source = match obj.get("source") {
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect::<String>(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    let metadata = obj.get("metadata").and_then(Value::as_object).cloned().unwrap_or_default();
    let outputs = obj.get("outputs").and_then(Value::as_array).cloned().unwrap_or_default();
    let execution_count = obj.get("execution_count").and_then(Value::as_u64);

    Ok(NotebookCell { kind, source, metadata, outputs, execution_count })
}

fn kernel_template(language: &str) -> Value {
    let slug = language.to_lowercase();
    json!({
        "kernelspec": {
            "name": slug,
            "display_name": language,
            "language": slug,
        }
    })
}

/// Run `translate_cell` over every code cell in `doc`, rewriting it in
/// place, and return the collected statistics. Markdown and raw cells are
/// left untouched. `translate_cell` returns `(translated_source,
/// source_language, confidence)` on success.
pub fn transform<F>(doc: &mut NotebookDocument, target_language: &str, mut translate_cell: F) -> NotebookStats
where
    F: FnMut(&str) -> Result<(String, String, f64), String>,
{
    let mut stats = NotebookStats { total_cells: doc.cells.len(), ..NotebookStats::default() };

    for cell in &mut doc.cells {
        match cell.kind {
            CellKind::Markdown => stats.markdown_cells = stats.markdown_cells.saturating_add(1),
            CellKind::Raw => {},
            CellKind::Code => {
                stats.code_cells = stats.code_cells.saturating_add(1);
                match translate_cell(&cell.source) {
                    Ok((translated, source_language, confidence)) => {
                        cell.source = translated;
                        cell.outputs.clear();
                        cell.execution_count = None;
                        let translation = CellTranslation {
                            source_language,
                            target_language: target_language.to_string(),
                            confidence,
                        };
                        cell.metadata.insert(
                            "translation".to_string(),
                            serde_json::to_value(translation).unwrap_or(Value::Null),
                        );
                        stats.translated_cells = stats.translated_cells.saturating_add(1);
                    },
                    Err(error) => {
                        cell.source = format!("# TRANSLATION FAILED: {error}\n{}", cell.source);
                        stats.failed_cells = stats.failed_cells.saturating_add(1);
                        stats.failures.push(error);
                    },
                }
            },
        }
    }

    doc.metadata.insert("kernelspec".to_string(), kernel_template(target_language)["kernelspec"].clone());
    stats
}

/// Serialize `doc` back to `nbformat`-shaped JSON text.
pub fn serialize(doc: &NotebookDocument) -> AnalysisResult<String> {
    let cells: Vec<Value> = doc
        .cells
        .iter()
        .map(|cell| {
            json!({
                "cell_type": match cell.kind {
                    CellKind::Code => "code",
                    CellKind::Markdown => "markdown",
                    CellKind::Raw => "raw",
                },
                "source": cell.source.split_inclusive('\n').map(str::to_string).collect::<Vec<_>>(),
                "metadata": cell.metadata,
                "outputs": cell.outputs,
                "execution_count": cell.execution_count,
            })
        })
        .collect();

    let doc_value = json!({
        "cells": cells,
        "metadata": doc.metadata,
        "nbformat": doc.nbformat,
        "nbformat_minor": doc.nbformat_minor,
    });

    Ok(serde_json::to_string_pretty(&doc_value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notebook() -> &'static str {
        r##"{
            "cells": [
                {"cell_type": "code", "source": ["print('hi')\n"], "metadata": {}, "outputs": [], "execution_count": 1},
                {"cell_type": "markdown", "source": ["# Title\n"], "metadata": {}}
            ],
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 5
        }"##
    }

    #[test]
    fn parses_code_and_markdown_cells() {
        let doc = parse(sample_notebook()).unwrap();
        assert_eq!(doc.cells.len(), 2);
        assert_eq!(doc.cells[0].kind, CellKind::Code);
        assert_eq!(doc.cells[1].kind, CellKind::Markdown);
        assert_eq!(doc.cells[0].source, "print('hi')\n");
    }

    #[test]
    fn transform_rewrites_successful_code_cells_and_clears_outputs() {
        let mut doc = parse(sample_notebook()).unwrap();
        let stats = transform(&mut doc, "Rust", |source| {
            Ok((format!("// translated from: {source}"), "Python".to_string(), 0.9))
        });
        assert_eq!(stats.translated_cells, 1);
        assert_eq!(stats.failed_cells, 0);
        assert!(doc.cells[0].source.starts_with("// translated"));
        assert!(doc.cells[0].outputs.is_empty());
        assert!(doc.cells[0].execution_count.is_none());
        assert!(doc.cells[0].metadata.contains_key("translation"));
    }

    #[test]
    fn transform_marks_failed_cells_and_preserves_original_source() {
        let mut doc = parse(sample_notebook()).unwrap();
        let stats = transform(&mut doc, "Rust", |_| Err("provider unavailable".to_string()));
        assert_eq!(stats.failed_cells, 1);
        assert_eq!(stats.failures, vec!["provider unavailable".to_string()]);
        assert!(doc.cells[0].source.contains("TRANSLATION FAILED"));
        assert!(doc.cells[0].source.contains("print('hi')"));
    }

    #[test]
    fn markdown_cells_pass_through_unchanged() {
        let mut doc = parse(sample_notebook()).unwrap();
        let original_markdown = doc.cells[1].source.clone();
        transform(&mut doc, "Rust", |source| Ok((source.to_string(), "Python".to_string(), 1.0)));
        assert_eq!(doc.cells[1].source, original_markdown);
    }

    #[test]
    fn transform_replaces_kernel_metadata_with_target_template() {
        let mut doc = parse(sample_notebook()).unwrap();
        transform(&mut doc, "Rust", |source| Ok((source.to_string(), "Python".to_string(), 1.0)));
        let kernelspec = doc.metadata.get("kernelspec").unwrap();
        assert_eq!(kernelspec["name"], "rust");
        assert_eq!(kernelspec["display_name"], "Rust");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(parse("not json").is_err());
    }
}
