use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;

use super::encoding::{decode_first, TextEncoding};
use super::model::{StudentRecord, Table, Usage, UNASSIGNED_GROUP};

pub const SCORE_COLUMN: &str = "Nota_Final";
pub const GROUP_COLUMN: &str = "Grupo";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a load attempt failed. Every variant is terminal for that attempt.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no se encontró el archivo '{}'", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("no se pudo leer '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no se pudo leer el archivo con ninguna codificación conocida ({})", .tried.join(", "))]
    EncodingUnresolvable { tried: Vec<&'static str> },

    #[error("el archivo no tiene fila de encabezado")]
    MissingHeader,

    #[error("falta la columna obligatoria '{column}'")]
    MissingRequiredColumn { column: &'static str },

    #[error("error al procesar los datos: {0}")]
    Parse(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for reading a survey export.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Tried in order; the first that decodes the whole file wins.
    pub encodings: Vec<TextEncoding>,
    pub delimiter: u8,
    /// Lines before the header row.
    pub skip_lines: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
            delimiter: b';',
            skip_lines: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean a survey export with the default options.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    load_with(path, &LoadOptions::default())
}

pub fn load_with(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let table = parse_bytes(&bytes, options)?;
    log::info!("Loaded {} students from {}", table.len(), path.display());
    Ok(table)
}

/// Decode, parse and clean raw file contents.
pub fn parse_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Table, LoadError> {
    let (text, encoding) =
        decode_first(bytes, &options.encodings).ok_or_else(|| LoadError::EncodingUnresolvable {
            tried: options.encodings.iter().map(|e| e.label()).collect(),
        })?;
    log::info!("Decoded input as {}", encoding.label());
    parse_text(&text, options)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// One data row as found in the file, addressed by header name.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    #[serde(rename = "Nombre")]
    name: Option<String>,
    #[serde(rename = "Grupo")]
    group: Option<String>,
    #[serde(rename = "Nota_Final")]
    final_score: Option<String>,
    #[serde(rename = "Metodo_Despeje")]
    method_used: Option<String>,
    #[serde(rename = "Uso_Grafico")]
    graph_usage: Option<String>,
    #[serde(rename = "Uso_IA")]
    ai_usage: Option<String>,
    #[serde(rename = "Link_Retro")]
    feedback_link: Option<String>,
    #[serde(rename = "Expli_Despeje")]
    explanation_method: Option<String>,
    #[serde(rename = "Expli_Grafico")]
    explanation_graph: Option<String>,
    #[serde(rename = "Expli_Uso_IA")]
    explanation_ai: Option<String>,
}

#[derive(Debug, Default)]
struct SkipCounts {
    malformed: usize,
    empty: usize,
    no_score: usize,
}

fn parse_text(text: &str, options: &LoadOptions) -> Result<Table, LoadError> {
    parse_reader(text.as_bytes(), options)
}

/// Header names, trimmed, with repeats renamed `name.1`, `name.2`, ... so
/// the first occurrence of a column is the one that is read.
fn unique_headers(raw: &StringRecord) -> StringRecord {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    raw.iter()
        .map(str::trim)
        .map(|name| {
            let count = seen.entry(name).or_insert(0);
            let unique = if *count == 0 {
                name.to_string()
            } else {
                log::warn!("Duplicate column '{name}': only the first one is read");
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

fn parse_reader<R: io::Read>(input: R, options: &LoadOptions) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut rows = reader.records();

    for _ in 0..options.skip_lines {
        rows.next().transpose()?.ok_or(LoadError::MissingHeader)?;
    }
    let headers = unique_headers(&rows.next().transpose()?.ok_or(LoadError::MissingHeader)?);

    if !headers.iter().any(|h| h == SCORE_COLUMN) {
        return Err(LoadError::MissingRequiredColumn {
            column: SCORE_COLUMN,
        });
    }
    let has_group = headers.iter().any(|h| h == GROUP_COLUMN);

    let mut records = Vec::new();
    let mut skipped = SkipCounts::default();

    for (row_no, result) in rows.enumerate() {
        // 1-based file line numbers for the log: metadata + header come first.
        let line = row_no + options.skip_lines + 2;
        // With `flexible` the parser itself accepts any row shape; what remains
        // here is a read failure partway through the input.
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable row at line {line}: {e}");
                skipped.malformed += 1;
                continue;
            }
        };
        if record.len() > headers.len() {
            log::warn!(
                "Skipping line {line}: {} fields, header has {}",
                record.len(),
                headers.len()
            );
            skipped.malformed += 1;
            continue;
        }
        if record.iter().all(|field| field.trim().is_empty()) {
            skipped.empty += 1;
            continue;
        }
        while record.len() < headers.len() {
            record.push_field("");
        }

        let raw: RawRow = match record.deserialize(Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping line {line}: {e}");
                skipped.malformed += 1;
                continue;
            }
        };
        match clean_row(raw, has_group) {
            Some(student) => records.push(student),
            None => skipped.no_score += 1,
        }
    }

    log::info!(
        "Kept {} rows; skipped {} malformed, {} empty, {} without a numeric {SCORE_COLUMN}",
        records.len(),
        skipped.malformed,
        skipped.empty,
        skipped.no_score
    );
    Ok(Table::new(records))
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Turn a raw row into a record, or `None` when it has no usable score.
fn clean_row(raw: RawRow, has_group: bool) -> Option<StudentRecord> {
    let final_score = raw.final_score.as_deref().and_then(coerce_number)?;
    let group = if has_group {
        normalize_group(raw.group.as_deref())
    } else {
        UNASSIGNED_GROUP.to_string()
    };

    Some(StudentRecord {
        name: raw.name.unwrap_or_default(),
        group,
        final_score,
        method_used: raw.method_used,
        graph_usage: raw.graph_usage.as_deref().and_then(Usage::normalize),
        ai_usage: raw.ai_usage.as_deref().and_then(Usage::normalize),
        feedback_link: raw.feedback_link,
        explanation_method: raw.explanation_method,
        explanation_graph: raw.explanation_graph,
        explanation_ai: raw.explanation_ai,
    })
}

/// Parse a number written with either `.` or a single `,` as decimal separator.
/// Blank, non-numeric and non-finite values yield `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed.parse::<f64>().ok().or_else(|| {
        if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
            trimmed.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

/// Numeric groups are rendered canonically ("1.0" → "1"); anything else is unassigned.
pub fn normalize_group(raw: Option<&str>) -> String {
    match raw.and_then(coerce_number) {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Some(n) => n.to_string(),
        None => UNASSIGNED_GROUP.to_string(),
    }
}
