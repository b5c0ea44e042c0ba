/// Group selector value meaning "no group filter".
pub const ALL_GROUPS: &str = "Todos los Grupos";

/// Group assigned to rows whose `Grupo` cell is missing or not numeric.
pub const UNASSIGNED_GROUP: &str = "Sin Asignar";

// ---------------------------------------------------------------------------
// Usage – tri-state survey answer (Uso_Grafico / Uso_IA)
// ---------------------------------------------------------------------------

/// A normalized usage answer.
///
/// Normalization is best-effort: known spellings of "Sí", "No" and "Regular"
/// collapse to their variant, anything else is kept in [`Usage::Other`] so
/// data-quality issues stay visible in the frequency tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Usage {
    Yes,
    No,
    Regular,
    Other(String),
}

impl Usage {
    /// Normalize a raw cell. Blank cells yield `None`.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let usage = match trimmed.to_lowercase().as_str() {
            "sí" | "si" => Usage::Yes,
            "no" => Usage::No,
            "regular" => Usage::Regular,
            _ => Usage::Other(capitalize_first(trimmed)),
        };
        Some(usage)
    }

    /// The display label, also used when writing the value back to CSV.
    pub fn label(&self) -> &str {
        match self {
            Usage::Yes => "Sí",
            Usage::No => "No",
            Usage::Regular => "Regular",
            Usage::Other(raw) => raw,
        }
    }

    /// Whether the answer counts as having used the tool at all (Sí or Regular).
    pub fn is_engaged(&self) -> bool {
        matches!(self, Usage::Yes | Usage::Regular)
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one cleaned row
// ---------------------------------------------------------------------------

/// One row of the cleaned table.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub name: String,
    /// Numeric-looking string or [`UNASSIGNED_GROUP`].
    pub group: String,
    pub final_score: f64,
    pub method_used: Option<String>,
    pub graph_usage: Option<Usage>,
    pub ai_usage: Option<Usage>,
    pub feedback_link: Option<String>,
    pub explanation_method: Option<String>,
    pub explanation_graph: Option<String>,
    pub explanation_ai: Option<String>,
}

// ---------------------------------------------------------------------------
// Table – the immutable cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset. Row order follows the input file.
///
/// There are no mutating accessors: a filtered view is a new `Table`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<StudentRecord>,
}

impl Table {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudentRecord> {
        self.records.iter()
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a StudentRecord;
    type IntoIter = std::slice::Iter<'a, StudentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<StudentRecord> for Table {
    fn from_iter<I: IntoIterator<Item = StudentRecord>>(iter: I) -> Self {
        Table::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) fn record(name: &str, group: &str, score: f64) -> StudentRecord {
    StudentRecord {
        name: name.to_string(),
        group: group.to_string(),
        final_score: score,
        method_used: None,
        graph_usage: None,
        ai_usage: None,
        feedback_link: None,
        explanation_method: None,
        explanation_graph: None,
        explanation_ai: None,
    }
}
