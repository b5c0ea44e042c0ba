use std::collections::HashMap;

use thiserror::Error;

use super::filter::{filter_by_group, student_names};
use super::model::{StudentRecord, Table, Usage};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub total: usize,
    pub mean_score: f64,
    /// Share of students answering exactly "Sí"; "Regular" does not count.
    pub pct_graph_yes: f64,
    pub pct_ai_yes: f64,
}

/// `None` for an empty table.
pub fn summary_metrics(table: &Table) -> Option<SummaryMetrics> {
    if table.is_empty() {
        return None;
    }
    let total = table.len();
    let sum: f64 = table.iter().map(|r| r.final_score).sum();

    Some(SummaryMetrics {
        total,
        mean_score: sum / total as f64,
        pct_graph_yes: pct_yes(table.iter().map(|r| r.graph_usage.as_ref()), total),
        pct_ai_yes: pct_yes(table.iter().map(|r| r.ai_usage.as_ref()), total),
    })
}

fn pct_yes<'a>(answers: impl Iterator<Item = Option<&'a Usage>>, total: usize) -> f64 {
    let yes = answers.filter(|a| *a == Some(&Usage::Yes)).count();
    yes as f64 / total as f64 * 100.0
}

// ---------------------------------------------------------------------------
// Frequency tables
// ---------------------------------------------------------------------------

/// Categorical columns that can be histogrammed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    Method,
    GraphUsage,
    AiUsage,
    Group,
}

impl CategoricalField {
    fn value(self, record: &StudentRecord) -> Option<&str> {
        let value = match self {
            CategoricalField::Method => record.method_used.as_deref(),
            CategoricalField::GraphUsage => record.graph_usage.as_ref().map(Usage::label),
            CategoricalField::AiUsage => record.ai_usage.as_ref().map(Usage::label),
            CategoricalField::Group => Some(record.group.as_str()),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// `(value, count)` pairs by descending count; ties keep first-seen order.
/// Blank cells are not counted.
pub fn frequency_table(table: &Table, field: CategoricalField) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for value in table.iter().filter_map(|r| field.value(r)) {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Score histogram
// ---------------------------------------------------------------------------

pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width bins spanning the score range; the last bin includes the maximum.
pub fn score_histogram(table: &Table, bins: usize) -> Vec<HistogramBin> {
    let scores: Vec<f64> = table.iter().map(|r| r.final_score).collect();
    let (Some(min), Some(max)) = (
        scores.iter().copied().reduce(f64::min),
        scores.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if bins == 0 || max == min {
        return vec![HistogramBin {
            lower: min - 0.5,
            upper: min + 0.5,
            count: scores.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for score in scores {
        let slot = (((score - min) / width) as usize).min(bins - 1);
        histogram[slot].count += 1;
    }
    histogram
}

// ---------------------------------------------------------------------------
// AI usage comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AiComment {
    pub name: String,
    pub level: Usage,
    pub comment: String,
}

/// Students who used AI ("Sí" or "Regular") and left a non-blank explanation.
pub fn ai_usage_comments(table: &Table) -> Vec<AiComment> {
    table
        .iter()
        .filter_map(|r| {
            let level = r.ai_usage.as_ref().filter(|u| u.is_engaged())?;
            let comment = r
                .explanation_ai
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())?;
            Some(AiComment {
                name: r.name.clone(),
                level: level.clone(),
                comment: comment.to_string(),
            })
        })
        .collect()
}

/// Whether anyone in the table reported using AI at all.
pub fn has_ai_users(table: &Table) -> bool {
    table
        .iter()
        .any(|r| r.ai_usage.as_ref().is_some_and(Usage::is_engaged))
}

// ---------------------------------------------------------------------------
// Per-student lookup
// ---------------------------------------------------------------------------

/// First record whose name matches exactly. Duplicate names are not
/// disambiguated.
pub fn student_record_lookup<'a>(table: &'a Table, name: &str) -> Option<&'a StudentRecord> {
    table.iter().find(|r| r.name == name)
}

/// How a `Link_Retro` value should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackLink {
    Empty,
    DocumentReference(String),
    Hyperlink(String),
}

pub fn classify_feedback_link(raw: Option<&str>) -> FeedbackLink {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        FeedbackLink::Empty
    } else if ["http", ".com", ".pdf"].iter().any(|marker| text.contains(marker)) {
        FeedbackLink::Hyperlink(text.to_string())
    } else {
        FeedbackLink::DocumentReference(text.to_string())
    }
}

/// Everything the per-student panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFeedback {
    pub name: String,
    pub final_score: f64,
    pub link: FeedbackLink,
    pub method: Option<String>,
    pub explanation_method: Option<String>,
    pub graph_usage: Option<Usage>,
    pub explanation_graph: Option<String>,
    pub ai_usage: Option<Usage>,
    pub explanation_ai: Option<String>,
}

impl StudentFeedback {
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            final_score: record.final_score,
            link: classify_feedback_link(record.feedback_link.as_deref()),
            method: record.method_used.clone(),
            explanation_method: record.explanation_method.clone(),
            graph_usage: record.graph_usage.clone(),
            explanation_graph: record.explanation_graph.clone(),
            ai_usage: record.ai_usage.clone(),
            explanation_ai: record.explanation_ai.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report view model
// ---------------------------------------------------------------------------

/// The selected group has no students. Not fatal: the caller shows an
/// empty-state message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no hay datos para mostrar con la selección actual ({group})")]
pub struct NoDataAfterFiltering {
    pub group: String,
}

/// All derived values for one group selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub group: String,
    pub filtered: Table,
    pub summary: SummaryMetrics,
    pub methods: Vec<(String, usize)>,
    pub graph_usage: Vec<(String, usize)>,
    pub ai_usage: Vec<(String, usize)>,
    pub histogram: Vec<HistogramBin>,
    pub ai_comments: Vec<AiComment>,
    pub has_ai_users: bool,
    pub student_names: Vec<String>,
}

impl ReportView {
    pub fn student(&self, name: &str) -> Option<StudentFeedback> {
        student_record_lookup(&self.filtered, name).map(StudentFeedback::from_record)
    }
}

pub fn build_report(table: &Table, group: &str) -> Result<ReportView, NoDataAfterFiltering> {
    let filtered = filter_by_group(table, group);
    let summary = summary_metrics(&filtered).ok_or_else(|| NoDataAfterFiltering {
        group: group.to_string(),
    })?;

    Ok(ReportView {
        group: group.to_string(),
        summary,
        methods: frequency_table(&filtered, CategoricalField::Method),
        graph_usage: frequency_table(&filtered, CategoricalField::GraphUsage),
        ai_usage: frequency_table(&filtered, CategoricalField::AiUsage),
        histogram: score_histogram(&filtered, DEFAULT_HISTOGRAM_BINS),
        ai_comments: ai_usage_comments(&filtered),
        has_ai_users: has_ai_users(&filtered),
        student_names: student_names(&filtered),
        filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_bytes, LoadOptions};
    use crate::data::model::{record, ALL_GROUPS};

    fn with_usage(name: &str, graph: Option<Usage>, ai: Option<Usage>) -> StudentRecord {
        StudentRecord {
            graph_usage: graph,
            ai_usage: ai,
            ..record(name, "1", 3.0)
        }
    }

    #[test]
    fn percentages_count_strict_yes_only() {
        let table = Table::new(vec![
            with_usage("a", Some(Usage::Yes), Some(Usage::Regular)),
            with_usage("b", Some(Usage::No), Some(Usage::Regular)),
            with_usage("c", Some(Usage::Regular), None),
            with_usage("d", Some(Usage::Yes), Some(Usage::Yes)),
        ]);
        let summary = summary_metrics(&table).unwrap();
        assert_eq!(summary.pct_graph_yes, 50.0);
        assert_eq!(summary.pct_ai_yes, 25.0);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn empty_table_has_no_summary() {
        assert_eq!(summary_metrics(&Table::default()), None);
    }

    #[test]
    fn mean_over_kept_rows() {
        let table = Table::new(vec![
            record("a", "1", 4.0),
            record("b", "1", 3.0),
            record("c", "1", 5.0),
            record("d", "1", 2.0),
        ]);
        assert_eq!(summary_metrics(&table).unwrap().mean_score, 3.5);
    }

    #[test]
    fn frequency_orders_by_count_then_first_seen() {
        let mut rows = Vec::new();
        for (name, method) in [
            ("a", "Propiedades"),
            ("b", "Cambio de base"),
            ("c", "Cambio de base"),
            ("d", "Tanteo"),
            ("e", "Propiedades"),
            ("f", "Gráfico"),
            ("g", "  "),
        ] {
            rows.push(StudentRecord {
                method_used: Some(method.to_string()),
                ..record(name, "1", 3.0)
            });
        }
        let counts = frequency_table(&Table::new(rows), CategoricalField::Method);
        assert_eq!(
            counts,
            [
                ("Propiedades".to_string(), 2),
                ("Cambio de base".to_string(), 2),
                ("Tanteo".to_string(), 1),
                ("Gráfico".to_string(), 1),
            ]
        );
    }

    #[test]
    fn frequency_surfaces_unrecognized_usage() {
        let table = Table::new(vec![
            with_usage("a", Some(Usage::Yes), None),
            with_usage("b", Some(Usage::Other("Tal vez".into())), None),
            with_usage("c", None, None),
        ]);
        let counts = frequency_table(&table, CategoricalField::GraphUsage);
        assert_eq!(
            counts,
            [("Sí".to_string(), 1), ("Tal vez".to_string(), 1)]
        );
    }

    #[test]
    fn ai_comments_need_usage_and_text() {
        let mut rows = vec![
            with_usage("blank", None, Some(Usage::Yes)),
            with_usage("regular", None, Some(Usage::Regular)),
            with_usage("no", None, Some(Usage::No)),
            with_usage("missing", None, Some(Usage::Yes)),
            with_usage("yes", None, Some(Usage::Yes)),
        ];
        rows[0].explanation_ai = Some("   ".into());
        rows[1].explanation_ai = Some("Me ayudó a revisar".into());
        rows[2].explanation_ai = Some("No la usé".into());
        rows[4].explanation_ai = Some(" Errores en logaritmos ".into());

        let comments = ai_usage_comments(&Table::new(rows));
        assert_eq!(
            comments,
            [
                AiComment {
                    name: "regular".into(),
                    level: Usage::Regular,
                    comment: "Me ayudó a revisar".into(),
                },
                AiComment {
                    name: "yes".into(),
                    level: Usage::Yes,
                    comment: "Errores en logaritmos".into(),
                },
            ]
        );
    }

    #[test]
    fn ai_users_without_comments_are_detected() {
        let table = Table::new(vec![with_usage("a", None, Some(Usage::Regular))]);
        assert!(has_ai_users(&table));
        assert!(ai_usage_comments(&table).is_empty());
        assert!(!has_ai_users(&Table::new(vec![with_usage("b", None, Some(Usage::No))])));
    }

    #[test]
    fn lookup_returns_first_duplicate() {
        // Duplicate names are not disambiguated; the earliest row wins.
        let table = Table::new(vec![
            record("Ana", "1", 4.0),
            record("Ana", "2", 2.0),
        ]);
        let found = student_record_lookup(&table, "Ana").unwrap();
        assert_eq!(found.group, "1");
        assert!(student_record_lookup(&table, "ana").is_none());
    }

    #[test]
    fn feedback_links_are_classified() {
        assert_eq!(
            classify_feedback_link(Some("https://drive.google.com/x")),
            FeedbackLink::Hyperlink("https://drive.google.com/x".into())
        );
        assert_eq!(
            classify_feedback_link(Some("informe_final.pdf")),
            FeedbackLink::Hyperlink("informe_final.pdf".into())
        );
        assert_eq!(
            classify_feedback_link(Some("  Entregado en papel ")),
            FeedbackLink::DocumentReference("Entregado en papel".into())
        );
        assert_eq!(classify_feedback_link(Some("   ")), FeedbackLink::Empty);
        assert_eq!(classify_feedback_link(None), FeedbackLink::Empty);
        // Case-sensitive markers.
        assert_eq!(
            classify_feedback_link(Some("INFORME.PDF")),
            FeedbackLink::DocumentReference("INFORME.PDF".into())
        );
    }

    #[test]
    fn histogram_covers_all_scores() {
        let table: Table = [1.0, 2.0, 3.0, 4.0, 5.0]
            .into_iter()
            .enumerate()
            .map(|(i, s)| record(&i.to_string(), "1", s))
            .collect();
        let bins = score_histogram(&table, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[3].upper, 5.0);
        assert_eq!(bins[3].count, 2);
    }

    #[test]
    fn histogram_of_equal_scores_is_one_bin() {
        let table = Table::new(vec![record("a", "1", 3.0), record("b", "1", 3.0)]);
        let bins = score_histogram(&table, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].center(), 3.0);
        assert!(score_histogram(&Table::default(), 10).is_empty());
    }

    #[test]
    fn mean_skips_rows_dropped_at_load() {
        let text = "\
Taller;;
Nombre;Grupo;Nota_Final;Uso_Grafico
Ana;1;4,0;Sí
Beto;1;;Sí
Carla;1;3.0;No
Dani;2;5;Regular
Eva;2;2;Sí
";
        let table = parse_bytes(text.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(table.len(), 4);
        let summary = summary_metrics(&table).unwrap();
        assert_eq!(summary.mean_score, 3.5);
        assert_eq!(summary.pct_graph_yes, 50.0);
    }

    #[test]
    fn report_for_empty_group_is_no_data() {
        let table = Table::new(vec![record("a", "1", 3.0)]);
        assert_eq!(
            build_report(&table, "2").unwrap_err(),
            NoDataAfterFiltering { group: "2".into() }
        );
        let view = build_report(&table, ALL_GROUPS).unwrap();
        assert_eq!(view.student_names, ["a"]);
        assert_eq!(view.student("a").unwrap().link, FeedbackLink::Empty);
    }
}
