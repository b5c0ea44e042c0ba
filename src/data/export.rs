use std::io;

use super::model::{Table, Usage};

const METADATA_LINE: &str = "Exportado por taller-report";

const COLUMNS: [&str; 10] = [
    "Nombre",
    "Grupo",
    "Nota_Final",
    "Metodo_Despeje",
    "Uso_Grafico",
    "Uso_IA",
    "Link_Retro",
    "Expli_Despeje",
    "Expli_Grafico",
    "Expli_Uso_IA",
];

/// Write `table` in the layout the loader reads: one metadata line, the header,
/// then `;`-separated UTF-8 rows.
pub fn write_table<W: io::Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(writer);

    out.write_record([METADATA_LINE])?;
    out.write_record(COLUMNS)?;
    for r in table {
        let score = r.final_score.to_string();
        out.write_record([
            r.name.as_str(),
            r.group.as_str(),
            score.as_str(),
            r.method_used.as_deref().unwrap_or_default(),
            r.graph_usage.as_ref().map(Usage::label).unwrap_or_default(),
            r.ai_usage.as_ref().map(Usage::label).unwrap_or_default(),
            r.feedback_link.as_deref().unwrap_or_default(),
            r.explanation_method.as_deref().unwrap_or_default(),
            r.explanation_graph.as_deref().unwrap_or_default(),
            r.explanation_ai.as_deref().unwrap_or_default(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_bytes, LoadOptions};

    #[test]
    fn cleaning_an_exported_table_is_a_no_op() {
        let raw = "meta\n\
Nombre;Nota_Final;Uso_Grafico;Uso_IA;Expli_Uso_IA;Link_Retro\n\
José;3,5; si ;REGULAR;\"Usé ChatGPT; ayudó\";informe.pdf\n\
Lucía;x;No;No;;\n\
Marta;4;tal vez;;   ;Entregado en papel\n";
        let options = LoadOptions::default();
        let cleaned = parse_bytes(raw.as_bytes(), &options).unwrap();
        assert_eq!(cleaned.len(), 2);

        let mut buf = Vec::new();
        write_table(&cleaned, &mut buf).unwrap();
        let reloaded = parse_bytes(&buf, &options).unwrap();
        assert_eq!(reloaded, cleaned);
    }
}
