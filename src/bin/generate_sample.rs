use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;

const OUTPUT_PATH: &str = "datos_taller.csv";

const HEADER: [&str; 10] = [
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

const FIRST_NAMES: [&str; 10] = [
    "María", "José", "Lucía", "Andrés", "Sofía", "Martín", "Valentina", "Julián", "Camila",
    "Sebastián",
];
const LAST_NAMES: [&str; 8] = [
    "Gómez", "Pérez", "Rodríguez", "Muñoz", "Díaz", "Suárez", "Peña", "Jiménez",
];
const METHODS: [&str; 4] = [
    "Propiedades de logaritmos",
    "Cambio de base",
    "Igualación de bases",
    "Tanteo",
];
/// Spellings seen in real survey exports, including ones that must survive
/// normalization unchanged.
const USAGE_SPELLINGS: [&str; 9] = [
    "Sí", "si", "SÍ", "No", "NO", "no", "Regular", "regular", "a veces",
];
const AI_COMMENTS: [&str; 5] = [
    "La IA daba pasos sin justificar el cambio de base.",
    "Me ayudó a revisar el despeje, pero cometió errores con los signos.",
    "Las respuestas eran muy largas; tuve que simplificarlas.",
    "   ",
    "",
];
const LINKS: [&str; 4] = [
    "https://drive.google.com/file/d/retro",
    "retroalimentacion.pdf",
    "Entregado en papel",
    "",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn student_row(rng: &mut SimpleRng, i: usize) -> Vec<String> {
    let name = format!(
        "{} {}",
        FIRST_NAMES[i % FIRST_NAMES.len()],
        LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()]
    );
    let group = match i % 7 {
        6 => String::new(),
        _ => format!("{}", 1 + i % 3),
    };
    // Spanish spreadsheets write decimal commas.
    let score = format!("{:.1}", 1.0 + rng.next_f64() * 4.0).replace('.', ",");
    let method = rng.pick(&METHODS);
    let graph = rng.pick(&USAGE_SPELLINGS);
    let ai = rng.pick(&USAGE_SPELLINGS);

    vec![
        name,
        group,
        score,
        method.to_string(),
        graph.to_string(),
        ai.to_string(),
        rng.pick(&LINKS).to_string(),
        format!("Apliqué {} para despejar x.", method.to_lowercase()),
        "Comparé las curvas para validar la solución.".to_string(),
        rng.pick(&AI_COMMENTS).to_string(),
    ]
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(["Taller exponenciales y logaritmos", "Grado 11", "2025"])?;
    writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for i in 0..30 {
        writer.write_record(student_row(&mut rng, i))?;
        rows += 1;
    }

    // Rows the loader must drop or skip.
    let mut without_score = student_row(&mut rng, 30);
    without_score[2] = String::new();
    writer.write_record(&without_score)?;
    let mut pending = student_row(&mut rng, 31);
    pending[2] = "pendiente".to_string();
    writer.write_record(&pending)?;
    writer.write_record([""; 10])?;
    let mut overlong = student_row(&mut rng, 32);
    overlong.push("columna sobrante".to_string());
    writer.write_record(&overlong)?;

    let buffer = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("flushing CSV buffer")?;
    let text = String::from_utf8(buffer).context("CSV buffer is not UTF-8")?;
    let (bytes, _, unmappable) = WINDOWS_1252.encode(&text);
    if unmappable {
        anyhow::bail!("sample text has characters outside windows-1252");
    }
    std::fs::write(OUTPUT_PATH, &bytes).with_context(|| format!("writing {OUTPUT_PATH}"))?;

    println!("Wrote {rows} valid students (+4 rows to be dropped) to {OUTPUT_PATH} as windows-1252");
    Ok(())
}
