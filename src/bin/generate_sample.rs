use std::path::Path;
use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ARTICLE_COUNT: usize = 2500;

const JOURNALS: [&str; 14] = [
    "PLoS One",
    "bioRxiv",
    "BMJ",
    "Sci Rep",
    "Lancet",
    "Virology",
    "J Virol",
    "Viruses",
    "Nature",
    "Emerg Infect Dis",
    "Vaccine",
    "Journal of Medical Virology",
    "Int J Environ Res Public Health",
    "Front Immunol",
];

const SOURCES: [&str; 6] = ["PMC", "Elsevier", "Medline", "WHO", "MedRxiv", "ArXiv"];

const TOPICS: [&str; 16] = [
    "coronavirus",
    "SARS-CoV-2",
    "COVID-19",
    "respiratory",
    "infection",
    "vaccine",
    "antibody",
    "transmission",
    "pandemic",
    "patients",
    "clinical",
    "spike protein",
    "immune response",
    "public health",
    "outbreak",
    "cells",
];

const TEMPLATES: [&str; 6] = [
    "Analysis of {a} and {b}",
    "{a} in {b}: a cohort study",
    "The role of {a} during the {b}",
    "{a}, {b} and outcomes",
    "Modelling {a} for {b}",
    "Early {a} among {b}",
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Index drawn with probability falling off like `1 / (i + 1)`.
    fn skewed(&mut self, n: usize) -> usize {
        let total: f64 = (1..=n).map(|i| 1.0 / i as f64).sum();
        let mut pick = self.next_f64() * total;
        for i in 0..n {
            pick -= 1.0 / (i + 1) as f64;
            if pick <= 0.0 {
                return i;
            }
        }
        n - 1
    }
}

struct Row {
    title: Option<String>,
    publish_time: Option<String>,
    journal: Option<String>,
    source: Option<String>,
}

fn publish_time(rng: &mut SimpleRng) -> Option<String> {
    let roll = rng.next_f64();
    if roll < 0.02 {
        return None;
    }
    if roll < 0.04 {
        return Some("unknown".to_string());
    }
    // Most of the literature lands in 2020.
    let year = match rng.below(10) {
        0 => 2015 + rng.below(4) as i32,
        1 | 2 => 2019,
        3 => 2021,
        _ => 2020,
    };
    let month = 1 + rng.below(12);
    if roll < 0.10 {
        return Some(year.to_string());
    }
    let day = 1 + rng.below(28);
    Some(format!("{year}-{month:02}-{day:02}"))
}

fn title(rng: &mut SimpleRng) -> Option<String> {
    if rng.next_f64() < 0.03 {
        return None;
    }
    let template = TEMPLATES[rng.below(TEMPLATES.len())];
    let a = TOPICS[rng.skewed(TOPICS.len())];
    let b = TOPICS[rng.skewed(TOPICS.len())];
    Some(template.replacen("{a}", a, 1).replacen("{b}", b, 1))
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ARTICLE_COUNT)
        .map(|_| Row {
            title: title(rng),
            publish_time: publish_time(rng),
            journal: (rng.next_f64() >= 0.05).then(|| JOURNALS[rng.skewed(JOURNALS.len())].to_string()),
            source: Some(SOURCES[rng.skewed(SOURCES.len())].to_string()),
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record(["title", "publish_time", "journal", "source_x"])
        .expect("Failed to write header");
    for row in rows {
        writer
            .write_record([
                row.title.as_deref().unwrap_or(""),
                row.publish_time.as_deref().unwrap_or(""),
                row.journal.as_deref().unwrap_or(""),
                row.source.as_deref().unwrap_or(""),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(path: &Path, rows: &[Row]) {
    let column = |get: fn(&Row) -> Option<&str>| -> StringArray {
        StringArray::from(rows.iter().map(get).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, true),
        Field::new("publish_time", DataType::Utf8, true),
        Field::new("journal", DataType::Utf8, true),
        Field::new("source_x", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(column(|r| r.title.as_deref())),
            Arc::new(column(|r| r.publish_time.as_deref())),
            Arc::new(column(|r| r.journal.as_deref())),
            Arc::new(column(|r| r.source.as_deref())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).expect("Failed to create data directory");

    let csv_path = out_dir.join("cleaned_metadata.csv");
    write_csv(&csv_path, &rows);

    let parquet_path = out_dir.join("cleaned_metadata.parquet");
    write_parquet(&parquet_path, &rows);

    println!(
        "Wrote {} articles to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
}
