use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::models::{Category, Grade, Subject, SubjectIdGenerator};

/// Demo transcript: an industrial engineering bachelor with electrical
/// engineering focus. Replace with your own subjects via `--csv`.
pub fn demo_transcript(ids: &mut SubjectIdGenerator) -> anyhow::Result<Vec<Subject>> {
    let rows: Vec<(&str, Option<f64>, u32, Option<&str>)> = vec![
        ("Höhere Mathematik 1", Some(1.7), 8, Some("nawi")),
        ("Höhere Mathematik 2", Some(1.3), 8, Some("nawi")),
        ("Höhere Mathematik 3", Some(2.0), 8, Some("nawi")),
        ("Physik", Some(2.7), 5, Some("nawi")),
        (
            "Statistik für Studierende des Wirtschaftsingenieurwesens",
            Some(1.0),
            6,
            Some("nawi"),
        ),
        ("Elektrizitätsversorgungssysteme", Some(1.3), 5, Some("iwi")),
        (
            "Grundgebiete der Elektrotechnik 1 - Einführung in die Schaltungsanalyse",
            Some(1.7),
            7,
            Some("iwi"),
        ),
        (
            "Grundgebiete der Elektrotechnik 2 - Modellierung und Analyse elektrischer Komponenten und Schaltungen",
            Some(3.0),
            8,
            Some("iwi"),
        ),
        (
            "Grundgebiete der Elektrotechnik 3 - Signale und Systeme",
            Some(1.3),
            8,
            Some("iwi"),
        ),
        (
            "Grundgebiete der Elektrotechnik 4 - Einführung in die elektromagnetischen Felder",
            Some(1.7),
            8,
            Some("iwi"),
        ),
        (
            "Grundgebiete der Informatik 1 - Programmierung, Algorithmen und Datenstrukturen",
            Some(2.0),
            4,
            Some("iwi"),
        ),
        ("Praktikum IT 1", None, 3, Some("iwi")),
        ("Praktikum IT 2", None, 3, Some("iwi")),
        ("Systemtheorie 1", Some(2.3), 5, Some("iwi")),
        (
            "Hoch- und Mittelspannungsschaltgeräte und -anlagen",
            Some(1.0),
            5,
            Some("iwi"),
        ),
        (
            "Planung und Betrieb von Elektrizitätsversorgungssystemen",
            Some(1.3),
            5,
            Some("iwi"),
        ),
        ("Absatz und Beschaffung", Some(1.0), 5, Some("wiwi")),
        ("Buchführung und Internes Rechnungswesen", Some(1.0), 5, Some("wiwi")),
        (
            "Einführung in die Empirische Wirtschaftsforschung",
            Some(1.7),
            5,
            Some("wiwi"),
        ),
        ("Entscheidungslehre", Some(1.0), 5, Some("wiwi")),
        ("Grundlagen des Management", Some(1.3), 5, Some("wiwi")),
        ("Investition und Finanzierung", Some(2.3), 5, Some("wiwi")),
        ("Organisation und Personal", Some(1.7), 5, Some("wiwi")),
        ("Produktion und Logistik", Some(1.0), 5, Some("wiwi")),
        (
            "Quantitative Methoden der Wirtschaftswissenschaften",
            Some(1.7),
            5,
            Some("wiwi"),
        ),
        ("VWL: Einführung", Some(1.0), 5, Some("wiwi")),
        ("VWL: Märkte und strategisches Entscheiden", Some(1.0), 5, Some("wiwi")),
        ("Strategisches Management", Some(1.0), 5, Some("wiwi")),
        ("Industrie Praktikum", None, 12, None),
        ("Bachelorarbeit", Some(1.0), 12, None),
    ];

    rows.into_iter()
        .map(|(name, grade, credits, category)| {
            Subject::new(ids, name, Grade::from(grade), credits, Category::from(category))
                .with_context(|| format!("invalid demo subject `{name}`"))
        })
        .collect()
}

/// Loads subjects from a CSV file with the header `name,grade,credits,category`.
///
/// An empty grade marks an ungraded subject, an empty category an
/// uncategorized one.
pub fn load_csv(path: &Path, ids: &mut SubjectIdGenerator) -> anyhow::Result<Vec<Subject>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_subjects(reader, ids)
}

#[derive(serde::Deserialize)]
struct CsvRow {
    name: String,
    grade: Option<f64>,
    credits: u32,
    category: Option<String>,
}

fn read_subjects<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    ids: &mut SubjectIdGenerator,
) -> anyhow::Result<Vec<Subject>> {
    let mut subjects = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = result.with_context(|| format!("malformed subject on line {line}"))?;
        let subject = Subject::new(
            ids,
            row.name,
            Grade::from(row.grade),
            row.credits,
            Category::from(row.category),
        )
        .with_context(|| format!("invalid subject on line {line}"))?;
        subjects.push(subject);
    }

    debug!(count = subjects.len(), "loaded subjects from csv");
    Ok(subjects)
}
