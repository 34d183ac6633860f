use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::grades::{graded, weighted_average};
use crate::models::{CancellationOutcome, CategorySummary, Subject, TranscriptSummary};
use crate::optimizer::CancellationPolicy;

pub fn summarize(subjects: &[Subject]) -> TranscriptSummary {
    let graded_subjects = graded(subjects, false);

    TranscriptSummary {
        subject_count: subjects.len(),
        total_credits: subjects.iter().map(|subject| u64::from(subject.credits())).sum(),
        graded_count: graded_subjects.len(),
        weighted_average: if graded_subjects.is_empty() {
            None
        } else {
            Some(weighted_average(graded_subjects))
        },
    }
}

pub fn summarize_by_category(subjects: &[Subject]) -> Vec<CategorySummary> {
    let graded_subjects = graded(subjects, false);
    let mut map: HashMap<String, Vec<&Subject>> = HashMap::new();

    for subject in subjects {
        map.entry(subject.category().to_string())
            .or_default()
            .push(subject);
    }

    let mut summaries: Vec<CategorySummary> = map
        .into_iter()
        .map(|(category, members)| {
            let graded_members: Vec<&Subject> = graded_subjects
                .iter()
                .copied()
                .filter(|subject| subject.category().to_string() == category)
                .collect();

            CategorySummary {
                category,
                subject_count: members.len(),
                credits: members.iter().map(|subject| u64::from(subject.credits())).sum(),
                weighted_average: if graded_members.is_empty() {
                    None
                } else {
                    Some(weighted_average(graded_members))
                },
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.credits
            .cmp(&a.credits)
            .then_with(|| a.category.cmp(&b.category))
    });
    summaries
}

pub fn format_average(average: Option<f64>) -> String {
    average.map_or_else(|| "n/a".to_string(), |value| format!("{value:.2}"))
}

pub fn build_report(
    source: &str,
    generated_on: NaiveDate,
    subjects: &[Subject],
    policy: &CancellationPolicy,
    outcome: &CancellationOutcome,
) -> String {
    let summary = summarize(subjects);
    let categories = summarize_by_category(subjects);

    let mut output = String::new();

    let _ = writeln!(output, "# ECTS Cancellation Report");
    let _ = writeln!(output, "Generated for {} on {}", source, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Transcript");
    let _ = writeln!(output, "- Subjects: {}", summary.subject_count);
    let _ = writeln!(output, "- Total credits: {}", summary.total_credits);
    let _ = writeln!(output, "- Graded subjects: {}", summary.graded_count);
    let _ = writeln!(
        output,
        "- Weighted average: {}",
        format_average(summary.weighted_average)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Mix");

    if categories.is_empty() {
        let _ = writeln!(output, "No subjects recorded.");
    } else {
        for category in categories.iter() {
            let _ = writeln!(
                output,
                "- {}: {} subjects, {} credits (avg {})",
                category.category,
                category.subject_count,
                category.credits,
                format_average(category.weighted_average)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Optimal Cancellation");
    let _ = writeln!(
        output,
        "Rules: at most one subject per category ({}), at most {} credits in total.",
        policy.categories().join(", "),
        policy.max_cancelled_credits()
    );
    let _ = writeln!(output);

    match outcome {
        CancellationOutcome::NoEligibleSubjects => {
            let _ = writeln!(output, "No cancellable graded subjects found.");
        }
        CancellationOutcome::NoValidCombination => {
            let _ = writeln!(output, "No valid combination found.");
        }
        CancellationOutcome::Optimized(result) => {
            let _ = writeln!(output, "- New weighted average: {:.2}", result.new_average);
            let _ = writeln!(output, "- Cancelled credits: {}", result.cancelled_credits);
            let _ = writeln!(output, "- Improvement: {:.2} grade points", result.improvement());
            let _ = writeln!(output);
            let _ = writeln!(output, "### Cancelled Subjects");

            if result.cancelled.is_empty() {
                let _ = writeln!(output, "Cancelling nothing gives the best average.");
            } else {
                for subject in result.cancelled.iter() {
                    let _ = writeln!(
                        output,
                        "- {} (grade {}, {} credits, {})",
                        subject.name(),
                        subject.grade(),
                        subject.credits(),
                        subject.category()
                    );
                }
            }
        }
    }

    output
}
