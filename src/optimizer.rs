use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::grades::{fixed, graded, weighted_average};
use crate::models::{CancellationOutcome, OptimizationResult, Subject};

pub const DEFAULT_MAX_CANCELLED_CREDITS: u32 = 15;
pub const DEFAULT_CATEGORIES: [&str; 3] = ["wiwi", "nawi", "iwi"];

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("at least one cancellation category is required")]
    NoCategories,

    #[error("category labels must not be empty")]
    EmptyCategory,

    #[error("category `{0}` is listed more than once")]
    DuplicateCategory(String),
}

/// Rules a cancellation has to satisfy.
///
/// The category order is also the enumeration order, which decides ties.
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationPolicy {
    categories: Vec<String>,
    max_cancelled_credits: u32,
}

impl CancellationPolicy {
    pub fn new<I, S>(categories: I, max_cancelled_credits: u32) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<String> = categories
            .into_iter()
            .map(|label| label.into().trim().to_string())
            .collect();

        if categories.is_empty() {
            return Err(PolicyError::NoCategories);
        }

        let mut seen = HashSet::new();
        for label in &categories {
            if label.is_empty() {
                return Err(PolicyError::EmptyCategory);
            }
            if !seen.insert(label.as_str()) {
                return Err(PolicyError::DuplicateCategory(label.clone()));
            }
        }

        Ok(Self {
            categories,
            max_cancelled_credits,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn max_cancelled_credits(&self) -> u32 {
        self.max_cancelled_credits
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|label| label.to_string()).collect(),
            max_cancelled_credits: DEFAULT_MAX_CANCELLED_CREDITS,
        }
    }
}

/// Lazy Cartesian product of per-category choices.
///
/// Each category contributes `None` (cancel nothing) followed by its subjects
/// in input order. The first category varies slowest. The number of yielded
/// combinations is the product of `1 + |category|` over all categories, so it
/// grows exponentially with the category count.
pub struct Combinations<'a> {
    choices: Vec<Vec<Option<&'a Subject>>>,
    cursor: Vec<usize>,
    exhausted: bool,
}

impl<'a> Combinations<'a> {
    pub fn new(groups: &[Vec<&'a Subject>]) -> Self {
        let choices: Vec<Vec<Option<&'a Subject>>> = groups
            .iter()
            .map(|group| {
                std::iter::once(None)
                    .chain(group.iter().copied().map(Some))
                    .collect()
            })
            .collect();
        let cursor = vec![0; choices.len()];

        Self {
            choices,
            cursor,
            exhausted: false,
        }
    }

    /// Total number of combinations, saturating at `usize::MAX`.
    pub fn search_space_size(&self) -> usize {
        self.choices
            .iter()
            .fold(1usize, |size, choices| size.saturating_mul(choices.len()))
    }
}

impl<'a> Iterator for Combinations<'a> {
    type Item = Vec<Option<&'a Subject>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let combination = self
            .cursor
            .iter()
            .zip(&self.choices)
            .map(|(&index, choices)| choices[index])
            .collect();

        // Advance the rightmost position, carrying leftwards.
        let mut position = self.cursor.len();
        loop {
            if position == 0 {
                self.exhausted = true;
                break;
            }
            position -= 1;
            self.cursor[position] += 1;
            if self.cursor[position] < self.choices[position].len() {
                break;
            }
            self.cursor[position] = 0;
        }

        Some(combination)
    }
}

/// Groups cancellable subjects by the policy's categories, in policy order.
///
/// Subjects whose label is not part of the policy get no group: they stay in
/// every average but can never be cancelled.
pub fn partition_by_category<'a>(
    cancellable: &[&'a Subject],
    policy: &CancellationPolicy,
) -> Vec<Vec<&'a Subject>> {
    for subject in cancellable {
        if let Some(label) = subject.category().label() {
            if !policy.categories().iter().any(|known| known == label) {
                warn!(
                    subject = subject.name(),
                    category = label,
                    "category is not cancellable under the current policy"
                );
            }
        }
    }

    policy
        .categories()
        .iter()
        .map(|known| {
            cancellable
                .iter()
                .copied()
                .filter(|subject| subject.category().label() == Some(known.as_str()))
                .collect()
        })
        .collect()
}

struct Candidate<'a> {
    cancelled: Vec<&'a Subject>,
    cancelled_credits: u64,
    average: f64,
}

/// Finds the cancellation that minimizes the credit-weighted average.
///
/// At most one subject per policy category is cancelled and the cancelled
/// credits stay within the policy budget. Uncategorized graded subjects are
/// part of every average. Among equal averages the first combination in
/// enumeration order wins.
pub fn optimize_cancellation(
    subjects: &[Subject],
    policy: &CancellationPolicy,
) -> CancellationOutcome {
    let cancellable = graded(subjects, true);
    let fixed = fixed(subjects);

    if cancellable.is_empty() {
        info!("no cancellable graded subjects found");
        return CancellationOutcome::NoEligibleSubjects;
    }

    let groups = partition_by_category(&cancellable, policy);
    let combinations = Combinations::new(&groups);
    debug!(
        cancellable = cancellable.len(),
        fixed = fixed.len(),
        search_space = combinations.search_space_size(),
        "checking all cancellation combinations"
    );

    let mut best: Option<Candidate<'_>> = None;
    let mut evaluated = 0usize;

    for combination in combinations {
        let cancelled: Vec<&Subject> = combination.into_iter().flatten().collect();
        let cancelled_credits: u64 = cancelled
            .iter()
            .map(|subject| u64::from(subject.credits()))
            .sum();
        if cancelled_credits > u64::from(policy.max_cancelled_credits()) {
            continue;
        }

        let remaining: Vec<&Subject> = cancellable
            .iter()
            .copied()
            .filter(|subject| !cancelled.iter().any(|gone| gone.id() == subject.id()))
            .chain(fixed.iter().copied())
            .collect();
        if remaining.is_empty() {
            continue;
        }

        let average = weighted_average(remaining);
        evaluated += 1;

        if best.as_ref().map_or(true, |current| average < current.average) {
            best = Some(Candidate {
                cancelled,
                cancelled_credits,
                average,
            });
        }
    }

    let Some(best) = best else {
        info!("no combination satisfies the cancellation rules");
        return CancellationOutcome::NoValidCombination;
    };

    let original_average = weighted_average(cancellable.iter().chain(fixed.iter()).copied());
    info!(
        new_average = best.average,
        original_average,
        cancelled_credits = best.cancelled_credits,
        evaluated,
        "found optimal cancellation"
    );

    CancellationOutcome::Optimized(OptimizationResult {
        cancelled: best.cancelled.into_iter().cloned().collect(),
        new_average: best.average,
        cancelled_credits: best.cancelled_credits,
        original_average,
        combinations_evaluated: evaluated,
    })
}
