use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Best grade on the scale.
pub const GRADE_BEST: f64 = 1.0;
/// Worst grade on the scale.
pub const GRADE_WORST: f64 = 6.0;

#[derive(Debug, Error, PartialEq)]
pub enum SubjectError {
    #[error("subject name must not be empty")]
    EmptyName,

    #[error("subject `{name}` must carry more than 0 credits")]
    NonPositiveCredits { name: String },

    #[error(
        "subject `{name}` has grade {grade}, expected 0 or a value between {} and {}",
        GRADE_BEST,
        GRADE_WORST
    )]
    GradeOutOfScale { name: String, grade: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubjectId(u32);

impl SubjectId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out sequential subject ids for one analysis run.
///
/// Every run owns its own generator, so two transcripts loaded in the same
/// process both start counting at 1.
#[derive(Debug)]
pub struct SubjectIdGenerator {
    next: u32,
}

impl SubjectIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> SubjectId {
        let id = SubjectId(self.next);
        self.next += 1;
        id
    }
}

impl Default for SubjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A subject's grade. `Ungraded` covers pass/fail and in-progress subjects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum Grade {
    Graded(f64),
    Ungraded,
}

impl Grade {
    pub fn value(self) -> Option<f64> {
        match self {
            Grade::Graded(value) => Some(value),
            Grade::Ungraded => None,
        }
    }
}

impl From<Option<f64>> for Grade {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Grade::Ungraded, Grade::Graded)
    }
}

impl From<Grade> for Option<f64> {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Graded(value) => write!(f, "{value:?}"),
            Grade::Ungraded => f.write_str("ungraded"),
        }
    }
}

/// Module category. `Uncategorized` subjects can never be cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "Option<String>")]
pub enum Category {
    Labeled(String),
    Uncategorized,
}

impl Category {
    pub fn labeled(label: impl Into<String>) -> Self {
        Category::from(Some(label.into()))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Category::Labeled(label) => Some(label),
            Category::Uncategorized => None,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Category::Uncategorized)
    }
}

impl From<Option<String>> for Category {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(label) if !label.trim().is_empty() => Category::Labeled(label.trim().to_string()),
            _ => Category::Uncategorized,
        }
    }
}

impl From<Option<&str>> for Category {
    fn from(value: Option<&str>) -> Self {
        Category::from(value.map(str::to_string))
    }
}

impl From<Category> for Option<String> {
    fn from(category: Category) -> Self {
        match category {
            Category::Labeled(label) => Some(label),
            Category::Uncategorized => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("none"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subject {
    id: SubjectId,
    name: String,
    grade: Grade,
    credits: u32,
    category: Category,
}

impl Subject {
    /// Validates the fields and takes the next id from `ids`.
    ///
    /// No id is consumed when validation fails.
    pub fn new(
        ids: &mut SubjectIdGenerator,
        name: impl Into<String>,
        grade: Grade,
        credits: u32,
        category: Category,
    ) -> Result<Self, SubjectError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }
        if credits == 0 {
            return Err(SubjectError::NonPositiveCredits { name });
        }
        if let Grade::Graded(value) = grade {
            // 0 is accepted as a "no grade recorded" marker.
            let on_scale = (GRADE_BEST..=GRADE_WORST).contains(&value);
            if !value.is_finite() || !(value == 0.0 || on_scale) {
                return Err(SubjectError::GradeOutOfScale { name, grade: value });
            }
        }

        Ok(Self {
            id: ids.next_id(),
            name,
            grade,
            credits,
            category,
        })
    }

    pub fn id(&self) -> SubjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn category(&self) -> &Category {
        &self.category
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Subject: {} (ID: {}, Grade: {}, Credits: {}, Category: {})",
            self.name, self.id, self.grade, self.credits, self.category
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub cancelled: Vec<Subject>,
    pub new_average: f64,
    pub cancelled_credits: u64,
    pub original_average: f64,
    pub combinations_evaluated: usize,
}

impl OptimizationResult {
    /// Grade points gained by the cancellation. Positive means better.
    pub fn improvement(&self) -> f64 {
        self.original_average - self.new_average
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CancellationOutcome {
    NoEligibleSubjects,
    NoValidCombination,
    Optimized(OptimizationResult),
}

impl CancellationOutcome {
    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            CancellationOutcome::Optimized(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptSummary {
    pub subject_count: usize,
    pub total_credits: u64,
    pub graded_count: usize,
    pub weighted_average: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub subject_count: usize,
    pub credits: u64,
    pub weighted_average: Option<f64>,
}
