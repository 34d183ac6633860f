//! ECTS-weighted grade averages and the search for the subject cancellation
//! that lowers the average the most.

pub mod config;
pub mod grades;
pub mod models;
pub mod optimizer;
pub mod report;
pub mod transcript;

pub use grades::{graded, weighted_average};
pub use models::{
    CancellationOutcome, Category, Grade, OptimizationResult, Subject, SubjectError, SubjectId,
    SubjectIdGenerator,
};
pub use optimizer::{optimize_cancellation, CancellationPolicy};
