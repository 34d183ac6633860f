use std::path::PathBuf;

use clap::Args;

use crate::optimizer::{
    CancellationPolicy, PolicyError, DEFAULT_CATEGORIES, DEFAULT_MAX_CANCELLED_CREDITS,
};

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct PlannerConfig {
    /// Transcript CSV with the columns name,grade,credits,category
    #[arg(long, global = true, env = "ECTS_TRANSCRIPT")]
    pub csv: Option<PathBuf>,

    /// Maximum number of credits that may be cancelled in total
    #[arg(
        long,
        global = true,
        env = "ECTS_MAX_CANCELLED_CREDITS",
        default_value_t = DEFAULT_MAX_CANCELLED_CREDITS
    )]
    pub max_credits: u32,

    /// Cancellable categories, in enumeration order
    #[arg(
        long,
        global = true,
        env = "ECTS_CATEGORIES",
        value_delimiter = ',',
        default_values_t = DEFAULT_CATEGORIES.map(String::from)
    )]
    pub categories: Vec<String>,
}

impl PlannerConfig {
    pub fn policy(&self) -> Result<CancellationPolicy, PolicyError> {
        CancellationPolicy::new(self.categories.iter().cloned(), self.max_credits)
    }

    /// Human-readable name of the transcript source.
    pub fn source_label(&self) -> String {
        match &self.csv {
            Some(path) => path.display().to_string(),
            None => "demo transcript".to_string(),
        }
    }
}
