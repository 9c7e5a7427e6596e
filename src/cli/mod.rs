//! CLI command implementations

mod context;
mod run;
pub mod style;

pub use run::run_build;
