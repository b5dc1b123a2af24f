mod config;
mod extract;
mod filter;
mod preprocessor;
mod report;

pub use config::{Config, Markers, Overrides};
pub use extract::{Extracted, Extraction, extract};
pub use report::{Processed, Report, SkipReason, Skipped};

pub fn run(config: Config) -> anyhow::Result<Report> {
    let preprocessor = preprocessor::Preprocessor::new(config)?;
    preprocessor.run()
}
