use std::fmt;

use crate::extract::Extraction;

/// Outcome of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub processed: Vec<Processed>,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub file_name: String,
    pub extraction: Extraction,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub file_name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TestFile,
    Excluded,
    NotAFile,
}

impl Report {
    pub fn processed_names(&self) -> impl Iterator<Item = &str> {
        self.processed.iter().map(|x| x.file_name.as_str())
    }

    pub fn skipped_names(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(|x| x.file_name.as_str())
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TestFile => "test file",
            Self::Excluded => "excluded",
            Self::NotAFile => "not a file",
        };
        f.write_str(s)
    }
}
