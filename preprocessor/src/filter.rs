use std::path::Path;

use anyhow::Context as _;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::{config::Config, report::SkipReason};

/// Decides by file name which source entries are left out of a run.
pub struct FileFilter {
    test_suffix: String,
    exclude: Gitignore,
}

impl FileFilter {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = GitignoreBuilder::new(&config.src_dir);
        for pattern in &config.exclude {
            builder
                .add_line(None, pattern)
                .with_context(|| format!("invalid exclude pattern: {pattern}"))?;
        }
        let exclude = builder.build().context("failed to build exclude matcher")?;

        Ok(Self {
            test_suffix: config.test_suffix.clone(),
            exclude,
        })
    }

    pub fn skip_reason(&self, file_name: &str) -> Option<SkipReason> {
        if !self.test_suffix.is_empty() && file_name.ends_with(&self.test_suffix) {
            return Some(SkipReason::TestFile);
        }

        if self
            .exclude
            .matched(Path::new(file_name), false)
            .is_ignore()
        {
            return Some(SkipReason::Excluded);
        }

        None
    }
}
