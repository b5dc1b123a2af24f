use std::{
    ffi::{OsStr, OsString},
    fs, io,
};

use anyhow::Context as _;

use crate::{
    config::Config,
    extract::extract,
    filter::FileFilter,
    report::{Processed, Report, SkipReason, Skipped},
};

pub struct Preprocessor {
    config: Config,
    filter: FileFilter,
}

struct SourceEntry {
    file_name: OsString,
    is_file: bool,
}

impl Preprocessor {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        let filter = FileFilter::new(&config)?;

        Ok(Self { config, filter })
    }

    pub fn run(&self) -> anyhow::Result<Report> {
        self.ensure_out_dir()?;

        let entries = self.list_src_dir()?;
        let mut report = Report::default();

        for entry in entries {
            let file_name = entry.file_name.to_string_lossy().into_owned();

            if let Some(reason) = self.filter.skip_reason(&file_name) {
                log::debug!("skip {file_name}: {reason}");
                report.skipped.push(Skipped { file_name, reason });
                continue;
            }

            if !entry.is_file {
                log::warn!("skip {file_name}: not a regular file");
                report.skipped.push(Skipped {
                    file_name,
                    reason: SkipReason::NotAFile,
                });
                continue;
            }

            let processed = self.handle_file(&entry.file_name, file_name)?;
            report.processed.push(processed);
        }

        Ok(report)
    }

    fn ensure_out_dir(&self) -> anyhow::Result<()> {
        let out_dir = &self.config.out_dir;

        log::info!("create output dir: {}", out_dir.display());
        match fs::create_dir_all(out_dir) {
            Ok(()) => Ok(()),
            // lost a race with another process creating it
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && out_dir.is_dir() => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("failed to create output dir: {}", out_dir.display())),
        }
    }

    /// Immediate entries of the source dir, sorted by name.
    fn list_src_dir(&self) -> anyhow::Result<Vec<SourceEntry>> {
        let src_dir = &self.config.src_dir;
        let read_err = || format!("failed to read source dir: {}", src_dir.display());

        let mut entries = Vec::new();
        for entry in fs::read_dir(src_dir).with_context(read_err)? {
            let entry = entry.with_context(read_err)?;
            entries.push(SourceEntry {
                is_file: entry.path().is_file(),
                file_name: entry.file_name(),
            });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    fn handle_file(&self, file_name: &OsStr, display_name: String) -> anyhow::Result<Processed> {
        let src_path = self.config.src_dir.join(file_name);
        let dst_path = self.config.out_dir.join(file_name);

        log::info!("Preprocess {display_name}");

        let source = fs::read(&src_path)
            .with_context(|| format!("failed to read source file: {}", src_path.display()))?;

        let extracted = extract(&source, &self.config.markers);
        log::debug!("{display_name}: {}", extracted.kind);

        fs::write(&dst_path, extracted.text)
            .with_context(|| format!("failed to write output file: {}", dst_path.display()))?;

        Ok(Processed {
            file_name: display_name,
            extraction: extracted.kind,
            bytes: extracted.text.len(),
        })
    }
}
