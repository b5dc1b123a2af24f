use std::{
    fs, io,
    path::{self, Path, PathBuf},
};

use anyhow::{Context as _, bail};
use serde::Deserialize;

pub const SRC_DIR: &str = "src/main/javascript";
pub const OUT_DIR: &str = "target/temp";
pub const BEGIN_MARKER: &str = "// preprocess-umd: BEGIN";
pub const END_MARKER: &str = "// preprocess-umd: END";
pub const TEST_SUFFIX: &str = ".test.js";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
    pub markers: Markers,
    /// Files whose name ends with this are skipped. Empty disables the check.
    pub test_suffix: String,
    /// Gitignore-style globs matched against file names.
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    pub begin: String,
    pub end: String,
}

/// Values given on the command line, applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub src_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub test_suffix: Option<String>,
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: SRC_DIR.into(),
            out_dir: OUT_DIR.into(),
            markers: Markers::default(),
            test_suffix: TEST_SUFFIX.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            begin: BEGIN_MARKER.to_string(),
            end: END_MARKER.to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open config file: {}", path.display()))?;
        serde_yaml::from_reader(file)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(src_dir) = overrides.src_dir {
            self.src_dir = src_dir;
        }
        if let Some(out_dir) = overrides.out_dir {
            self.out_dir = out_dir;
        }
        if let Some(begin) = overrides.begin {
            self.markers.begin = begin;
        }
        if let Some(end) = overrides.end {
            self.markers.end = end;
        }
        if let Some(test_suffix) = overrides.test_suffix {
            self.test_suffix = test_suffix;
        }
        self.exclude.extend(overrides.exclude);
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.markers.begin.is_empty() {
            bail!("begin marker must not be empty");
        }
        if self.markers.end.is_empty() {
            bail!("end marker must not be empty");
        }

        let src_dir = resolve(&self.src_dir)
            .with_context(|| format!("failed to resolve source dir: {}", self.src_dir.display()))?;
        let out_dir = resolve(&self.out_dir)
            .with_context(|| format!("failed to resolve output dir: {}", self.out_dir.display()))?;
        if src_dir.starts_with(&out_dir) {
            bail!(
                "output dir `{}` is or contains the source dir `{}`",
                self.out_dir.display(),
                self.src_dir.display()
            );
        }
        Ok(())
    }
}

/// Absolute path with symlinks resolved as far as the path exists.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let path = path::absolute(path)?;
    for ancestor in path.ancestors() {
        if let Ok(base) = fs::canonicalize(ancestor) {
            let rest = path.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return Ok(base.join(rest));
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.src_dir, Path::new("src/main/javascript"));
        assert_eq!(config.out_dir, Path::new("target/temp"));
        assert_eq!(config.markers.begin, "// preprocess-umd: BEGIN");
        assert_eq!(config.markers.end, "// preprocess-umd: END");
        assert_eq!(config.test_suffix, ".test.js");
        assert!(config.exclude.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preprocess.yaml");
        fs::write(
            &path,
            "out_dir: build/umd\nmarkers:\n  end: \"// umd-end\"\nexclude:\n  - \"*.d.ts\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.src_dir, Path::new(SRC_DIR));
        assert_eq!(config.out_dir, Path::new("build/umd"));
        assert_eq!(config.markers.begin, BEGIN_MARKER);
        assert_eq!(config.markers.end, "// umd-end");
        assert_eq!(config.exclude, vec!["*.d.ts".to_string()]);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preprocess.yaml");
        fs::write(&path, "source: lib\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn overrides_win_and_excludes_append() {
        let config = Config {
            exclude: vec!["*.map".to_string()],
            ..Config::default()
        }
        .with_overrides(Overrides {
            src_dir: Some("lib".into()),
            begin: Some("//<".to_string()),
            test_suffix: Some(String::new()),
            exclude: vec!["*.d.ts".to_string()],
            ..Overrides::default()
        });

        assert_eq!(config.src_dir, Path::new("lib"));
        assert_eq!(config.out_dir, Path::new(OUT_DIR));
        assert_eq!(config.markers.begin, "//<");
        assert_eq!(config.markers.end, END_MARKER);
        assert_eq!(config.test_suffix, "");
        assert_eq!(config.exclude, vec!["*.map", "*.d.ts"]);
    }

    #[test]
    fn empty_marker_is_invalid() {
        let config = Config::default().with_overrides(Overrides {
            end: Some(String::new()),
            ..Overrides::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_dir_spelled_differently_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/main/javascript");
        fs::create_dir_all(&src).unwrap();

        let with_out = |out_dir: PathBuf| Config {
            src_dir: src.clone(),
            out_dir,
            ..Config::default()
        };

        assert!(with_out(dir.path().join("src/main/./javascript")).validate().is_err());
        assert!(with_out(dir.path().join("src/main/../main/javascript")).validate().is_err());
        assert!(with_out(dir.path().join("src")).validate().is_err());
        assert!(with_out(dir.path().to_path_buf()).validate().is_err());
        assert!(with_out(dir.path().join("target/temp")).validate().is_ok());
        assert!(with_out(src.join("out")).validate().is_ok());
    }

    #[test]
    fn relative_dot_spelling_is_invalid() {
        let config = Config::default().with_overrides(Overrides {
            out_dir: Some("./src/main/javascript".into()),
            ..Overrides::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn same_src_and_out_is_invalid() {
        let config = Config::default().with_overrides(Overrides {
            out_dir: Some(SRC_DIR.into()),
            ..Overrides::default()
        });
        assert!(config.validate().is_err());
    }
}
