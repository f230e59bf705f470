//! Shell configuration

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default directory for the catalog and table files
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default catalog file name inside the data directory
pub const DEFAULT_METADATA_FILE: &str = "db_meta.json";

/// Shell configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the catalog and one JSON file per table
    pub data_dir: PathBuf,
    /// Catalog file name inside `data_dir`
    pub metadata_file: String,
    /// Ask before `drop_table` and `delete`
    pub confirm_destructive: bool,
    /// Print how long each command took
    pub report_timing: bool,
    /// Memoize `select` results between mutations
    pub cache_selects: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            confirm_destructive: true,
            report_timing: false,
            cache_selects: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn metadata_file(mut self, metadata_file: impl Into<String>) -> Self {
        self.metadata_file = metadata_file.into();
        self
    }

    pub fn confirm_destructive(mut self, confirm: bool) -> Self {
        self.confirm_destructive = confirm;
        self
    }

    pub fn report_timing(mut self, report: bool) -> Self {
        self.report_timing = report;
        self
    }

    pub fn cache_selects(mut self, cache: bool) -> Self {
        self.cache_selects = cache;
        self
    }

    /// Build a config from command-line arguments (program name excluded).
    ///
    /// Flags: `--data-dir <dir>`, `--yes`, `--timing`, `--no-cache`.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "--data-dir" | "-d" => {
                    let dir = args
                        .next()
                        .ok_or_else(|| Error::Parse("--data-dir needs a directory".to_string()))?;
                    config = config.data_dir(dir.as_ref());
                }
                "--yes" | "-y" => config = config.confirm_destructive(false),
                "--timing" => config = config.report_timing(true),
                "--no-cache" => config = config.cache_selects(false),
                other => return Err(Error::Parse(format!("unknown option '{}'", other))),
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.confirm_destructive);
        assert!(config.cache_selects);
        assert!(!config.report_timing);
    }

    #[test]
    fn test_flags() {
        let config = Config::from_args(["--data-dir", "/tmp/db", "--yes", "--timing", "--no-cache"])
            .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/db"));
        assert!(!config.confirm_destructive);
        assert!(config.report_timing);
        assert!(!config.cache_selects);
    }

    #[test]
    fn test_bad_flags() {
        assert!(Config::from_args(["--data-dir"]).is_err());
        assert!(Config::from_args(["--port", "1"]).is_err());
    }
}
