//! Command-line interface definitions using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use wikilinks_engine::DEFAULT_MARKDOWN_EXTENSIONS;

#[derive(Debug, Parser)]
#[command(name = "wikilinks")]
#[command(about = "Strip .md extensions from links between wiki pages", long_about = None)]
pub struct Args {
    /// Root directory of the wiki
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Root directory of the wiki (alternative to the positional argument)
    #[arg(long = "path", value_name = "PATH", env = "INPUT_PATH")]
    pub path_option: Option<PathBuf>,

    /// YAML mapping of link globs to the file globs they are ignored in
    #[arg(long, value_name = "YAML", env = "INPUT_IGNORE-FILTER", conflicts_with = "ignore_filter_file")]
    pub ignore_filter: Option<String>,

    /// Read the ignore filter from a YAML file
    #[arg(long, value_name = "FILE")]
    pub ignore_filter_file: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Probe remote links and warn about unreachable ones
    #[arg(long)]
    pub check_remote: bool,

    /// Seconds to wait for a remote link to answer
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub remote_timeout: u64,

    /// File extensions treated as Markdown documents
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Exit with status 2 when any document could not be processed
    #[arg(long)]
    pub fail_on_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Args {
    /// The positional path wins over `--path` and `INPUT_PATH`.
    pub fn root(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| self.path_option.clone())
    }

    pub fn extensions(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        if configured.is_empty() {
            DEFAULT_MARKDOWN_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
        } else {
            configured
        }
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wikilinks").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_path_wins() {
        let args = parse(&["wiki", "--path", "other"]);
        assert_eq!(args.root(), Some(PathBuf::from("wiki")));
    }

    #[test]
    fn extensions_default_and_split() {
        assert_eq!(parse(&["wiki"]).extensions(), vec!["md", "markdown"]);
        assert_eq!(
            parse(&["wiki", "--extensions", ".md,mdx"]).extensions(),
            vec!["md", "mdx"]
        );
    }

    #[test]
    fn inline_and_file_filters_conflict() {
        let result = Args::try_parse_from([
            "wikilinks",
            "wiki",
            "--ignore-filter",
            "a: b",
            "--ignore-filter-file",
            "rules.yml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn log_level_parses() {
        let level = parse(&["wiki", "--log-level", "debug"]).log_level;
        assert_eq!(LevelFilter::from(level), LevelFilter::Debug);
        assert!(Args::try_parse_from(["wikilinks", "wiki", "--log-level", "loud"]).is_err());
    }
}
