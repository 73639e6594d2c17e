//! Command-line interface for mutcheck.

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::RuleConfig;
use crate::parser;
use crate::report::{self, FileReport};
use crate::rules;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default configuration file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["mutcheck.yaml", ".mutcheck.yaml"];

/// File extensions treated as JavaScript sources.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Mutation safety linter for JavaScript.
///
/// Mutcheck reports assignments, update operators, and method or function
/// calls that mutate data not owned by the enclosing scope. Locally
/// allocated bindings may be mutated freely; everything that escapes or
/// arrives from outside is off limits.
#[derive(Parser)]
#[command(name = "mutcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint sources for mutation violations
    #[command(visible_alias = "check")]
    Lint(LintArgs),
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to lint (file or directory)
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Discover a configuration file in the current directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Collect JavaScript sources under `root`.
fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            // Only descendants are filtered; the walk root itself may be a
            // hidden directory and must still be scanned.
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && (name.starts_with('.') || name == "node_modules") {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if SOURCE_EXTENSIONS.contains(&ext) {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Lint one file. Answers `None` when the file cannot be read or parsed;
/// the caller reports and skips it.
fn lint_file(path: &Path, config: &RuleConfig) -> Option<FileReport> {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: skipping {}: {}", path.display(), e);
            return None;
        }
    };
    let tree = match parser::parse_source(&source) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Warning: skipping {}: {}", path.display(), e);
            return None;
        }
    };
    Some(FileReport {
        file: path.display().to_string(),
        violations: rules::check_tree(&tree, config),
    })
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match args.config.clone().or_else(discover_config) {
        Some(path) => match RuleConfig::parse_file(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing configuration: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => RuleConfig::default(),
    };

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if metadata.is_dir() {
        collect_files(&args.path)?
    } else {
        vec![args.path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to lint");
        return Ok(EXIT_SUCCESS);
    }

    let mut reports: Vec<FileReport> = files
        .par_iter()
        .filter_map(|path| lint_file(path, &config))
        .collect();
    reports.sort_by(|a, b| a.file.cmp(&b.file));

    let failed = reports.iter().any(|r| !r.is_clean());

    match args.format.as_str() {
        "json" => println!("{}", report::render_json(&reports)?),
        _ => print!("{}", report::render_pretty(&reports)),
    }

    Ok(if failed { EXIT_FAILED } else { EXIT_SUCCESS })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn collect_files_skips_node_modules_and_hidden_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.js"), "let a = 1;").unwrap();
        fs::write(dir.path().join("notes.txt"), "not source").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/dep.js"), "a = 1;").unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache/gen.js"), "a = 1;").unwrap();

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.js"));
    }

    #[test]
    fn collect_files_scans_a_hidden_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(".staging");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("app.js"), "let a = 1;").unwrap();

        let files = collect_files(&root).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.js"));
    }

    #[test]
    fn lint_file_reports_violations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.js");
        fs::write(&path, "a = 2;\nlet b = {}; b = 3;\n").unwrap();

        let report = lint_file(&path, &RuleConfig::default()).unwrap();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].line, 1);
    }

    #[test]
    fn lint_file_skips_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.js");
        assert!(lint_file(&missing, &RuleConfig::default()).is_none());
    }
}
