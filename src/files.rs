//! File discovery and batch substitution.
//!
//! Files are processed independently and in parallel; each gets its own
//! transformation context and collecting error handler, so one bad file
//! (or one bad call site) never blocks the rest of the batch.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::{Pattern, glob};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{Config, TEST_FILE_PATTERNS};
use crate::diagnostics::{Collecting, ErrorKind, NameofError};
use crate::hosts::text::replace_in_text_with;
use crate::transform::TransformOptions;
use crate::utils::{line_col, source_line};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Collect the source files selected by the configuration, sorted for
/// deterministic processing order.
pub fn scan_files(base_dir: &str, config: &Config, verbose: bool) -> ScanResult {
    let mut files: Vec<String> = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = vec![
        Path::new(base_dir).join("node_modules"),
        Path::new(base_dir).join(".git"),
    ];
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in &config.ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(Path::new(base_dir).join(p));
        }
    }

    if config.ignore_test_files {
        for p in TEST_FILE_PATTERNS {
            if let Ok(pattern) = Pattern::new(p) {
                glob_patterns.push(pattern);
            }
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if config.includes.is_empty() {
        vec![Path::new(base_dir).to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in &config.includes {
            if is_glob_pattern(inc) {
                let full_pattern = Path::new(base_dir).join(inc);
                let pattern_str = full_pattern.to_string_lossy();
                match glob(&pattern_str) {
                    Ok(entries) => {
                        for entry in entries.flatten() {
                            if entry.is_dir() {
                                paths.push(entry);
                            }
                        }
                    }
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid glob pattern '{}': {}",
                                "warning:".bold().yellow(),
                                inc,
                                e
                            );
                        }
                    }
                }
            } else {
                let path = Path::new(base_dir).join(inc);
                if path.exists() {
                    paths.push(path);
                } else if verbose {
                    eprintln!(
                        "{} Include path does not exist: {}",
                        "warning:".bold().yellow(),
                        path.display()
                    );
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && has_extension(path, &config.extensions) {
                files.push(path_str.into_owned());
            }
        }
    }

    files.sort();
    files.dedup();

    ScanResult {
        files,
        skipped_count,
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// A printable diagnostic: an engine error located within a file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub path: String,
    pub line: usize,
    pub col: usize,
    pub kind: ErrorKind,
    pub message: String,
    pub source_line: String,
}

impl Diagnostic {
    fn from_error(path: &str, source: &str, error: &NameofError) -> Self {
        let (line, col) = line_col(source, error.span.start);
        Self {
            path: path.to_string(),
            line,
            col,
            kind: error.kind,
            message: error.message.clone(),
            source_line: source_line(source, error.span.start),
        }
    }
}

/// The outcome of processing one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: String,
    pub replaced: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the file could not be read or parsed at all.
    pub failure: Option<String>,
}

/// The outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<FileOutcome>,
    pub files_replaced: usize,
}

impl BatchResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.outcomes.iter().flat_map(|o| o.diagnostics.iter())
    }

    pub fn error_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| o.diagnostics.len() + usize::from(o.failure.is_some()))
            .sum()
    }
}

/// Substitute `nameof` calls across many files.
///
/// With `apply` false this is a dry run: files are analyzed but never
/// written. Files whose content did not change are never rewritten.
pub fn replace_in_files(
    files: &[String],
    options: &TransformOptions,
    apply: bool,
) -> Result<BatchResult> {
    let mut outcomes = files
        .par_iter()
        .map(|path| process_file(path, options, apply))
        .collect::<Result<Vec<_>>>()?;

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    let files_replaced = outcomes.iter().filter(|o| o.replaced).count();

    Ok(BatchResult {
        outcomes,
        files_replaced,
    })
}

fn process_file(path: &str, options: &TransformOptions, apply: bool) -> Result<FileOutcome> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            return Ok(FileOutcome {
                path: path.to_string(),
                replaced: false,
                diagnostics: Vec::new(),
                failure: Some(format!("cannot read file: {}", e)),
            });
        }
    };

    let mut handler = Collecting::new();
    let substitution = match replace_in_text_with(path, &source, options, &mut handler) {
        Ok(substitution) => substitution,
        Err(e) => {
            return Ok(FileOutcome {
                path: path.to_string(),
                replaced: false,
                diagnostics: Vec::new(),
                failure: Some(e.to_string()),
            });
        }
    };

    if apply
        && substitution.replaced
        && let Some(text) = &substitution.file_text
    {
        fs::write(path, text).with_context(|| format!("Failed to write {}", path))?;
    }

    let diagnostics = handler
        .errors
        .iter()
        .map(|error| Diagnostic::from_error(path, &source, error))
        .collect();

    Ok(FileOutcome {
        path: path.to_string(),
        replaced: substitution.replaced,
        diagnostics,
        failure: None,
    })
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_scan_selects_configured_extensions() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("app.tsx")).unwrap();
        File::create(dir_path.join("utils.ts")).unwrap();
        File::create(dir_path.join("style.css")).unwrap();

        let config = Config {
            includes: Vec::new(),
            ..Config::default()
        };
        let result = scan_files(dir_path.to_str().unwrap(), &config, false);

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("app.tsx")));
        assert!(result.files.iter().any(|f| f.ends_with("utils.ts")));
    }

    #[test]
    fn test_scan_ignores_node_modules() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let node_modules = dir_path.join("node_modules");
        fs::create_dir(&node_modules).unwrap();
        File::create(node_modules.join("lib.ts")).unwrap();
        File::create(dir_path.join("app.ts")).unwrap();

        let config = Config {
            includes: Vec::new(),
            ..Config::default()
        };
        let result = scan_files(dir_path.to_str().unwrap(), &config, false);

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("app.ts"));
    }

    #[test]
    fn test_scan_respects_ignore_globs() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let generated = dir_path.join("generated");
        fs::create_dir(&generated).unwrap();
        File::create(generated.join("types.ts")).unwrap();
        File::create(dir_path.join("app.ts")).unwrap();

        let config = Config {
            includes: Vec::new(),
            ignores: vec!["**/generated/**".to_string()],
            ..Config::default()
        };
        let result = scan_files(dir_path.to_str().unwrap(), &config, false);

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("app.ts"));
    }

    #[test]
    fn test_replace_in_files_dry_run_leaves_files_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        let original = "console.log(nameof(window));\n";
        fs::write(&path, original).unwrap();

        let files = vec![path.to_string_lossy().into_owned()];
        let result = replace_in_files(&files, &TransformOptions::default(), false).unwrap();

        assert_eq!(result.files_replaced, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_replace_in_files_apply_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "console.log(nameof(window));\n").unwrap();

        let files = vec![path.to_string_lossy().into_owned()];
        let result = replace_in_files(&files, &TransformOptions::default(), true).unwrap();

        assert_eq!(result.files_replaced, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "console.log(\"window\");\n"
        );
    }

    #[test]
    fn test_bad_call_site_is_reported_without_blocking_others() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(
            &path,
            "console.log(nameof());\nconsole.log(nameof(ok));\n",
        )
        .unwrap();

        let files = vec![path.to_string_lossy().into_owned()];
        let result = replace_in_files(&files, &TransformOptions::default(), true).unwrap();

        assert_eq!(result.error_count(), 1);
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("nameof()"));
        assert!(rewritten.contains("\"ok\""));
    }

    #[test]
    fn test_unparsable_file_is_a_soft_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "const = ;;; nameof(").unwrap();

        let files = vec![path.to_string_lossy().into_owned()];
        let result = replace_in_files(&files, &TransformOptions::default(), true).unwrap();

        assert_eq!(result.files_replaced, 0);
        assert!(result.outcomes[0].failure.is_some());
    }
}
