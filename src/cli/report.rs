//! Report formatting and printing utilities.
//!
//! Diagnostics are displayed in cargo-style format. Separate from the
//! engine so the crate stays usable as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::files::{BatchResult, Diagnostic};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print batch diagnostics to stdout.
pub fn report(result: &BatchResult) {
    report_to(result, &mut io::stdout().lock());
}

/// Print batch diagnostics to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(result: &BatchResult, writer: &mut W) {
    let diagnostics: Vec<&Diagnostic> = result.diagnostics().collect();

    let max_line_width = diagnostics
        .iter()
        .map(|d| d.line.to_string().len())
        .max()
        .unwrap_or(1);

    for diagnostic in &diagnostics {
        print_diagnostic(diagnostic, writer, max_line_width);
    }

    for outcome in &result.outcomes {
        if let Some(failure) = &outcome.failure {
            let _ = writeln!(
                writer,
                "{}: {}  {}",
                "error".bold().red(),
                failure,
                "parse-error".dimmed().cyan()
            );
            let _ = writeln!(writer, "  {} {}", "-->".blue(), outcome.path);
            let _ = writeln!(writer);
        }
    }

    print_summary(result, writer);
}

/// Print a success message when every call site transformed cleanly.
pub fn print_success(files_checked: usize, files_replaced: usize) {
    print_success_to(files_checked, files_replaced, &mut io::stdout().lock());
}

pub fn print_success_to<W: Write>(files_checked: usize, files_replaced: usize, writer: &mut W) {
    let msg = format!(
        "Checked {} source {} - {} containing nameof calls",
        files_checked,
        if files_checked == 1 { "file" } else { "files" },
        files_replaced,
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

/// Print the transform-mode summary (dry-run or applied).
pub fn print_transform_summary(result: &BatchResult, apply: bool) {
    print_transform_summary_to(result, apply, &mut io::stdout().lock());
}

pub fn print_transform_summary_to<W: Write>(result: &BatchResult, apply: bool, writer: &mut W) {
    let count = result.files_replaced;
    let files = if count == 1 { "file" } else { "files" };
    let msg = if apply {
        format!("Rewrote {} {}", count, files)
    } else {
        format!("Would rewrite {} {} (pass --apply to write)", count, files)
    };
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

// ============================================================
// Internal Functions
// ============================================================

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W, max_line_width: usize) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        "error".bold().red(),
        diagnostic.message,
        diagnostic.kind.to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        diagnostic.path,
        diagnostic.line,
        diagnostic.col
    );

    if !diagnostic.source_line.is_empty() {
        let line_label = format!("{:>width$} |", diagnostic.line, width = max_line_width);
        let _ = writeln!(
            writer,
            "  {} {}",
            line_label.blue(),
            diagnostic.source_line
        );

        // caret aligned under the reported column, display-width aware
        let prefix: String = diagnostic
            .source_line
            .chars()
            .take(diagnostic.col.saturating_sub(1))
            .collect();
        let gutter = format!("{} |", " ".repeat(max_line_width));
        let _ = writeln!(
            writer,
            "  {} {}{}",
            gutter.blue(),
            " ".repeat(prefix.width()),
            "^".bold().red()
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(result: &BatchResult, writer: &mut W) {
    let errors = result.error_count();
    if errors > 0 {
        let msg = format!(
            "{} error{} found",
            errors,
            if errors == 1 { "" } else { "s" }
        );
        let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), msg.red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::files::FileOutcome;

    fn sample_result() -> BatchResult {
        BatchResult {
            outcomes: vec![FileOutcome {
                path: "src/a.ts".to_string(),
                replaced: false,
                diagnostics: vec![Diagnostic {
                    path: "src/a.ts".to_string(),
                    line: 3,
                    col: 13,
                    kind: ErrorKind::NestedNameof,
                    message: "Cannot nest `nameof` calls: `nameof(nameof(x))`.".to_string(),
                    source_line: "console.log(nameof(nameof(x)));".to_string(),
                }],
                failure: None,
            }],
            files_replaced: 0,
        }
    }

    #[test]
    fn test_report_contains_location_and_kind() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        report_to(&sample_result(), &mut buffer);
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("--> src/a.ts:3:13"));
        assert!(output.contains("nested-nameof"));
        assert!(output.contains("1 error found"));
    }

    #[test]
    fn test_caret_alignment() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        report_to(&sample_result(), &mut buffer);
        let output = String::from_utf8(buffer).unwrap();

        let caret_line = output
            .lines()
            .find(|line| line.trim_end().ends_with('^'))
            .unwrap();
        // col 13 → 12 characters of padding after the gutter
        assert_eq!(caret_line.find('^').unwrap(), "  1 | ".len() + 12);
    }
}
