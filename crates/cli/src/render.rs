//! Output-mode selection and source-annotated error rendering.
//!
//! Configuration files (vocabularies, emoji tables) that fail to parse are
//! shown with ariadne against the offending source text. Everything else is
//! either plain text or JSON depending on [`Format`].

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use serde::Serialize;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty for a TTY and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

/// Print `value` as pretty JSON to stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Config errors ───────────────────────────────────────────────────────

/// Byte offset of a 1-based `(line, column)` position, clamped to `source`.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Render a JSON syntax/shape error in `source` to stderr.
pub(crate) fn render_json_error(source: &str, filename: &str, err: &serde_json::Error) {
    let start = byte_offset(source, err.line(), err.column());
    let end = (start + 1).min(source.len()).max(start);
    let mut cache = (filename, Source::from(source));

    Report::build(ReportKind::Error, (filename, start..end))
        .with_message(format!("cannot load {filename}"))
        .with_config(Config::default().with_compact(false))
        .with_label(
            Label::new((filename, start..end))
                .with_message(err.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint(&mut cache)
        .ok();
}
