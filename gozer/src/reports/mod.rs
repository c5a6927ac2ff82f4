//! Report data structures for commands.
//!
//! Commands turn generator results into reports, then render them to an
//! [`Output`] target.

mod api;
mod check;
mod crud;
mod output;

pub use api::{ApiPreview, ApiSummary};
pub use check::CheckReport;
pub use crud::CrudSummary;
pub use output::{Output, Report, TerminalOutput};

use gozer_codegen::{Error, generation::WriteStats};
use miette::GraphicalReportHandler;

/// Render an error the way miette prints it, with source spans for spec errors.
pub(crate) fn render_error(err: &Error) -> String {
    let mut out = String::new();
    let handler = GraphicalReportHandler::new();
    let rendered = match err {
        Error::Spec(inner) => handler.render_report(&mut out, &**inner),
        other => handler.render_report(&mut out, other),
    };
    if rendered.is_err() {
        return err.to_string();
    }
    out
}

/// `3 written, 1 replaced, 2 kept`
pub(crate) fn file_counts(stats: &WriteStats) -> String {
    format!(
        "{} written, {} replaced, {} kept",
        stats.written.len(),
        stats.replaced.len(),
        stats.skipped.len()
    )
}
