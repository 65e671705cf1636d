use std::io::Write;

use owo_colors::OwoColorize;

use sysrev_core::{BatchStats, DocumentReview};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One line per skipped input file (extraction failed).
pub fn print_skipped_file(
    w: &mut dyn Write,
    name: &str,
    error: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {} ({})", "SKIPPED:".red(), name, error)?;
    } else {
        writeln!(w, "SKIPPED: {} ({})", name, error)?;
    }
    Ok(())
}

/// Per-document completion line.
pub fn print_document_status(
    w: &mut dyn Write,
    index: usize,
    total: usize,
    name: &str,
    failed_leaves: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let idx = index + 1;
    if failed_leaves == 0 {
        if color.enabled() {
            writeln!(w, "[{}/{}] {} -> {}", idx, total, name, "OK".green())?;
        } else {
            writeln!(w, "[{}/{}] {} -> OK", idx, total, name)?;
        }
    } else if color.enabled() {
        writeln!(
            w,
            "[{}/{}] {} -> {}",
            idx,
            total,
            name,
            format!("{} section(s) failed", failed_leaves).yellow()
        )?;
    } else {
        writeln!(
            w,
            "[{}/{}] {} -> {} section(s) failed",
            idx, total, name, failed_leaves
        )?;
    }
    Ok(())
}

/// List every failed leaf across the batch, grouped by document.
pub fn print_failures(
    w: &mut dyn Write,
    reviews: &[DocumentReview],
    color: ColorMode,
) -> std::io::Result<()> {
    let any = reviews.iter().any(|r| !r.failures.is_empty());
    if !any {
        return Ok(());
    }

    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Failed sections:".yellow().bold())?;
    } else {
        writeln!(w, "Failed sections:")?;
    }
    for review in reviews {
        for failure in &review.failures {
            writeln!(w, "  {}: {} ({})", review.name, failure.path, failure.message)?;
        }
    }
    Ok(())
}

/// Final batch summary.
pub fn print_summary(
    w: &mut dyn Write,
    stats: &BatchStats,
    skipped_files: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    let line = format!(
        "{} document(s) reviewed ({} clean, {} failed sections, {} file(s) skipped)",
        stats.documents, stats.clean_documents, stats.failed_leaves, skipped_files
    );
    if color.enabled() {
        writeln!(w, "{}", line.bold())?;
    } else {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}
