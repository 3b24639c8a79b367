// file: src/utils/logging.rs
// description: Tracing subscriber initialization with optional ANSI coloring

use crate::pipeline::PipelineStats;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Multi-line run summary printed after extraction.
pub fn format_summary(stats: &PipelineStats) -> String {
    let mut lines = vec![format_success(&format!(
        "{} patches written from {} images in {:.2}s",
        stats.patches_written,
        stats.images_processed,
        stats.duration.as_secs_f64()
    ))];

    if stats.labeled_patches() > 0 {
        lines.push(format_info(&format!(
            "{} OK / {} KO ({:.1}% defective)",
            stats.ok_patches,
            stats.ko_patches,
            stats.defect_rate()
        )));
    }

    if stats.images_processed == 0 {
        lines.push(format_warning("no images were processed"));
    }

    lines.join("\n")
}
