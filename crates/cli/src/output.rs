//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use pixcut_image::BatchSummary;
use std::path::Path;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte delta; growth is shown with a leading `+`.
pub fn format_savings(savings: i64) -> String {
    let size = format_size(savings.unsigned_abs());
    if savings < 0 {
        format!("+{size}")
    } else {
        size
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Lines of the human-readable batch summary, uncolored.
pub fn summary_lines(summary: &BatchSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Files", format_count(summary.total_files, "image", "images")),
        ("Original size", format_size(summary.original_size)),
        ("New size", format_size(summary.new_size)),
        (
            "Saved",
            format!(
                "{} ({:.1}%)",
                format_savings(summary.savings),
                summary.percentage
            ),
        ),
    ]
}

/// Print the batch summary to stdout.
pub fn print_summary(summary: &BatchSummary, output_dir: &Path) {
    Status::header("Summary");
    for (label, value) in summary_lines(summary) {
        let value = if label == "Saved" && summary.savings < 0 {
            value.yellow().to_string()
        } else if label == "Saved" {
            value.green().to_string()
        } else {
            value
        };
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }
    println!("  {:<14} {}", "Output:".dimmed(), output_dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(500), "500 B");
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size(2048), "2.00 KB");
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_savings_growth() {
        assert_eq!(format_savings(2048), "2.00 KB");
        assert_eq!(format_savings(-100), "+100 B");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(1, "image", "images"), "1 image");
        assert_eq!(format_count(5, "image", "images"), "5 images");
    }

    #[test]
    fn test_summary_lines() {
        let summary = BatchSummary {
            total_files: 2,
            original_size: 4096,
            new_size: 1024,
            savings: 3072,
            percentage: 75.0,
        };
        let lines = summary_lines(&summary);
        assert_eq!(lines[0], ("Files", "2 images".to_string()));
        assert_eq!(lines[3], ("Saved", "3.00 KB (75.0%)".to_string()));
    }
}
