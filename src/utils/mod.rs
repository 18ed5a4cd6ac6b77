use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

/// Parse a `YYYY-MM-DD` command line date
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// Normalize a channel handle to the `@name` form the Data API expects.
///
/// Returns `None` for input that cannot be a handle (empty or containing whitespace).
pub fn normalize_handle(handle: &str) -> Option<String> {
    let name = handle.trim().trim_start_matches('@');

    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return None;
    }

    Some(format!("@{}", name))
}

/// Trim, lowercase and dedupe language codes, keeping the caller's preference order
pub fn normalize_languages(languages: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(languages.len());

    for lang in languages {
        let code = lang.trim().to_lowercase();
        if !code.is_empty() && !normalized.contains(&code) {
            normalized.push(code);
        }
    }

    normalized
}

/// Sanitize filename for safe filesystem usage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect()
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Spinner for steps of unknown length
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(120));
    progress.set_message(message.to_string());
    progress
}

/// Progress bar for a known number of items
pub fn counter(len: u64, message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message(message.to_string());
    progress
}
