//! Terminal output for listings and download progress

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::core::registry::{ServerEntry, ServerStatus};

/// One registry entry: bold name and path, green/red status.
pub fn format_server(entry: &ServerEntry) -> String {
    let status = match entry.status {
        ServerStatus::Online => entry.status.to_string().green().to_string(),
        ServerStatus::Offline => entry.status.to_string().red().to_string(),
    };
    format!(
        "name: {}, path: {}, status: {}",
        entry.name.bold(),
        entry.path.display().bold(),
        status
    )
}

pub fn format_property(key: &str, value: &str) -> String {
    format!("{}={}", key.bold(), value)
}

/// Byte progress bar for the server download; length is filled in once the
/// response headers arrive.
pub fn download_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("[{bar:50.yellow}] {percent}% {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}
