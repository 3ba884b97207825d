//! Persisting transcripts, image responses and the image error log
//!
//! Everything lands in one output directory, created on first write. Write
//! failures are logged and reported as `None`; they never fail a flow.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Opens the prompt section of a transcript
pub const PROMPT_MARKER: &str = "--- PROMPT ---";

/// Separates prompt and model answer in a transcript
pub const RESPONSE_MARKER: &str = "--- MODEL RESPONSE ---";

/// Separates prompt and payload in an image response file
pub const IMAGE_RESPONSE_MARKER: &str = "--- RESPONSE ---";

/// Label used for image response files
pub const IMAGE_LABEL: &str = "Image_FreepikAI";

/// Error log for image generation, inside the output directory
pub const IMAGE_ERROR_LOG: &str = "image_errors.log";

/// Writes flow results under an output directory
#[derive(Debug, Clone)]
pub struct ReportSink {
    output_dir: PathBuf,
}

impl ReportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save a prompt and the model's answer as `{label}_{timestamp}.txt`
    pub fn save_transcript(&self, label: &str, prompt: &str, response: &str) -> Option<PathBuf> {
        let content = format!("{PROMPT_MARKER}\n{prompt}\n\n{RESPONSE_MARKER}\n{response}");
        self.save(label, &content)
    }

    /// Save an image prompt and the base64 payload Freepik returned
    pub fn save_image_response(&self, prompt: &str, base64: &str) -> Option<PathBuf> {
        let content =
            format!("{PROMPT_MARKER}\n{prompt}\n{IMAGE_RESPONSE_MARKER}\n\"base64\": \"{base64}\"");
        self.save(IMAGE_LABEL, &content)
    }

    /// Append `[timestamp] message` to the image error log
    pub fn append_error_log(&self, message: &str) -> Option<PathBuf> {
        let path = self.output_dir.join(IMAGE_ERROR_LOG);
        let result = fs::create_dir_all(&self.output_dir).and_then(|()| {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            writeln!(
                file,
                "[{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
                message
            )
        });

        match result {
            Ok(()) => Some(path),
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                None
            }
        }
    }

    /// `name` inside the output directory when such a file exists, else
    /// `name` as given
    pub fn resolve(&self, name: &str) -> PathBuf {
        let candidate = self.output_dir.join(name);
        if candidate.is_file() {
            candidate
        } else {
            PathBuf::from(name)
        }
    }

    fn save(&self, label: &str, content: &str) -> Option<PathBuf> {
        let stem = format!(
            "{}_{}",
            sanitize_label(label),
            Local::now().format("%Y%m%d_%H%M%S")
        );

        match self.write_unique(&stem, content) {
            Ok(path) => {
                info!("Saved {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!(
                    "Failed to save {} under {}: {}",
                    stem,
                    self.output_dir.display(),
                    e
                );
                None
            }
        }
    }

    /// Write `content` to `{stem}.txt`, or `{stem}_1.txt`, `{stem}_2.txt`, ...
    /// when taken
    fn write_unique(&self, stem: &str, content: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let mut attempt = 0u32;
        loop {
            let file_name = if attempt == 0 {
                format!("{stem}.txt")
            } else {
                format!("{stem}_{attempt}.txt")
            };
            let path = self.output_dir.join(file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Path separators would escape the output directory
fn sanitize_label(label: &str) -> String {
    label.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn file_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn test_save_transcript_format() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());

        let path = sink
            .save_transcript("Fundamental Analysis", "Compare MSFT", "MSFT looks strong")
            .unwrap();

        let name = file_name(&path);
        assert!(name.starts_with("Fundamental Analysis_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "--- PROMPT ---\nCompare MSFT\n\n--- MODEL RESPONSE ---\nMSFT looks strong"
        );
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("today");
        let sink = ReportSink::new(&nested);

        let path = sink.save_transcript("Macroeconomic Analysis", "p", "r").unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.is_file());
    }

    #[test]
    fn test_name_collision_gets_suffix() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());

        let first = sink.write_unique("Report_20240101_120000", "a").unwrap();
        let second = sink.write_unique("Report_20240101_120000", "b").unwrap();
        let third = sink.write_unique("Report_20240101_120000", "c").unwrap();

        assert_eq!(file_name(&first), "Report_20240101_120000.txt");
        assert_eq!(file_name(&second), "Report_20240101_120000_1.txt");
        assert_eq!(file_name(&third), "Report_20240101_120000_2.txt");
        assert_eq!(fs::read_to_string(first).unwrap(), "a");
    }

    #[test]
    fn test_label_separators_replaced() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());

        let path = sink
            .save_transcript("Sentiment Analysis AT/T", "p", "r")
            .unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert!(file_name(&path).starts_with("Sentiment Analysis AT_T_"));
    }

    #[test]
    fn test_write_failure_is_not_propagated() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();

        let sink = ReportSink::new(blocker.join("outputs"));
        assert_eq!(sink.save_transcript("Fundamental Analysis", "p", "r"), None);
    }

    #[test]
    fn test_image_response_format() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());

        let path = sink.save_image_response("a red fox", "Zm94").unwrap();
        assert!(file_name(&path).starts_with("Image_FreepikAI_"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "--- PROMPT ---\na red fox\n--- RESPONSE ---\n\"base64\": \"Zm94\""
        );
    }

    #[test]
    fn test_error_log_appends() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());

        sink.append_error_log("Error 500: boom").unwrap();
        let path = sink.append_error_log("Error 401: denied").unwrap();

        let log = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] Error 500: boom"));
        assert!(lines[1].ends_with("] Error 401: denied"));
    }

    #[test]
    fn test_resolve_prefers_output_dir() {
        let dir = TempDir::new().unwrap();
        let sink = ReportSink::new(dir.path());
        fs::write(dir.path().join("saved.txt"), "x").unwrap();

        assert_eq!(sink.resolve("saved.txt"), dir.path().join("saved.txt"));
        assert_eq!(sink.resolve("elsewhere.txt"), PathBuf::from("elsewhere.txt"));
    }
}
