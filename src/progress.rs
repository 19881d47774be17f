//! Download progress tracking.
//!
//! `ProgressReader` wraps any reader and advances an indicatif bar by the
//! number of bytes read, so a streamed HTTP body can report progress without
//! the loader knowing about terminals.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;

/// A reader wrapper that advances a progress bar as bytes are read.
pub struct ProgressReader<R: Read> {
    reader: R,
    bar: ProgressBar,
    bytes_read: u64,
}

impl<R: Read> ProgressReader<R> {
    /// Create a new ProgressReader wrapping the given reader.
    pub fn new(reader: R, bar: ProgressBar) -> Self {
        Self {
            reader,
            bar,
            bytes_read: 0,
        }
    }

    /// Total bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Finish the bar and return the underlying reader
    pub fn finish(self) -> R {
        self.bar.finish_and_clear();
        self.reader
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.bytes_read += n as u64;
        self.bar.inc(n as u64);
        Ok(n)
    }
}

/// Build a download bar; a spinner is used when the size is unknown.
pub fn download_bar(label: &str, total: Option<u64>) -> ProgressBar {
    let bar = match total {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} {bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.set_message(label.to_string());
    bar
}
