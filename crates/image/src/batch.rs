//! Sequential batch processing with one-way progress notifications.
//!
//! A [`BatchJob`] owns its file list and settings. It is validated up front,
//! then run either on the calling thread ([`BatchJob::run`]) or on a dedicated
//! worker ([`BatchJob::spawn`]). Either way the caller learns what happens
//! only through [`BatchEvent`]s, delivered in order.

use crate::cut::CutPart;
use crate::encode::Encoder;
use crate::settings::Settings;
use crate::source::SourceImage;
use crate::transform::Transformer;
use crate::{ImageError, Result};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// Name of the default output folder created next to the first input.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "processed images";

/// Running byte totals for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Inputs fully processed
    pub files_processed: usize,
    /// Sum of input file sizes
    pub total_original_bytes: u64,
    /// Sum of output file sizes
    pub total_new_bytes: u64,
}

impl BatchResult {
    /// Fold one finished file into the totals.
    pub fn record(&mut self, original_bytes: u64, new_bytes: u64) {
        self.files_processed += 1;
        self.total_original_bytes += original_bytes;
        self.total_new_bytes += new_bytes;
    }

    /// Bytes saved; negative when outputs grew.
    pub fn savings(&self) -> i64 {
        self.total_original_bytes as i64 - self.total_new_bytes as i64
    }

    /// Savings as a percentage of the original size, 0 for empty input.
    pub fn percentage(&self) -> f64 {
        if self.total_original_bytes == 0 {
            0.0
        } else {
            self.savings() as f64 / self.total_original_bytes as f64 * 100.0
        }
    }

    /// Final summary handed to the caller.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_files: self.files_processed,
            original_size: self.total_original_bytes,
            new_size: self.total_new_bytes,
            savings: self.savings(),
            percentage: self.percentage(),
        }
    }
}

/// Terminal statistics of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Files processed
    pub total_files: usize,
    /// Input bytes
    pub original_size: u64,
    /// Output bytes
    pub new_size: u64,
    /// `original_size - new_size`
    pub savings: i64,
    /// Savings in percent of `original_size`
    pub percentage: f64,
}

/// Notifications emitted by a running batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// A file finished; overall completion in percent
    Progress(u8),
    /// Every file was processed
    Completed {
        /// Human-readable outcome
        message: String,
        /// Final statistics
        summary: BatchSummary,
    },
    /// The batch stopped on an error; no further events follow
    Failed(String),
}

/// Receiver of batch notifications.
pub trait BatchSink {
    /// Called once per event, in order.
    fn on_event(&self, event: BatchEvent);
}

impl BatchSink for mpsc::Sender<BatchEvent> {
    fn on_event(&self, event: BatchEvent) {
        // A caller that hung up no longer cares about progress.
        let _ = self.send(event);
    }
}

/// Lifecycle of a [`BatchJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Validated, not started
    Idle,
    /// Processing files
    Running,
    /// All files done
    Completed,
    /// Stopped on the first error
    Failed,
}

/// What processing one input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Input path
    pub input: PathBuf,
    /// Input size in bytes
    pub original_bytes: u64,
    /// Written files, one or two
    pub outputs: Vec<PathBuf>,
    /// Combined size of the written files
    pub new_bytes: u64,
}

/// A validated, ready-to-run batch.
#[derive(Debug)]
pub struct BatchJob {
    files: Vec<PathBuf>,
    output_dir: PathBuf,
    settings: Settings,
    transformer: Transformer,
    encoder: Encoder,
    state: BatchState,
}

impl BatchJob {
    /// Validate everything that can be checked without touching the inputs.
    pub fn new(files: Vec<PathBuf>, output_dir: impl Into<PathBuf>, settings: Settings) -> Result<Self> {
        if files.is_empty() {
            return Err(ImageError::config("no input files to process"));
        }

        let transformer = Transformer::new(&settings)?;
        let encoder = Encoder::from_settings(&settings);

        Ok(Self {
            files,
            output_dir: output_dir.into(),
            settings,
            transformer,
            encoder,
            state: BatchState::Idle,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Inputs in processing order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Process every file in order on the current thread.
    ///
    /// The first failing file aborts the batch: a single `Failed` event is
    /// emitted and the error returned. Files already written stay on disk.
    pub fn run(&mut self, sink: &dyn BatchSink) -> Result<BatchResult> {
        if self.state != BatchState::Idle {
            return Err(ImageError::config("batch has already been started"));
        }
        self.state = BatchState::Running;

        let total = self.files.len();
        tracing::info!(
            files = total,
            output_dir = %self.output_dir.display(),
            format = %self.encoder.format(),
            "starting batch"
        );

        let mut result = BatchResult::default();
        for (index, path) in self.files.iter().enumerate() {
            match self.process_file(path) {
                Ok(report) => {
                    result.record(report.original_bytes, report.new_bytes);
                    sink.on_event(BatchEvent::Progress(progress_percent(index + 1, total)));
                }
                Err(err) => {
                    let err = err.for_file(path);
                    tracing::error!(%err, "batch aborted");
                    self.state = BatchState::Failed;
                    sink.on_event(BatchEvent::Failed(format!("Error: {err}")));
                    return Err(err);
                }
            }
        }

        self.state = BatchState::Completed;
        let summary = result.summary();
        tracing::info!(
            files = summary.total_files,
            original = summary.original_size,
            new = summary.new_size,
            percentage = summary.percentage,
            "batch complete"
        );
        sink.on_event(BatchEvent::Completed {
            message: format!("Successfully processed {total} image(s)"),
            summary,
        });

        Ok(result)
    }

    /// Run the batch on a dedicated worker thread.
    pub fn spawn(mut self) -> BatchHandle {
        let (sender, events) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("pixcut-batch".into())
            .spawn(move || run_guarded(&sender, || self.run(&sender)));

        match worker {
            Ok(worker) => BatchHandle {
                events,
                worker: Some(worker),
            },
            Err(err) => {
                // Nothing ran; surface the failure through the same channel.
                let (sender, events) = mpsc::channel();
                let err = ImageError::Worker(format!("could not start thread: {err}"));
                sender.on_event(BatchEvent::Failed(format!("Error: {err}")));
                BatchHandle {
                    events,
                    worker: None,
                }
            }
        }
    }

    /// Decode, transform, encode and account for a single input.
    pub fn process_file(&self, path: &Path) -> Result<FileReport> {
        let original_bytes = std::fs::metadata(path)?.len();
        let source = SourceImage::open(path)?;
        tracing::debug!(
            path = %path.display(),
            width = source.width(),
            height = source.height(),
            original_bytes,
            "decoded"
        );

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut outputs = Vec::new();
        let mut new_bytes = 0;
        for image in self.transformer.transform(&source)? {
            let target = output_path(&self.output_dir, &stem, &self.settings, image.part);
            let report = self.encoder.write(&image, &target)?;
            new_bytes += report.bytes_written;
            outputs.push(report.path);
        }

        Ok(FileReport {
            input: path.to_path_buf(),
            original_bytes,
            outputs,
            new_bytes,
        })
    }
}

/// Caller's end of a batch running on a worker thread.
#[derive(Debug)]
pub struct BatchHandle {
    events: mpsc::Receiver<BatchEvent>,
    worker: Option<thread::JoinHandle<Result<BatchResult>>>,
}

impl BatchHandle {
    /// Events in emission order; the iterator ends when the worker finishes.
    pub fn events(&self) -> mpsc::Iter<'_, BatchEvent> {
        self.events.iter()
    }

    /// Wait for the worker and return its outcome.
    pub fn join(mut self) -> Result<BatchResult> {
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .unwrap_or_else(|payload| Err(ImageError::Worker(panic_message(payload.as_ref())))),
            None => Err(ImageError::Worker("thread never started".to_string())),
        }
    }
}

/// Run `batch`, turning a panic into a `Failed` event and a worker error.
fn run_guarded<F>(sink: &dyn BatchSink, batch: F) -> Result<BatchResult>
where
    F: FnOnce() -> Result<BatchResult>,
{
    panic::catch_unwind(AssertUnwindSafe(batch)).unwrap_or_else(|payload| {
        let err = ImageError::Worker(panic_message(payload.as_ref()));
        tracing::error!(%err, "batch worker panicked");
        sink.on_event(BatchEvent::Failed(format!("Error: {err}")));
        Err(err)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("panicked: {detail}")
}

/// Completion percentage after `done` of `total` files.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}

/// Where an output lands: `{dir}/{prefix}{stem}{suffix}[_part].{ext}`.
pub fn output_path(
    output_dir: &Path,
    stem: &str,
    settings: &Settings,
    part: Option<CutPart>,
) -> PathBuf {
    let tag = part.map(|p| p.file_tag()).unwrap_or_default();
    output_dir.join(format!(
        "{}{}{}{}.{}",
        settings.filename_prefix,
        stem,
        settings.filename_suffix,
        tag,
        settings.output_format.extension()
    ))
}

/// Default output folder: `processed images` beside the first input.
pub fn default_output_dir(first_input: &Path) -> PathBuf {
    first_input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUTPUT_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;

    #[test]
    fn test_percentage_zero_original() {
        let result = BatchResult::default();
        assert_eq!(result.percentage(), 0.0);
        assert_eq!(result.summary().percentage, 0.0);
    }

    #[test]
    fn test_percentage_and_savings() {
        let mut result = BatchResult::default();
        result.record(1_000, 250);
        result.record(3_000, 750);

        assert_eq!(result.files_processed, 2);
        assert_eq!(result.savings(), 3_000);
        assert!((result.percentage() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_savings() {
        let mut result = BatchResult::default();
        result.record(100, 150);
        assert_eq!(result.savings(), -50);
        assert!((result.percentage() + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[test]
    fn test_output_path_naming() {
        let settings = Settings {
            output_format: OutputFormat::Jpeg,
            filename_prefix: "web_".into(),
            filename_suffix: "_small".into(),
            ..Settings::default()
        };
        let dir = Path::new("/out");

        assert_eq!(
            output_path(dir, "cat", &settings, None),
            PathBuf::from("/out/web_cat_small.jpg")
        );
        assert_eq!(
            output_path(dir, "cat", &settings, Some(CutPart::Bottom)),
            PathBuf::from("/out/web_cat_small_bottom.jpg")
        );
        assert_eq!(
            output_path(dir, "cat", &Settings::default(), Some(CutPart::Left)),
            PathBuf::from("/out/cat_left.webp")
        );
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/photos/trip/a.jpg")),
            PathBuf::from("/photos/trip/processed images")
        );
    }

    #[test]
    fn test_empty_file_list_is_config_error() {
        let err = BatchJob::new(Vec::new(), "/out", Settings::default()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_failed_batch_reports_once() {
        let (sender, receiver) = mpsc::channel();

        let mut job = BatchJob::new(
            vec![PathBuf::from("/nonexistent/one.png"), PathBuf::from("/nonexistent/two.png")],
            "/nonexistent/out",
            Settings::default(),
        )
        .unwrap();
        assert_eq!(job.state(), BatchState::Idle);

        let err = job.run(&sender).unwrap_err();
        assert!(err.to_string().contains("one.png"));
        assert_eq!(job.state(), BatchState::Failed);

        drop(sender);
        let events: Vec<_> = receiver.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], BatchEvent::Failed(msg) if msg.contains("one.png")));
    }

    #[test]
    fn test_panic_becomes_failed_event() {
        let (sender, receiver) = mpsc::channel();
        let err = run_guarded(&sender, || panic!("decoder exploded")).unwrap_err();
        drop(sender);

        assert!(matches!(&err, ImageError::Worker(msg) if msg.contains("decoder exploded")));
        assert!(!err.is_config());
        let events: Vec<_> = receiver.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], BatchEvent::Failed(msg) if msg.contains("decoder exploded")));
    }

    #[test]
    fn test_join_reports_worker_panic() {
        let (_sender, events) = mpsc::channel();
        let handle = BatchHandle {
            events,
            worker: Some(thread::spawn(|| -> Result<BatchResult> {
                panic!("{}", String::from("lost the thread"))
            })),
        };
        let err = handle.join().unwrap_err();
        assert!(matches!(&err, ImageError::Worker(msg) if msg.contains("lost the thread")));
    }

    #[test]
    fn test_batch_cannot_run_twice() {
        let mut job = BatchJob::new(
            vec![PathBuf::from("/nonexistent/one.png")],
            "/nonexistent/out",
            Settings::default(),
        )
        .unwrap();
        let (sender, _receiver) = mpsc::channel();
        let _ = job.run(&sender);
        assert!(job.run(&sender).unwrap_err().is_config());
    }
}
