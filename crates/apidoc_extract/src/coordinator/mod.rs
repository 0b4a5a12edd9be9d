//! Extraction coordinator.
//!
//! ```text
//!  jobs ──► feeder ──► [bounded job queue] ──► worker × N ──► [bounded result queue] ──► BlockStream
//!                                                 │
//!                                                 └──► DiagnosticSink
//! ```
//!
//! Every job is one file and is handled by exactly one worker, so the
//! blocks of a file arrive in line order. Blocks of different files may
//! interleave. Both queues are bounded: a slow consumer stalls the
//! workers, and busy workers stall the feeder.
//!
//! Cancellation is checked between files. The feeder stops pulling jobs
//! and workers skip whatever is still queued; scans already running are
//! allowed to finish.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use apidoc_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use apidoc_lang::{BlockScanner, ExtractedBlock, FileScan, LanguageProfile, Registry, ScanConfig};
use apidoc_lexer_core::{Origin, SourceBuffer, SourceError};
use crossbeam::channel::{self, Receiver, Sender};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding::{decode_source, DecodeError, TextEncoding};

/// One file to extract blocks from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionJob {
    pub bytes: Vec<u8>,
    pub origin: Origin,
    /// Language id; inferred from the origin's extension when absent.
    pub language: Option<String>,
    /// Encoding label; byte-order mark or UTF-8 when absent.
    pub encoding: Option<String>,
}

impl ExtractionJob {
    pub fn new(origin: impl Into<Origin>, bytes: impl Into<Vec<u8>>) -> Self {
        ExtractionJob {
            bytes: bytes.into(),
            origin: origin.into(),
            language: None,
            encoding: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// Configuration for extraction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Number of worker threads (0 = auto-detect).
    pub workers: usize,
    /// Jobs buffered between the feeder and the workers.
    pub job_capacity: usize,
    /// Blocks buffered between the workers and the consumer.
    pub result_capacity: usize,
    pub scan: ScanConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            workers: 0, // auto-detect
            job_capacity: 64,
            result_capacity: 256,
            scan: ScanConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Create a config for single-threaded execution.
    pub fn single_threaded() -> Self {
        ExtractConfig {
            workers: 1,
            ..Default::default()
        }
    }

    /// Create a config with the given worker count.
    pub fn with_workers(workers: usize) -> Self {
        ExtractConfig {
            workers,
            ..Default::default()
        }
    }

    /// Get the effective number of workers.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers
        }
    }
}

/// Shared stop flag for a running extraction.
///
/// Clones observe the same flag. Cancelling is permanent.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Reasons a job was skipped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{origin}: no language profile for {}", describe_language(.language.as_deref()))]
    UnsupportedLanguage {
        origin: Origin,
        language: Option<String>,
    },

    #[error("{origin}: unknown text encoding `{label}`")]
    UnknownEncoding { origin: Origin, label: String },

    #[error("{origin}: input is not valid {encoding} at byte {offset}")]
    Decode {
        origin: Origin,
        encoding: TextEncoding,
        offset: usize,
    },
}

fn describe_language(language: Option<&str>) -> String {
    match language {
        Some(id) => format!("language `{id}`"),
        None => "the file extension".to_owned(),
    }
}

impl ExtractError {
    fn from_decode(origin: Origin, err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownLabel(label) => ExtractError::UnknownEncoding { origin, label },
            DecodeError::Malformed { encoding, offset } => ExtractError::Decode {
                origin,
                encoding,
                offset,
            },
        }
    }

    pub fn origin(&self) -> &Origin {
        match self {
            ExtractError::Source(err) => err.origin(),
            ExtractError::UnsupportedLanguage { origin, .. }
            | ExtractError::UnknownEncoding { origin, .. }
            | ExtractError::Decode { origin, .. } => origin,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractError::Source(_) | ExtractError::Decode { .. } => ErrorCode::E0001,
            ExtractError::UnsupportedLanguage { .. } => ErrorCode::E0003,
            ExtractError::UnknownEncoding { .. } => ErrorCode::E0004,
        }
    }

    /// Error diagnostic for the skipped job.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code());
        let diagnostic = match self {
            ExtractError::Source(SourceError::InvalidUtf8 {
                origin, position, ..
            }) => diagnostic
                .with_message("invalid UTF-8 sequence")
                .at(origin.clone(), *position),
            ExtractError::Source(SourceError::TooLarge { origin, len }) => diagnostic
                .with_message(format!("source is too large ({len} bytes)"))
                .in_file(origin.clone()),
            ExtractError::UnsupportedLanguage { origin, language } => diagnostic
                .with_message(format!(
                    "no language profile for {}",
                    describe_language(language.as_deref())
                ))
                .in_file(origin.clone()),
            ExtractError::UnknownEncoding { origin, label } => diagnostic
                .with_message(format!("unknown text encoding `{label}`"))
                .in_file(origin.clone()),
            ExtractError::Decode {
                origin,
                encoding,
                offset,
            } => diagnostic
                .with_message(format!("input is not valid {encoding}"))
                .in_file(origin.clone())
                .with_note(format!("at byte offset {offset}")),
        };
        diagnostic.with_note("the file was skipped")
    }
}

/// Counters of a finished stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Files scanned, including those that stopped at an unterminated block.
    pub files_scanned: usize,
    /// Files rejected with an error diagnostic.
    pub files_failed: usize,
    /// Queued files dropped after cancellation.
    pub files_skipped: usize,
    pub blocks_emitted: usize,
    pub warnings: usize,
}

#[derive(Debug, Default)]
struct StreamState {
    files_scanned: AtomicUsize,
    files_failed: AtomicUsize,
    files_skipped: AtomicUsize,
    blocks_emitted: AtomicUsize,
    warnings: AtomicUsize,
    /// Set when the consumer drops the stream early.
    abandoned: AtomicBool,
}

impl StreamState {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ExtractionStats {
        ExtractionStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            blocks_emitted: self.blocks_emitted.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
        }
    }
}

/// Extracts comment blocks from jobs, one file per task.
#[derive(Clone, Debug)]
pub struct Extractor {
    registry: Arc<Registry>,
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, ExtractConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: ExtractConfig) -> Self {
        Extractor { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Profile for a job: by id when given, else by the origin's extension.
    fn resolve_language(&self, job: &ExtractionJob) -> Result<&LanguageProfile, ExtractError> {
        let profile = match &job.language {
            Some(id) => self.registry.get(id),
            None => self.registry.for_path(job.origin.as_str()),
        };
        profile.ok_or_else(|| ExtractError::UnsupportedLanguage {
            origin: job.origin.clone(),
            language: job.language.clone(),
        })
    }

    /// Decode and scan a single job.
    ///
    /// Diagnostics are not emitted here; the error, or the scan's
    /// [`FileScan::diagnostic`], is left to the caller.
    #[tracing::instrument(level = "debug", skip_all, fields(origin = %job.origin))]
    pub fn extract_file(&self, job: ExtractionJob) -> Result<FileScan, ExtractError> {
        let profile = self.resolve_language(&job)?;
        let ExtractionJob {
            bytes,
            origin,
            encoding,
            ..
        } = job;

        let (encoding, text) = decode_source(bytes, encoding.as_deref())
            .map_err(|err| ExtractError::from_decode(origin.clone(), err))?;
        tracing::trace!(%encoding, language = profile.id, "decoded");

        let buffer = SourceBuffer::new(text, origin)?;
        Ok(BlockScanner::with_config(profile, self.config.scan).scan(&buffer))
    }

    /// Extract a batch of jobs, returning one outcome per job in input order.
    ///
    /// Runs on the rayon pool unless there is a single job or the config is
    /// single-threaded.
    #[tracing::instrument(level = "debug", skip_all, fields(jobs = jobs.len()))]
    pub fn extract_batch(&self, jobs: Vec<ExtractionJob>) -> Vec<Result<FileScan, ExtractError>> {
        if jobs.len() <= 1 || self.config.workers == 1 {
            jobs.into_iter().map(|job| self.extract_file(job)).collect()
        } else {
            jobs.into_par_iter()
                .map(|job| self.extract_file(job))
                .collect()
        }
    }

    /// Start extracting `jobs` on a worker pool and stream the blocks back.
    ///
    /// Errors and warnings go to `sink` as they happen. Dropping the
    /// returned stream stops scheduling new files; [`BlockStream::finish`]
    /// instead drains it and reports the run's counters.
    pub fn stream<I>(
        &self,
        jobs: I,
        sink: impl DiagnosticSink + 'static,
        cancel: CancellationToken,
    ) -> BlockStream
    where
        I: IntoIterator<Item = ExtractionJob>,
        I::IntoIter: Send + 'static,
    {
        let workers = self.config.effective_workers();
        let (job_tx, job_rx) = channel::bounded(self.config.job_capacity);
        let (block_tx, block_rx) = channel::bounded(self.config.result_capacity);
        let sink: Arc<dyn DiagnosticSink> = Arc::new(sink);
        let state = Arc::new(StreamState::default());
        tracing::debug!(workers, "starting extraction");

        let mut handles = Vec::with_capacity(workers + 1);
        for _ in 0..workers {
            let worker = Worker {
                extractor: self.clone(),
                jobs: job_rx.clone(),
                blocks: block_tx.clone(),
                sink: Arc::clone(&sink),
                cancel: cancel.clone(),
                state: Arc::clone(&state),
            };
            handles.push(thread::spawn(move || worker.run()));
        }
        drop(job_rx);
        drop(block_tx);

        let feeder_state = Arc::clone(&state);
        let jobs = jobs.into_iter();
        handles.push(thread::spawn(move || {
            feed(jobs, &job_tx, &cancel, &feeder_state);
        }));

        BlockStream {
            blocks: block_rx,
            handles,
            state,
        }
    }
}

fn feed(
    jobs: impl Iterator<Item = ExtractionJob>,
    queue: &Sender<ExtractionJob>,
    cancel: &CancellationToken,
    state: &StreamState,
) {
    let mut fed = 0usize;
    for job in jobs {
        if cancel.is_cancelled() || state.abandoned.load(Ordering::Acquire) {
            tracing::debug!(fed, "feeder stopped early");
            return;
        }
        if queue.send(job).is_err() {
            // every worker is gone
            return;
        }
        fed += 1;
    }
    tracing::debug!(fed, "all jobs queued");
}

struct Worker {
    extractor: Extractor,
    jobs: Receiver<ExtractionJob>,
    blocks: Sender<ExtractedBlock>,
    sink: Arc<dyn DiagnosticSink>,
    cancel: CancellationToken,
    state: Arc<StreamState>,
}

impl Worker {
    fn run(self) {
        for job in &self.jobs {
            if self.cancel.is_cancelled() || self.state.abandoned.load(Ordering::Acquire) {
                tracing::trace!(origin = %job.origin, "skipping queued job");
                StreamState::bump(&self.state.files_skipped);
                continue;
            }

            let scan = match self.extractor.extract_file(job) {
                Ok(scan) => scan,
                Err(err) => {
                    tracing::debug!(%err, "job failed");
                    StreamState::bump(&self.state.files_failed);
                    self.sink.emit(err.to_diagnostic());
                    continue;
                }
            };

            StreamState::bump(&self.state.files_scanned);
            if let Some(warning) = scan.diagnostic() {
                StreamState::bump(&self.state.warnings);
                self.sink.emit(warning);
            }
            for block in scan.blocks {
                if self.blocks.send(block).is_err() {
                    return;
                }
                StreamState::bump(&self.state.blocks_emitted);
            }
        }
    }
}

/// Blocks produced by a running extraction, in no particular order across
/// files.
///
/// Iteration ends once every job has been handled or skipped.
#[derive(Debug)]
pub struct BlockStream {
    blocks: Receiver<ExtractedBlock>,
    handles: Vec<JoinHandle<()>>,
    state: Arc<StreamState>,
}

impl BlockStream {
    /// Drain the remaining blocks, wait for the workers and return the
    /// run's counters.
    pub fn finish(mut self) -> ExtractionStats {
        while self.blocks.recv().is_ok() {}
        self.join();
        let stats = self.state.snapshot();
        tracing::debug!(?stats, "extraction finished");
        stats
    }

    fn join(&mut self) {
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::error!("extraction thread panicked");
            }
        }
    }
}

impl Iterator for BlockStream {
    type Item = ExtractedBlock;

    fn next(&mut self) -> Option<ExtractedBlock> {
        self.blocks.recv().ok()
    }
}

impl Drop for BlockStream {
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.state.abandoned.store(true, Ordering::Release);
        while self.blocks.recv().is_ok() {}
        self.join();
    }
}
