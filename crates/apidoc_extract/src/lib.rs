//! Parallel extraction of documentation comment blocks.
//!
//! An [`Extractor`] takes [`ExtractionJob`]s (raw bytes plus an origin and
//! optional language and encoding hints), decodes them, picks a language
//! profile and scans each one with `apidoc_lang`'s block scanner.
//!
//! Two modes are offered:
//!
//! - [`Extractor::stream`]: jobs fan out to a fixed pool of worker threads
//!   and blocks come back through a bounded channel as a [`BlockStream`]
//! - [`Extractor::extract_batch`]: scans a batch with rayon and returns one
//!   outcome per job, in input order
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=apidoc_extract=debug`: scheduling, skipped jobs and stream
//!   completion, via [`init_tracing`].
//! - `RUST_LOG=apidoc_lang=trace`: per-block decisions of the scanner.

mod coordinator;
mod encoding;

use std::sync::Once;

pub use coordinator::{
    BlockStream, CancellationToken, ExtractConfig, ExtractError, ExtractionJob, ExtractionStats,
    Extractor,
};
pub use encoding::{decode_source, DecodeError, TextEncoding};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
