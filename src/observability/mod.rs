//! OpenTelemetry-based observability with file-based span export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! - Spans are written to `<data_dir>/eventmap-spans.jsonl`, one JSON object
//!   per line
//! - Files rotate at 10 MB with 3 backups
//! - Worker requests carry a trace context so worker spans join the handler
//!   span that issued them
//!
//! Trace level comes from `RUST_LOG` when set, otherwise from
//! `Config::trace_level` (default `"info"`).
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - `tracer`: Tracer provider with file export
//! - `span_formatter`: Span to JSON line serialization
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, span_file_path, SERVICE_NAME, SPAN_FILE};
