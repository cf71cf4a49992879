// ABOUTME: Interactive client session: spawn, prompt handshake, and error scan.
// ABOUTME: The transcript records client output for prompt detection and error counting.

mod driver;
mod error;
mod mirror;
pub mod scan;
mod transcript;

pub use driver::{Driver, SessionReport};
pub use error::{Error, Result};
pub use mirror::Mirror;
pub use scan::count_errors;
pub use transcript::{Transcript, TranscriptReader, WaitError, WriterGuard};
