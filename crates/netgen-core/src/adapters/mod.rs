//! # Adapters Layer
//!
//! Concrete implementations of the driven ports:
//!
//! - `OsKeySource`, `SeededKeySource`: key entropy
//! - `FsArtifactWriter`: atomic filesystem publication
//! - `MemoryArtifactWriter`: in-memory sink for tests and dry runs

pub mod fs_writer;
pub mod key_source;
pub mod memory_writer;

pub use fs_writer::FsArtifactWriter;
pub use key_source::{OsKeySource, SeededKeySource};
pub use memory_writer::MemoryArtifactWriter;
