//! Storage Module
//!
//! On-disk files of a database directory other than the indexes.
//!
//! ## Responsibilities
//! - Append serialized entities to per-kind record logs
//! - Read a record back given the offset the index recorded
//! - Persist the monotonic id counters
//!
//! ## Log File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Record 1                               │
//! │ ┌──────────────┬─────────────────────┐ │
//! │ │ Len: u32 LE  │ Payload (Len bytes) │ │
//! │ └──────────────┴─────────────────────┘ │
//! ├────────────────────────────────────────┤
//! │ Record 2 ...                           │
//! └────────────────────────────────────────┘
//! ```
//! Superseded and deleted records stay in place; nothing is compacted.

mod ids;
mod log;

pub use ids::{IdAllocator, FIRST_ID};
pub use log::{LogFile, MAX_RECORD_SIZE, RECORD_HEADER_SIZE};
