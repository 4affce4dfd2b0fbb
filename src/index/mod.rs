//! Index Module
//!
//! Positional indexes mapping entity ids to byte offsets in the record logs.
//!
//! ## Responsibilities
//! - Order-preserving B-tree with eager split / eager refill rebalancing
//! - Level-order text serialization of a whole tree
//! - One tree per entity kind, persisted to its own file on flush
//!
//! ## File Format (level-order, text)
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │ t|                                             │
//! ├────────────────────────────────────────────────┤
//! │ Root record                                    │
//! │   isLeaf|keyCount|(key:value|)*childCount|     │
//! ├────────────────────────────────────────────────┤
//! │ Level 1 records, left to right                 │
//! │ ... each following level ...                   │
//! └────────────────────────────────────────────────┘
//! ```

mod btree;
mod manager;

pub use btree::{BTreeIndex, Entry};
pub use manager::IndexManager;
