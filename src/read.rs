//! Item reads: a single item by key, a key-condition query, a full scan.
//!
//! Query and scan follow every page before returning, so their outputs hold the whole
//! result set and the summed consumed capacity.

/// Arguments and request plumbing shared by the reads.
pub mod common;

/// GetItem.
pub mod get_item;

/// Query over the table or one of its indexes.
pub mod query;

/// Scan over the table or one of its indexes.
pub mod scan;
