//! Item writes. Both are unconditional: a put replaces any item with the same key and a
//! delete of a missing key succeeds.

/// Arguments shared by the writes.
pub mod common;

/// DeleteItem.
pub mod delete_item;

/// PutItem.
pub mod put_item;
