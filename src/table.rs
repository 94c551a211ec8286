//! Table lifecycle operations.
//!
//! - Creating a table with its key schema, secondary indexes and capacity
//! - Describing a table to follow its provisioning state
//! - Waiting, with a bounded number of checks, until a table is active
//! - Deleting a table

/// Create table operation.
pub mod create_table;

/// Delete table operation.
pub mod delete_table;

/// Describe table operation and table state.
pub mod describe_table;

/// Bounded polling until a table is active.
pub mod wait;
