#![warn(missing_docs)]

//! # Cloud CRUD
//!
//! Typed, thin wrappers over the CRUD operations of Amazon DynamoDB and Amazon S3, plus a
//! small HTTP `GET` probe.
//!
//! ## Overview
//!
//! The crate is layered:
//! - Operation structs ([`mod@table`], [`mod@read`], [`mod@write`], [`mod@object`]) turn
//!   structured arguments into one SDK request and return the SDK's own result. Expression
//!   strings and placeholders are built for you.
//! - [`Session`](session::Session) wraps those operations with one error policy: a request
//!   rejected by the service is logged and reported as `false` or `None`, anything else is
//!   an [`Error`].
//!
//! Numbers travel as decimal text from end to end, never through binary floating point.
//!
//! ## Quick Example
//!
//! ```no_run
//! use cloud_crud::{catalog, config::Config, session::Session, write};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::connect(Config {
//!     dynamodb_endpoint: Some("http://localhost:8000".to_string()),
//!     ..Default::default()
//! })
//! .await;
//!
//! session.create_table(catalog::create_table("Guitar")).await?;
//! session.wait_for_table_active("Guitar").await?;
//!
//! let treat = catalog::Product {
//!     pk: "dt1".to_string(),
//!     sk: "DogTreat".to_string(),
//!     brand: "Chewy Treats Inc.".to_string(),
//!     model: "Super Chewy - Plain".to_string(),
//!     description: "A super yummy, plain flavored treat!".to_string(),
//!     price: "0.99".parse()?,
//! };
//! let put_item = write::put_item::PutItem {
//!     item: treat.into(),
//!     write_args: write::common::WriteArgs {
//!         table_name: "Guitar".to_string(),
//!         ..Default::default()
//!     },
//! };
//! session.put_item(put_item).await?;
//!
//! let cheap = catalog::Lookup::PriceBetween("1".parse()?, "2".parse()?)
//!     .query("Guitar", "DogTreat", None);
//! for item in session.query(cheap).await?.unwrap_or_default() {
//!     println!("{item:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Values, keys, conditions and selections shared by item operations
//! - [`mod@table`] - Table lifecycle (CreateTable, DescribeTable, DeleteTable, activation wait)
//! - [`mod@read`] - Read operations (GetItem, Query, Scan)
//! - [`mod@write`] - Write operations (PutItem, DeleteItem)
//! - [`mod@object`] - Object storage operations
//! - [`mod@catalog`] - Product catalog table and its lookups
//! - [`mod@probe`] - HTTP `GET` probe
//! - [`mod@session`] - Client handle applying the error policy

/// Product catalog table: schema, record type and indexed lookups.
pub mod catalog;

/// Values, keys, conditions and projections.
pub mod common;

/// Session configuration.
pub mod config;

/// Crate error type.
pub mod error;

/// Object storage operations.
pub mod object;

/// Outbound HTTP probe.
pub mod probe;

/// Item reads.
pub mod read;

/// Client handle with the crate's error policy.
pub mod session;

/// Table lifecycle operations.
pub mod table;

/// Item writes.
pub mod write;

pub use error::{Error, Result};
