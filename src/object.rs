//! Object storage operations.
//!
//! - Bucket creation, listing and deletion
//! - Single-request puts and chunked multipart uploads
//! - Whole and streamed downloads
//! - Paged key listing and bucket sweeps
//! - Signed download URLs
//! - Server-side SQL queries over an object

/// Bucket operations.
pub mod bucket;

/// Get object operation and body helpers.
pub mod get_object;

/// Paged key listing.
pub mod list;

/// Signed download URLs.
pub mod presign;

/// Put and delete object operations.
pub mod put_object;

/// Select object content operation and its event stream.
pub mod select;

/// Chunked upload.
pub mod upload;
