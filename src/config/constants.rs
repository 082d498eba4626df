//! # Configuration Constants
//!
//! Tunables for the split codec, grouped by the stream they affect.
//!
//! ## Header Relationships
//!
//! ```text
//! SCHEMA_HEADER_SIZE (8 bytes)
//!       |
//!       +-> offset 0: u32 total_schema_len (whole stream, headers + EOO)
//!       +-> offset 4: u32 total_fixed_len  (fixed payload, DATA_HEADER_SIZE
//!                                           excluded)
//!
//! DATA_HEADER_SIZE (4 bytes)
//!       |
//!       +-> offset 0 of the fixed stream: u32 total_var_len (variable
//!           payload; the variable stream itself carries no header)
//! ```
//!
//! The writer reserves these headers up front and back-patches them at
//! finalization; the reader consumes them with the same payload semantics.
//! Changing either size breaks every persisted stream.

/// Initial capacity of the schema stream buffer.
pub const INIT_SCHEMA_CAPACITY: usize = 512;

/// Initial capacity of the fixed stream buffer.
pub const INIT_FIXED_CAPACITY: usize = 512;

/// Initial capacity of the variable stream buffer. Most documents in
/// fixed-heavy workloads carry no strings at all, so this starts empty.
pub const INIT_VAR_CAPACITY: usize = 0;

/// Bytes reserved at the front of the schema stream for the schema-length
/// and fixed-length fields.
pub const SCHEMA_HEADER_SIZE: usize = 8;

/// Bytes reserved at the front of the fixed stream for the variable-length
/// field.
pub const DATA_HEADER_SIZE: usize = 4;

/// Schema fingerprints the analyzer's recency cache holds when no explicit
/// capacity is supplied.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;
