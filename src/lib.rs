//! # splitbson - Columnar Split Codec for BSON-Shape Documents
//!
//! splitbson decomposes each BSON-shape document into three independent byte
//! streams and reconstructs the original document byte-for-byte from them:
//!
//! - **Schema stream**: type codes and field names, in order - the document's
//!   structure, with no values.
//! - **Fixed stream**: fixed-width values, plus a 4-byte end-offset standing in
//!   for each variable-width string.
//! - **Variable stream**: the concatenated string payloads (each including its
//!   NUL terminator).
//!
//! Documents sharing a structure produce identical schema streams, so a
//! document set's structural redundancy can be measured by fingerprinting the
//! schema stream alone. The [`analyzer`] module does exactly that: it drives
//! the codec over streams of concatenated documents and reports distinct
//! schemas, repetition runs, and recency-cache hit rates.
//!
//! ## Stream Layout
//!
//! ```text
//! schema buffer:
//!   [u32 total_schema_len][u32 total_fixed_len][entries...][EOO]
//!   entry: [type:i8][namelen varint][name bytes]
//!
//! data buffer:
//!   [u32 total_var_len][fixed payload...][variable payload...]
//! ```
//!
//! All integers are little-endian. `total_fixed_len` and `total_var_len` count
//! payload bytes only (headers excluded); `total_schema_len` counts the whole
//! schema stream including its 8 header bytes and the EOO terminator.
//!
//! ## Quick Start
//!
//! ```ignore
//! use splitbson::bson::{DocBuilder, RawDocument};
//! use splitbson::SplitBuilder;
//!
//! let mut doc = DocBuilder::new();
//! doc.append_int32("a", 1);
//! doc.append_string("s", "hi");
//! let bytes = doc.finish();
//!
//! let mut builder = SplitBuilder::new();
//! builder.append_elements(&RawDocument::new(&bytes)?)?;
//! let fingerprint = builder.hash();
//! let split = builder.release();
//! assert_eq!(split.to_bytes()?, bytes);
//! ```
//!
//! ## Module Overview
//!
//! - [`bson`]: minimal BSON-shape document layer (zero-copy reads, builder)
//! - [`buffer`]: growable byte buffer backing every stream
//! - [`encoding`]: varint field-name framing and the MurmurHash3 fingerprint
//! - [`split`]: the split codec (writer, reader, schema-entry view)
//! - [`analyzer`]: schema-deduplication analysis over document streams

pub mod analyzer;
pub mod bson;
pub mod buffer;
pub mod config;
pub mod encoding;
pub mod split;

pub use analyzer::{Analyzer, FileReport};
pub use buffer::BufBuilder;
pub use split::{SchemaElement, SplitBuilder, SplitDoc};
