//! # BSON-Shape Document Layer
//!
//! Minimal support for the self-describing document format the codec
//! consumes and emits. A document is a 4-byte little-endian total size
//! (including the size field and the terminator), a sequence of elements,
//! and a single EOO byte:
//!
//! ```text
//! [u32 total_size][ [type:i8][cstring name][value] ... ][EOO]
//! ```
//!
//! Only the codec's type alphabet is handled: double, string, object-id,
//! bool, date, null, int32, timestamp, int64, decimal128. Any other element
//! type is a hard error.
//!
//! ## Module Structure
//!
//! - `types`: `ElementType` over the type-code byte
//! - `raw`: `RawDocument` zero-copy view and element iterator
//! - `builder`: `DocBuilder` for constructing canonical documents

pub mod builder;
pub mod raw;
pub mod types;


pub use builder::DocBuilder;
pub use raw::{RawDocument, RawElement};
pub use types::ElementType;
