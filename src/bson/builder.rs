//! # DocBuilder - Document Construction
//!
//! `DocBuilder` assembles a canonical document: the 4-byte size header is
//! reserved up front and back-patched by `finish`, elements are appended in
//! call order, and `finish` appends the EOO terminator.
//!
//! ## Usage
//!
//! ```ignore
//! let mut doc = DocBuilder::new();
//! doc.append_int32("a", 1);
//! doc.append_string("s", "hi");
//! let bytes = doc.finish();
//! ```

use crate::bson::types::ElementType;
use crate::buffer::BufBuilder;

#[derive(Debug)]
pub struct DocBuilder {
    buf: BufBuilder,
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocBuilder {
    pub fn new() -> Self {
        let mut buf = BufBuilder::new();
        buf.skip(4);
        Self { buf }
    }

    fn append_header(&mut self, element_type: ElementType, name: &str) {
        self.buf.append_byte(element_type as u8);
        self.buf.append_bytes(name.as_bytes());
        self.buf.append_byte(0);
    }

    pub fn append_double(&mut self, name: &str, value: f64) {
        self.append_header(ElementType::Double, name);
        self.buf.append_bytes(&value.to_le_bytes());
    }

    /// Appends a string element. The length prefix counts the payload bytes
    /// including the NUL terminator.
    pub fn append_string(&mut self, name: &str, value: &str) {
        self.append_header(ElementType::String, name);
        self.buf.append_u32_le(value.len() as u32 + 1);
        self.buf.append_bytes(value.as_bytes());
        self.buf.append_byte(0);
    }

    pub fn append_object_id(&mut self, name: &str, oid: &[u8; 12]) {
        self.append_header(ElementType::ObjectId, name);
        self.buf.append_bytes(oid);
    }

    pub fn append_bool(&mut self, name: &str, value: bool) {
        self.append_header(ElementType::Bool, name);
        self.buf.append_byte(if value { 1 } else { 0 });
    }

    /// Appends a date element (milliseconds since the epoch).
    pub fn append_date(&mut self, name: &str, millis: i64) {
        self.append_header(ElementType::Date, name);
        self.buf.append_bytes(&millis.to_le_bytes());
    }

    pub fn append_null(&mut self, name: &str) {
        self.append_header(ElementType::Null, name);
    }

    pub fn append_int32(&mut self, name: &str, value: i32) {
        self.append_header(ElementType::Int32, name);
        self.buf.append_bytes(&value.to_le_bytes());
    }

    pub fn append_timestamp(&mut self, name: &str, value: u64) {
        self.append_header(ElementType::Timestamp, name);
        self.buf.append_bytes(&value.to_le_bytes());
    }

    pub fn append_int64(&mut self, name: &str, value: i64) {
        self.append_header(ElementType::Int64, name);
        self.buf.append_bytes(&value.to_le_bytes());
    }

    pub fn append_decimal128(&mut self, name: &str, value: &[u8; 16]) {
        self.append_header(ElementType::Decimal128, name);
        self.buf.append_bytes(value);
    }

    /// Terminates the document and returns its canonical bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.append_byte(ElementType::Eoo as u8);
        let len = self.buf.len() as u32;
        self.buf.write_u32_le_at(0, len);
        self.buf.release()
    }
}
