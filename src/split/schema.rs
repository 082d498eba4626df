//! # SchemaElement - Schema Entry View
//!
//! Zero-copy view over one schema-stream entry: a type byte, a varint-framed
//! field name, and (via the type) the element's size in the fixed stream.
//! The view borrows the remainder of the schema stream starting at its entry,
//! so name decoding is bounds-checked against the stream end for free.

use eyre::{bail, ensure, Result};

use crate::bson::types::ElementType;
use crate::encoding::varint::decode_varint;

#[derive(Debug, Clone, Copy)]
pub struct SchemaElement<'a> {
    data: &'a [u8],
}

impl<'a> SchemaElement<'a> {
    /// `data` must start at the entry's type byte and may extend to the end
    /// of the schema stream.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        ensure!(!data.is_empty(), "empty schema entry");
        Ok(Self { data })
    }

    /// The entry's type byte as it appears on the wire.
    pub fn raw_type(&self) -> i8 {
        self.data[0] as i8
    }

    pub fn is_terminator(&self) -> bool {
        self.data[0] == 0
    }

    /// Field name bytes. The terminator has an empty name.
    pub fn field_name(&self) -> Result<&'a [u8]> {
        if self.is_terminator() {
            return Ok(&[]);
        }
        let (len, varint_len) = decode_varint(&self.data[1..])?;
        let len = len as usize;
        let start = 1 + varint_len;
        ensure!(
            start + len <= self.data.len(),
            "field name runs past end of schema stream"
        );
        Ok(&self.data[start..start + len])
    }

    /// Total entry length: type byte, name-length varint, and name bytes.
    pub fn entry_len(&self) -> Result<usize> {
        if self.is_terminator() {
            return Ok(1);
        }
        let (len, varint_len) = decode_varint(&self.data[1..])?;
        let entry_len = 1 + varint_len + len as usize;
        ensure!(
            entry_len <= self.data.len(),
            "field name runs past end of schema stream"
        );
        Ok(entry_len)
    }

    /// Size of this entry's value in the fixed stream: the raw value width
    /// for fixed types, 4 (the end-offset) for strings. Fails for any type
    /// outside the supported alphabet.
    pub fn fixed_size(&self) -> Result<usize> {
        match ElementType::from_i8(self.raw_type()) {
            Some(t) => Ok(t.fixed_size()),
            None => {
                let name = self.field_name().unwrap_or(&[]);
                bail!(
                    "field {} has unsupported type {}",
                    String::from_utf8_lossy(name),
                    self.raw_type()
                )
            }
        }
    }
}
