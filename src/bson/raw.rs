//! # RawDocument - Zero-Copy Document Access
//!
//! `RawDocument` wraps a byte slice holding one canonical document and
//! iterates its elements without copying. The slice handed to `new` may
//! extend past the document (streams of concatenated documents are the
//! common case); the view self-limits to the size header.
//!
//! Element iteration yields `Result<RawElement>`: a document carrying a type
//! outside the supported alphabet fails at the offending element, since the
//! format is self-describing and an unknown type's value cannot be sized.

use eyre::{ensure, eyre, Result};

use crate::bson::types::ElementType;

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    data: &'a [u8],
}

impl<'a> RawDocument<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        ensure!(data.len() >= 5, "document too short: {} bytes", data.len());
        let size = read_u32_le(data, 0) as usize;
        ensure!(size >= 5, "document size header too small: {}", size);
        ensure!(
            size <= data.len(),
            "document size header {} exceeds available {} bytes",
            size,
            data.len()
        );
        ensure!(data[size - 1] == 0, "document missing EOO terminator");
        Ok(Self {
            data: &data[..size],
        })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn iter(&self) -> RawElements<'a> {
        RawElements {
            data: self.data,
            pos: 4,
        }
    }

    /// Linear scan for the first element named `name`.
    pub fn get(&self, name: &str) -> Result<Option<RawElement<'a>>> {
        for elem in self.iter() {
            let elem = elem?;
            if elem.name() == name.as_bytes() {
                return Ok(Some(elem));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawElement<'a> {
    element_type: ElementType,
    raw_type: i8,
    name: &'a [u8],
    value: &'a [u8],
}

impl<'a> RawElement<'a> {
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The element's type byte as it appears on the wire.
    pub fn raw_type(&self) -> i8 {
        self.raw_type
    }

    /// Field name bytes, without the NUL terminator.
    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    /// Raw value bytes. For strings this includes the 4-byte length prefix
    /// and the trailing NUL.
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// String payload including its NUL terminator - the bytes the variable
    /// stream carries.
    pub fn string_bytes(&self) -> Result<&'a [u8]> {
        ensure!(
            self.element_type == ElementType::String,
            "field {} is not a string",
            String::from_utf8_lossy(self.name)
        );
        Ok(&self.value[4..])
    }

    /// String payload as UTF-8, without the terminator.
    pub fn as_str(&self) -> Result<&'a str> {
        let bytes = self.string_bytes()?;
        std::str::from_utf8(&bytes[..bytes.len() - 1]).map_err(|e| {
            eyre!(
                "invalid UTF-8 in string field {}: {}",
                String::from_utf8_lossy(self.name),
                e
            )
        })
    }
}

pub struct RawElements<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for RawElements<'a> {
    type Item = Result<RawElement<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + 1 >= self.data.len() || self.data[self.pos] == 0 {
            return None;
        }
        match parse_element(self.data, self.pos) {
            Ok((elem, next_pos)) => {
                self.pos = next_pos;
                Some(Ok(elem))
            }
            Err(e) => {
                self.pos = self.data.len();
                Some(Err(e))
            }
        }
    }
}

fn parse_element(data: &[u8], pos: usize) -> Result<(RawElement<'_>, usize)> {
    let raw_type = data[pos] as i8;

    let name_start = pos + 1;
    let name_end = data[name_start..]
        .iter()
        .position(|&b| b == 0)
        .map(|i| name_start + i)
        .ok_or_else(|| eyre!("unterminated field name at offset {}", pos))?;
    let name = &data[name_start..name_end];
    let value_start = name_end + 1;

    let element_type = ElementType::from_i8(raw_type).ok_or_else(|| {
        eyre!(
            "field {} has unsupported type {}",
            String::from_utf8_lossy(name),
            raw_type
        )
    })?;

    let value_size = match element_type {
        ElementType::String => {
            ensure!(
                value_start + 4 <= data.len(),
                "string length prefix for field {} out of bounds",
                String::from_utf8_lossy(name)
            );
            let strlen = read_u32_le(data, value_start) as usize;
            ensure!(
                strlen >= 1,
                "string length prefix for field {} must count the NUL terminator",
                String::from_utf8_lossy(name)
            );
            4 + strlen
        }
        t => t.fixed_size(),
    };

    let value_end = value_start + value_size;
    ensure!(
        value_end < data.len(),
        "field {} value runs past end of document",
        String::from_utf8_lossy(name)
    );
    if element_type == ElementType::String {
        ensure!(
            data[value_end - 1] == 0,
            "string field {} missing NUL terminator",
            String::from_utf8_lossy(name)
        );
    }

    let elem = RawElement {
        element_type,
        raw_type,
        name,
        value: &data[value_start..value_end],
    };
    Ok((elem, value_end))
}
