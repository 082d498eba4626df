//! # SplitDoc - Split Stream Reader
//!
//! Owns a finalized schema buffer and a data buffer (fixed payload followed
//! by variable payload behind a single var-len header) and reconstructs the
//! canonical document byte sequence. Reconstruction is pure: the reader
//! never mutates its streams.
//!
//! The reconstruction routine mirrors the writer element by element. All
//! cursor arithmetic is checked against the three stream ends; a violation
//! means a corrupt stream or a codec bug and aborts.

use eyre::Result;

use crate::bson::types::ElementType;
use crate::buffer::BufBuilder;
use crate::config::{DATA_HEADER_SIZE, SCHEMA_HEADER_SIZE};
use crate::split::schema::SchemaElement;

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[derive(Debug)]
pub struct SplitDoc {
    schema: Vec<u8>,
    data: Vec<u8>,
}

impl SplitDoc {
    pub(crate) fn new(schema: Vec<u8>, data: Vec<u8>) -> Self {
        Self { schema, data }
    }

    /// The schema stream, headers and terminator included.
    pub fn schema(&self) -> &[u8] {
        &self.schema
    }

    /// The data buffer: var-len header, fixed payload, variable payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Total schema stream length as recorded in its header.
    pub fn schema_len(&self) -> usize {
        read_u32_le(&self.schema, 0) as usize
    }

    /// Fixed plus variable payload bytes (headers excluded).
    pub fn data_size(&self) -> usize {
        let fixed_len = read_u32_le(&self.schema, 4) as usize;
        let var_len = read_u32_le(&self.data, 0) as usize;
        fixed_len + var_len
    }

    /// Reconstructs the canonical document into `out`.
    pub fn to_document(&self, out: &mut BufBuilder) -> Result<()> {
        self.to_document_at(out, 0, 0, 0)
    }

    /// Reconstructs from the given stream offsets, for callers packing
    /// multiple split documents into shared buffers.
    pub fn to_document_at(
        &self,
        out: &mut BufBuilder,
        s_ofs: usize,
        f_ofs: usize,
        v_ofs: usize,
    ) -> Result<()> {
        assert!(
            s_ofs + SCHEMA_HEADER_SIZE <= self.schema.len(),
            "schema offset past end of stream"
        );
        let fixed_len = read_u32_le(&self.schema, s_ofs + 4) as usize;
        let var_base = f_ofs + DATA_HEADER_SIZE + fixed_len;
        assert!(var_base <= self.data.len(), "fixed region past end of data");

        reconstruct(
            &self.schema,
            s_ofs,
            &self.data[..var_base],
            f_ofs,
            &self.data[var_base..],
            v_ofs,
            out,
        )
    }

    /// Reconstructs into a fresh buffer and returns the canonical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = BufBuilder::new();
        self.to_document(&mut out)?;
        Ok(out.release())
    }
}

/// Mirrors the writer: walks schema entries, pulling value bytes from the
/// fixed cursor and string payloads from the variable cursor, and emits the
/// canonical document with its size header back-patched relative to `out`'s
/// position at entry.
///
/// `fixed` must start with the var-len header at `f_ofs`; `var` is the
/// variable stream region, within which end-offsets stored in the fixed
/// payload are absolute.
pub(crate) fn reconstruct(
    schema: &[u8],
    s_ofs: usize,
    fixed: &[u8],
    f_ofs: usize,
    var: &[u8],
    v_ofs: usize,
    out: &mut BufBuilder,
) -> Result<()> {
    let out_start = out.len();
    out.skip(4);

    assert!(
        s_ofs + SCHEMA_HEADER_SIZE <= schema.len(),
        "schema offset past end of stream"
    );
    let s_len = read_u32_le(schema, s_ofs) as usize;
    let s_end = s_ofs + s_len;
    assert!(s_end <= schema.len(), "schema length header exceeds stream");
    let mut s_pos = s_ofs + SCHEMA_HEADER_SIZE;

    assert!(
        f_ofs + DATA_HEADER_SIZE <= fixed.len(),
        "fixed offset past end of stream"
    );
    let f_len = read_u32_le(schema, s_ofs + 4) as usize;
    let mut f_pos = f_ofs + DATA_HEADER_SIZE;
    let f_end = f_pos + f_len;
    assert!(f_end <= fixed.len(), "fixed length header exceeds stream");

    let v_len = read_u32_le(fixed, f_ofs) as usize;
    let mut v_pos = v_ofs;
    let v_end = v_ofs + v_len;
    assert!(v_end <= var.len(), "variable length header exceeds stream");

    while s_pos < s_end && schema[s_pos] != 0 {
        let elem = SchemaElement::new(&schema[s_pos..s_end])?;
        let name = elem.field_name()?;
        let entry_len = elem.entry_len()?;
        let fixed_size = elem.fixed_size()?;

        out.append_byte(schema[s_pos]);
        out.append_bytes(name);
        out.append_byte(0);

        assert!(f_pos + fixed_size <= f_end, "fixed cursor past end of stream");
        if elem.raw_type() == ElementType::String as i8 {
            let end_offset = read_u32_le(fixed, f_pos) as usize;
            assert!(end_offset >= v_pos, "string end-offset not monotonic");
            let var_size = end_offset - v_pos;
            assert!(v_pos + var_size <= v_end, "variable cursor past end of stream");

            out.append_u32_le(var_size as u32);
            out.append_bytes(&var[v_pos..v_pos + var_size]);
            v_pos += var_size;
        } else {
            out.append_bytes(&fixed[f_pos..f_pos + fixed_size]);
        }
        f_pos += fixed_size;

        s_pos += entry_len;
        assert!(s_pos <= s_end, "schema cursor past end of stream");
    }

    out.append_byte(ElementType::Eoo as u8);
    out.write_u32_le_at(out_start, (out.len() - out_start) as u32);
    Ok(())
}
