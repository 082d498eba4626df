//! # SplitBuilder - Split Stream Writer
//!
//! Consumes a document's elements in order and routes their bytes to the
//! schema, fixed, and variable streams. Finalization back-patches the three
//! length headers and is idempotent; afterwards the builder is observe-only
//! (`hash`, `schema`, `to_document`) until `release` transfers the streams
//! into an owning [`SplitDoc`](crate::split::SplitDoc).

use eyre::Result;
use log::debug;

use crate::bson::raw::RawDocument;
use crate::bson::types::ElementType;
use crate::buffer::BufBuilder;
use crate::config::{
    DATA_HEADER_SIZE, INIT_FIXED_CAPACITY, INIT_SCHEMA_CAPACITY, INIT_VAR_CAPACITY,
    SCHEMA_HEADER_SIZE,
};
use crate::encoding::murmur::murmur3_x86_32;
use crate::encoding::varint::{encode_varint, MAX_VARINT_LEN};
use crate::split::doc::{reconstruct, SplitDoc};

#[derive(Debug)]
pub struct SplitBuilder {
    schema: BufBuilder,
    fixed: BufBuilder,
    var: BufBuilder,
    finalized: bool,
}

impl Default for SplitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SplitBuilder {
    pub fn new() -> Self {
        Self::with_capacities(INIT_SCHEMA_CAPACITY, INIT_FIXED_CAPACITY, INIT_VAR_CAPACITY)
    }

    pub fn with_capacities(
        schema_capacity: usize,
        fixed_capacity: usize,
        var_capacity: usize,
    ) -> Self {
        let mut schema = BufBuilder::with_capacity(schema_capacity);
        let mut fixed = BufBuilder::with_capacity(fixed_capacity);
        let var = BufBuilder::with_capacity(var_capacity);

        // Reserve the schema-len, fixed-len and var-len header slots; done()
        // back-patches them.
        schema.skip(SCHEMA_HEADER_SIZE);
        fixed.skip(DATA_HEADER_SIZE);

        Self {
            schema,
            fixed,
            var,
            finalized: false,
        }
    }

    fn append_field_name(&mut self, name: &[u8]) {
        let mut varint = [0u8; MAX_VARINT_LEN];
        let n = encode_varint(name.len() as u64, &mut varint);
        self.schema.append_bytes(&varint[..n]);
        self.schema.append_bytes(name);
    }

    /// Routes every element of `doc` into the three streams, then finalizes.
    /// Fails on the first element whose type is outside the supported
    /// alphabet, leaving the builder unfinalized.
    pub fn append_elements(&mut self, doc: &RawDocument) -> Result<()> {
        assert!(!self.finalized, "append_elements after finalization");

        for elem in doc.iter() {
            let elem = elem?;
            let element_type = elem.element_type();
            if element_type == ElementType::Eoo {
                break;
            }

            self.schema.append_byte(elem.raw_type() as u8);
            self.append_field_name(elem.name());
            if element_type.is_variable() {
                self.var.append_bytes(elem.string_bytes()?);
                self.fixed.append_u32_le(self.var.len() as u32);
            } else {
                self.fixed.append_bytes(elem.value());
            }
        }
        self.done();

        debug!(
            "{} BSON bytes => {} schema + {} fixed + {} variable length bytes",
            doc.as_bytes().len(),
            self.schema.len(),
            self.fixed.len(),
            self.var.len()
        );
        Ok(())
    }

    /// Appends the EOO terminator and back-patches the three length headers.
    /// Idempotent; called by `append_elements`.
    pub(crate) fn done(&mut self) {
        if self.finalized {
            return;
        }
        self.schema.append_byte(ElementType::Eoo as u8);
        self.schema.write_u32_le_at(0, self.schema.len() as u32);
        self.schema
            .write_u32_le_at(4, (self.fixed.len() - DATA_HEADER_SIZE) as u32);
        self.fixed.write_u32_le_at(0, self.var.len() as u32);
        self.finalized = true;
    }

    /// MurmurHash3 x86-32 (seed 0) over the finalized schema stream, headers
    /// and terminator included. A stable fingerprint of structure - type
    /// codes and field-name spellings in order - independent of values.
    pub fn hash(&self) -> u32 {
        assert!(self.finalized, "hash before finalization");
        murmur3_x86_32(self.schema.buf(), 0)
    }

    /// The finalized schema stream.
    pub fn schema(&self) -> &[u8] {
        assert!(self.finalized, "schema before finalization");
        self.schema.buf()
    }

    /// Fixed plus variable payload bytes (headers excluded).
    pub fn data_size(&self) -> usize {
        self.fixed.len() - DATA_HEADER_SIZE + self.var.len()
    }

    /// Reconstructs the canonical document into `out` without releasing the
    /// streams.
    pub fn to_document(&self, out: &mut BufBuilder) -> Result<()> {
        assert!(self.finalized, "to_document before finalization");
        reconstruct(
            self.schema.buf(),
            0,
            self.fixed.buf(),
            0,
            self.var.buf(),
            0,
            out,
        )
    }

    /// Concatenates the variable stream onto the fixed stream and transfers
    /// ownership of both buffers into a [`SplitDoc`]. Finalizes first if the
    /// input ended without an explicit terminator.
    pub fn release(mut self) -> SplitDoc {
        self.done();
        let var = self.var.release();
        self.fixed.append_bytes(&var);
        SplitDoc::new(self.schema.release(), self.fixed.release())
    }
}
