//! Tests for the split codec

use super::*;
use crate::bson::{DocBuilder, RawDocument};
use crate::buffer::BufBuilder;

fn split(bytes: &[u8]) -> SplitBuilder {
    let doc = RawDocument::new(bytes).unwrap();
    let mut builder = SplitBuilder::new();
    builder.append_elements(&doc).unwrap();
    builder
}

fn roundtrip(bytes: &[u8]) {
    let doc = split(bytes).release();
    assert_eq!(doc.to_bytes().unwrap(), bytes);
}

#[test]
fn empty_document_streams() {
    let bytes = DocBuilder::new().finish();
    let builder = split(&bytes);

    assert_eq!(builder.schema(), &[0x09, 0, 0, 0, 0, 0, 0, 0, 0x00]);

    let doc = builder.release();
    assert_eq!(doc.data(), &[0, 0, 0, 0]);
    assert_eq!(doc.to_bytes().unwrap(), vec![0x05, 0, 0, 0, 0x00]);
}

#[test]
fn single_int32_streams() {
    let mut input = DocBuilder::new();
    input.append_int32("a", 1);
    let bytes = input.finish();

    let builder = split(&bytes);
    assert_eq!(
        builder.schema(),
        &[0x0C, 0, 0, 0, 0x04, 0, 0, 0, 0x10, 0x01, b'a', 0x00]
    );

    let doc = builder.release();
    assert_eq!(doc.data(), &[0, 0, 0, 0, 0x01, 0, 0, 0]);
    assert_eq!(doc.to_bytes().unwrap(), bytes);
}

#[test]
fn two_strings_share_variable_stream() {
    let mut input = DocBuilder::new();
    input.append_string("x", "ab");
    input.append_string("y", "cd");
    let bytes = input.finish();

    let doc = split(&bytes).release();
    assert_eq!(
        doc.data(),
        &[
            0x06, 0, 0, 0, // var payload length
            0x03, 0, 0, 0, // end-offset after "ab\0"
            0x06, 0, 0, 0, // end-offset after "cd\0"
            b'a', b'b', 0, b'c', b'd', 0,
        ]
    );
    assert_eq!(doc.to_bytes().unwrap(), bytes);
}

#[test]
fn zero_length_string_stores_lone_nul() {
    let mut input = DocBuilder::new();
    input.append_string("k", "");
    let bytes = input.finish();

    let doc = split(&bytes).release();
    assert_eq!(doc.data(), &[0x01, 0, 0, 0, 0x01, 0, 0, 0, 0x00]);
    assert_eq!(doc.to_bytes().unwrap(), bytes);
}

#[test]
fn mixed_fixed_and_string_fields() {
    let mut input = DocBuilder::new();
    input.append_double("n", 2.5);
    input.append_string("s", "hi");
    let bytes = input.finish();

    let doc = split(&bytes).release();
    let mut expected_fixed = Vec::new();
    expected_fixed.extend_from_slice(&3u32.to_le_bytes()); // var payload length
    expected_fixed.extend_from_slice(&2.5f64.to_le_bytes());
    expected_fixed.extend_from_slice(&3u32.to_le_bytes()); // end-offset of "hi\0"
    expected_fixed.extend_from_slice(b"hi\0");
    assert_eq!(doc.data(), &expected_fixed[..]);
    assert_eq!(doc.to_bytes().unwrap(), bytes);
}

#[test]
fn long_field_name_roundtrips() {
    let name = "x".repeat(200);
    let mut input = DocBuilder::new();
    input.append_int32(&name, 7);
    let bytes = input.finish();

    let builder = split(&bytes);
    // Name length 200 takes two varint bytes.
    assert_eq!(&builder.schema()[9..11], &[0xC8, 0x01]);

    assert_eq!(builder.release().to_bytes().unwrap(), bytes);
}

#[test]
fn every_supported_type_roundtrips() {
    let mut input = DocBuilder::new();
    input.append_double("d", -0.125);
    input.append_string("s", "value");
    input.append_object_id("o", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    input.append_bool("b", false);
    input.append_date("when", 1_500_000_000_000);
    input.append_null("z");
    input.append_int32("i", -42);
    input.append_timestamp("ts", (7 << 32) | 3);
    input.append_int64("l", i64::MIN);
    input.append_decimal128("dec", &[0xFF; 16]);
    roundtrip(&input.finish());
}

#[test]
fn size_headers_after_finalization() {
    let mut input = DocBuilder::new();
    input.append_int32("a", 1);
    input.append_string("s", "hi");
    let bytes = input.finish();

    let builder = split(&bytes);
    let schema = builder.schema();

    let schema_len = u32::from_le_bytes(schema[0..4].try_into().unwrap()) as usize;
    let fixed_len = u32::from_le_bytes(schema[4..8].try_into().unwrap()) as usize;
    assert_eq!(schema_len, schema.len());
    assert_eq!(fixed_len, 4 + 4); // int32 value + string end-offset
    assert_eq!(builder.data_size(), fixed_len + 3);

    let doc = builder.release();
    let var_len = u32::from_le_bytes(doc.data()[0..4].try_into().unwrap()) as usize;
    assert_eq!(var_len, 3); // "hi\0"
    assert_eq!(doc.schema_len(), schema_len);
    assert_eq!(doc.data_size(), fixed_len + var_len);
}

#[test]
fn schema_entries_match_input_fields() {
    let mut input = DocBuilder::new();
    input.append_int32("first", 1);
    input.append_string("second", "x");
    input.append_null("third");
    let bytes = input.finish();

    let builder = split(&bytes);
    let schema = builder.schema();

    let mut entries = Vec::new();
    let mut pos = 8;
    loop {
        let elem = SchemaElement::new(&schema[pos..]).unwrap();
        if elem.is_terminator() {
            break;
        }
        entries.push((elem.raw_type(), elem.field_name().unwrap().to_vec()));
        pos += elem.entry_len().unwrap();
    }

    assert_eq!(
        entries,
        vec![
            (0x10, b"first".to_vec()),
            (0x02, b"second".to_vec()),
            (0x0A, b"third".to_vec()),
        ]
    );
}

#[test]
fn hash_ignores_values() {
    let mut a = DocBuilder::new();
    a.append_int32("n", 1);
    a.append_string("s", "aaa");

    let mut b = DocBuilder::new();
    b.append_int32("n", 99999);
    b.append_string("s", "completely different");

    let (a, b) = (a.finish(), b.finish());
    assert_eq!(split(&a).hash(), split(&b).hash());
    assert_eq!(split(&a).schema(), split(&b).schema());
}

#[test]
fn hash_reflects_structure() {
    let mut a = DocBuilder::new();
    a.append_int32("n", 1);
    let a = split(&a.finish());

    // Different field name.
    let mut b = DocBuilder::new();
    b.append_int32("m", 1);
    let b = split(&b.finish());

    // Different type, same name.
    let mut c = DocBuilder::new();
    c.append_int64("n", 1);
    let c = split(&c.finish());

    assert_ne!(a.schema(), b.schema());
    assert_ne!(a.schema(), c.schema());
    assert_ne!(a.hash(), b.hash());
    assert_ne!(a.hash(), c.hash());
}

#[test]
fn field_order_changes_schema() {
    let mut a = DocBuilder::new();
    a.append_int32("x", 1);
    a.append_int32("y", 2);

    let mut b = DocBuilder::new();
    b.append_int32("y", 2);
    b.append_int32("x", 1);

    let (a, b) = (split(&a.finish()), split(&b.finish()));
    assert_ne!(a.schema(), b.schema());
    assert_ne!(a.hash(), b.hash());
}

#[test]
fn builder_and_doc_reconstruction_agree() {
    let mut input = DocBuilder::new();
    input.append_string("s", "payload");
    input.append_int32("i", 5);
    let bytes = input.finish();

    let builder = split(&bytes);
    let mut from_builder = BufBuilder::new();
    builder.to_document(&mut from_builder).unwrap();

    let doc = builder.release();
    let mut from_doc = BufBuilder::new();
    doc.to_document(&mut from_doc).unwrap();

    assert_eq!(from_builder.buf(), from_doc.buf());
    assert_eq!(from_doc.buf(), &bytes[..]);
}

#[test]
fn reconstruction_into_nonempty_sink() {
    let mut input = DocBuilder::new();
    input.append_string("s", "hi");
    let bytes = input.finish();

    let doc = split(&bytes).release();
    let mut out = BufBuilder::new();
    out.append_bytes(b"prefix");
    doc.to_document(&mut out).unwrap();

    assert_eq!(&out.buf()[..6], b"prefix");
    assert_eq!(&out.buf()[6..], &bytes[..]);
}

#[test]
fn unsupported_schema_type_fails_reconstruction() {
    // Hand-built schema stream carrying type 0x05 (binary).
    let mut schema = Vec::new();
    schema.extend_from_slice(&12u32.to_le_bytes());
    schema.extend_from_slice(&0u32.to_le_bytes());
    schema.extend_from_slice(&[0x05, 0x01, b'x', 0x00]);
    let data = 0u32.to_le_bytes().to_vec();

    let doc = SplitDoc::new(schema, data);
    let err = doc.to_bytes().unwrap_err();
    assert!(err.to_string().contains("field x has unsupported type 5"));
}

#[test]
fn release_preserves_schema_and_concatenates_data() {
    let mut input = DocBuilder::new();
    input.append_int32("i", 3);
    input.append_string("s", "abc");
    let bytes = input.finish();

    let builder = split(&bytes);
    let schema = builder.schema().to_vec();
    let doc = builder.release();

    assert_eq!(doc.schema(), &schema[..]);
    // Data buffer: var-len header, int32 value, end-offset, then "abc\0".
    assert_eq!(doc.data().len(), 4 + 4 + 4 + 4);
    assert_eq!(&doc.data()[12..], b"abc\0");
}
