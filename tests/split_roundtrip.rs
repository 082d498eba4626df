//! End-to-end round-trip tests for the split codec

use splitbson::bson::{DocBuilder, RawDocument};
use splitbson::{BufBuilder, SplitBuilder};

fn roundtrip(bytes: &[u8]) {
    let doc = RawDocument::new(bytes).unwrap();
    let mut builder = SplitBuilder::new();
    builder.append_elements(&doc).unwrap();
    let split = builder.release();
    assert_eq!(split.to_bytes().unwrap(), bytes);
}

#[test]
fn empty_document() {
    roundtrip(&DocBuilder::new().finish());
}

#[test]
fn all_fixed_types() {
    let mut doc = DocBuilder::new();
    doc.append_double("double", 1234.5678);
    doc.append_object_id("oid", &[0xAB; 12]);
    doc.append_bool("yes", true);
    doc.append_bool("no", false);
    doc.append_date("created", -62_135_596_800_000);
    doc.append_null("nothing");
    doc.append_int32("small", i32::MAX);
    doc.append_timestamp("ts", u64::MAX);
    doc.append_int64("large", i64::MIN);
    doc.append_decimal128("money", &[0x42; 16]);
    roundtrip(&doc.finish());
}

#[test]
fn strings_of_varying_length() {
    let mut doc = DocBuilder::new();
    doc.append_string("empty", "");
    doc.append_string("short", "x");
    doc.append_string("medium", "the quick brown fox");
    doc.append_string("long", &"repetition ".repeat(500));
    roundtrip(&doc.finish());
}

#[test]
fn unicode_string_payloads() {
    let mut doc = DocBuilder::new();
    doc.append_string("greeting", "こんにちは");
    doc.append_string("emoji", "🚀🚀🚀");
    roundtrip(&doc.finish());
}

#[test]
fn interleaved_fixed_and_variable_fields() {
    let mut doc = DocBuilder::new();
    doc.append_string("a", "first");
    doc.append_int32("b", 1);
    doc.append_string("c", "second");
    doc.append_double("d", 0.5);
    doc.append_string("e", "third");
    roundtrip(&doc.finish());
}

#[test]
fn field_name_lengths_across_varint_boundaries() {
    for len in [0usize, 1, 127, 128, 200, 300] {
        let name = "n".repeat(len);
        let mut doc = DocBuilder::new();
        doc.append_int32(&name, len as i32);
        doc.append_string(&name, "v");
        roundtrip(&doc.finish());
    }
}

#[test]
fn many_fields() {
    let mut doc = DocBuilder::new();
    for i in 0..100 {
        let name = format!("field_{}", i);
        if i % 3 == 0 {
            doc.append_string(&name, &format!("value {}", i));
        } else {
            doc.append_int64(&name, i as i64);
        }
    }
    roundtrip(&doc.finish());
}

#[test]
fn builders_are_independent_per_document() {
    let mut a = DocBuilder::new();
    a.append_string("s", "doc one");
    let a = a.finish();

    let mut b = DocBuilder::new();
    b.append_string("s", "doc two, longer");
    b.append_int32("extra", 9);
    let b = b.finish();

    roundtrip(&a);
    roundtrip(&b);
}

#[test]
fn reconstructions_can_share_one_sink() {
    let mut a = DocBuilder::new();
    a.append_int32("i", 1);
    let a = a.finish();

    let mut b = DocBuilder::new();
    b.append_string("s", "two");
    let b = b.finish();

    let mut sink = BufBuilder::new();
    for bytes in [&a, &b] {
        let doc = RawDocument::new(bytes).unwrap();
        let mut builder = SplitBuilder::new();
        builder.append_elements(&doc).unwrap();
        builder.release().to_document(&mut sink).unwrap();
    }

    let mut expected = a.clone();
    expected.extend_from_slice(&b);
    assert_eq!(sink.buf(), &expected[..]);
}

#[test]
fn split_sizes_match_between_builder_and_doc() {
    let mut doc = DocBuilder::new();
    doc.append_int32("i", 1);
    doc.append_string("s", "abc");
    let bytes = doc.finish();

    let raw = RawDocument::new(&bytes).unwrap();
    let mut builder = SplitBuilder::new();
    builder.append_elements(&raw).unwrap();

    let builder_size = builder.data_size();
    let split = builder.release();
    assert_eq!(split.data_size(), builder_size);
    assert_eq!(split.data_size(), 4 + 4 + 4); // int32 + end-offset + "abc\0"
}
