//! End-to-end extraction tests against the real filesystem.

mod helpers;
use helpers::stream::gzip_fixed;

use std::fs;

use decant::{Error, ExtractionMethod, Format, GzipExtractor, SevenZipCommand, SpeedLevel};

#[test]
fn test_extract_writes_file_named_by_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.gz");
    fs::write(&input, gzip_fixed(b"hi!", Some("a.txt"))).unwrap();

    let target = dir.path().join("out");
    let method = GzipExtractor::new();
    let written = method.extract(&input, &target, Format::Gzip).unwrap();

    assert_eq!(written, target.join("a.txt"));
    assert_eq!(fs::read(written).unwrap(), b"hi!");
}

#[test]
fn test_extract_falls_back_to_input_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.gz");
    fs::write(&input, gzip_fixed(b"fallback", None)).unwrap();

    let target = dir.path().join("out");
    let written = GzipExtractor::new()
        .extract(&input, &target, Format::Gzip)
        .unwrap();

    assert_eq!(written, target.join("data"));
    assert_eq!(fs::read(written).unwrap(), b"fallback");
}

#[test]
fn test_extract_into_existing_target_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.gz");
    fs::write(&input, gzip_fixed(b"twice", Some("t.bin"))).unwrap();

    let target = dir.path().join("out");
    let method = GzipExtractor::new();
    method.extract(&input, &target, Format::Gzip).unwrap();
    method.extract(&input, &target, Format::Gzip).unwrap();
    assert_eq!(fs::read(target.join("t.bin")).unwrap(), b"twice");
}

#[test]
fn test_corrupt_input_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.gz");
    let mut bytes = gzip_fixed(b"hi!", Some("a.txt"));
    bytes[0] = 0x00; // break the magic
    fs::write(&input, bytes).unwrap();

    let target = dir.path().join("out");
    let err = GzipExtractor::new()
        .extract(&input, &target, Format::Gzip)
        .unwrap_err();
    assert!(matches!(err, Error::InputCorrupted { .. }));
    // Nothing may be written, not even the target directory.
    assert!(!target.exists());
}

#[test]
fn test_hostile_header_name_stays_inside_target() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.gz");
    fs::write(&input, gzip_fixed(b"gotcha", Some("../../escape.txt"))).unwrap();

    let target = dir.path().join("out");
    let written = GzipExtractor::new()
        .extract(&input, &target, Format::Gzip)
        .unwrap();

    assert_eq!(written, target.join("escape.txt"));
    assert!(!dir.path().join("escape.txt").exists());
}

#[test]
fn test_gzip_method_refuses_other_formats() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.zip");
    fs::write(&input, b"PK\x03\x04").unwrap();

    let err = GzipExtractor::new()
        .extract(&input, &dir.path().join("out"), Format::Zip)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat));
}

#[test]
fn test_gzip_method_capabilities() {
    let method = GzipExtractor::new();
    assert!(method.is_supported());
    assert!(method.supports_format(Format::Gzip));
    assert!(!method.supports_format(Format::Zip));
    assert_eq!(method.speed_level(), SpeedLevel::Lowest);
}

#[test]
fn test_methods_are_ranked_by_speed() {
    // The native bit-level decoder is the strategy of last resort.
    let native = GzipExtractor::new();
    let command = SevenZipCommand::new();
    assert!(native.speed_level() < command.speed_level());
}
