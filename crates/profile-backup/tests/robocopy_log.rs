//! Tests for the copy-tool exit classification and log parsing
//!

use profile_backup::engine::{ExitClass, classify_exit_code, parse_copy_counters};

const PLAIN_SUMMARY: &str = "
-------------------------------------------------------------------------------

               Total    Copied   Skipped  Mismatch    FAILED    Extras
    Dirs :        23        15         8         0         0         0
   Files :       129       127         2         0         0         0
   Bytes :   104857600  104857088       512         0         0         0

   Ended : Monday, 3 June 2024 10:15:01 am
";

const UNIT_SUMMARY: &str = "
               Total    Copied   Skipped  Mismatch    FAILED    Extras
    Dirs :         4         4         0         0         0         0
   Files :        12        12         0         0         0         0
   Bytes :    10.5 m    10.5 m         0         0         0         0
";

#[test]
fn parses_plain_byte_summary() {
    let (files, bytes) = parse_copy_counters(PLAIN_SUMMARY);

    assert_eq!(files, 127);
    assert_eq!(bytes, 104_857_088);
}

#[test]
fn parses_unit_suffixed_summary() {
    let (files, bytes) = parse_copy_counters(UNIT_SUMMARY);

    assert_eq!(files, 12);
    assert_eq!(bytes, 11_010_048); // 10.5 MiB
}

#[test]
fn missing_summary_falls_back_to_zero() {
    let (files, bytes) = parse_copy_counters("robocopy produced no summary today");

    assert_eq!(files, 0);
    assert_eq!(bytes, 0);
}

#[test]
fn garbled_summary_falls_back_to_zero() {
    let (files, bytes) = parse_copy_counters("   Files :    lots     many\n   Bytes :   ? ?\n");

    assert_eq!(files, 0);
    assert_eq!(bytes, 0);
}

#[test]
fn low_exit_codes_are_not_failures() {
    assert_eq!(classify_exit_code(0), ExitClass::Success);
    assert_eq!(classify_exit_code(1), ExitClass::Success);

    for code in 2..=7 {
        assert_eq!(classify_exit_code(code), ExitClass::Partial);
    }
}

#[test]
fn high_exit_codes_are_failures() {
    assert_eq!(classify_exit_code(8), ExitClass::Failure);
    assert_eq!(classify_exit_code(16), ExitClass::Failure);
    assert_eq!(classify_exit_code(-1), ExitClass::Failure);
}
