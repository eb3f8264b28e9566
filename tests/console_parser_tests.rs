//! Operator input parsing tests

use sweep_synth::console::parser::{parse_number, ConfirmToken};

#[test]
fn test_parse_plain_number() {
    assert_eq!(parse_number("1000"), 1000);
    assert_eq!(parse_number("0"), 0);
}

#[test]
fn test_parse_leading_digits_only() {
    assert_eq!(parse_number("2000Hz"), 2000);
    assert_eq!(parse_number("12 34"), 12);
}

#[test]
fn test_parse_non_numeric_is_zero() {
    assert_eq!(parse_number("abc"), 0);
    assert_eq!(parse_number(""), 0);
    assert_eq!(parse_number("Hz100"), 0);
}

#[test]
fn test_parse_sign_and_whitespace() {
    assert_eq!(parse_number("  42"), 42);
    assert_eq!(parse_number("+42"), 42);
    assert_eq!(parse_number("-42"), 0);
}

#[test]
fn test_parse_saturates() {
    assert_eq!(parse_number("999999999999"), u32::MAX);
}

#[test]
fn test_confirm_tokens_exact() {
    assert_eq!(ConfirmToken::parse("OK"), ConfirmToken::Ok);
    assert_eq!(ConfirmToken::parse("RESTART"), ConfirmToken::Restart);
}

#[test]
fn test_confirm_tokens_case_sensitive() {
    assert_eq!(ConfirmToken::parse("ok"), ConfirmToken::Other);
    assert_eq!(ConfirmToken::parse("Ok"), ConfirmToken::Other);
    assert_eq!(ConfirmToken::parse("restart"), ConfirmToken::Other);
    assert_eq!(ConfirmToken::parse("OK "), ConfirmToken::Other);
    assert_eq!(ConfirmToken::parse(""), ConfirmToken::Other);
}
