//! Tests for serde support.
#![cfg(feature = "serde")]

use serde_test::{assert_de_tokens_error, assert_tokens, Token};

use url_canon::Domain;

#[test]
fn ascii_domain() {
    let domain = Domain::parse("example.com").unwrap();
    assert_tokens(&domain, &[Token::Str("example.com")]);
}

#[test]
fn unicode_domain() {
    let domain = Domain::parse_unicode("b\u{00FC}cher.de").unwrap();
    assert_tokens(&domain, &[Token::Str("b\u{00FC}cher.de")]);
}

#[test]
fn invalid_domain() {
    assert_de_tokens_error::<Domain>(
        &[Token::Str("exa mple.com")],
        "Illegal character in domain: space is not allowed",
    );
    assert_de_tokens_error::<Domain>(&[Token::Str("")], "input is empty");
}
