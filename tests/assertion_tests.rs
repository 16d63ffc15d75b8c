// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity assertions minted by a real JWT encoder must decode.
//!
//! The engine does not verify signatures; these tests only check that the
//! payload encoding produced by common JWT libraries is accepted.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use videorate::services::decode_identity_assertion;

#[derive(Serialize)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    picture: String,
    email_verified: bool,
    exp: usize,
}

fn mint(claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(b"test_signing_key_32_bytes_long!!"),
    )
    .expect("Failed to create JWT")
}

#[test]
fn test_signed_assertion_decodes() {
    let token = mint(&Claims {
        sub: "108234".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        picture: "https://example.com/ada.png".to_string(),
        email_verified: true,
        exp: 2_000_000_000,
    });

    let identity = decode_identity_assertion(&token).unwrap();
    assert_eq!(identity.subject_id, "108234");
    assert_eq!(identity.display_name, "Ada Lovelace");
    assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
    assert_eq!(
        identity.picture_url.as_deref(),
        Some("https://example.com/ada.png")
    );
    assert!(identity.email_verified);
}

#[test]
fn test_signature_is_not_checked() {
    let token = mint(&Claims {
        sub: "u1".to_string(),
        name: "A".to_string(),
        email: "a@x.com".to_string(),
        picture: String::new(),
        email_verified: false,
        exp: 0,
    });

    let mut parts: Vec<&str> = token.split('.').collect();
    parts[2] = "tampered";
    let tampered = parts.join(".");

    let identity = decode_identity_assertion(&tampered).unwrap();
    assert_eq!(identity.subject_id, "u1");
}
