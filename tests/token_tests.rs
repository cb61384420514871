use chrono::{Duration, TimeZone, Utc};
use forum_auth::{
    AppConfig,
    token::{Claims, TokenCodec, TokenError},
};
use jsonwebtoken::{EncodingKey, Header, encode};

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn codec() -> TokenCodec {
    TokenCodec::new(TEST_JWT_SECRET, Duration::minutes(30))
}

fn issued_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// Replaces one character of the token at `index` with a different base64url character.
fn flip_char(token: &str, index: usize) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[test]
fn test_round_trip_before_expiry() {
    let codec = codec();
    let now = issued_at();
    let token = codec.issue_at(42, 2, now).unwrap();

    let claims = codec.verify_at(&token, now + Duration::minutes(29)).unwrap();
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.role_id, 2);
    assert_eq!(claims.iat, now.timestamp());
    assert_eq!(claims.exp, (now + Duration::minutes(30)).timestamp());
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_issue_uses_wall_clock() {
    let codec = codec();
    let token = codec.issue(7, 1).unwrap();
    let claims = codec.verify(&token).unwrap();
    assert_eq!((claims.user_id, claims.role_id), (7, 1));
    assert_eq!(claims.exp - claims.iat, codec.ttl().num_seconds());
}

#[test]
fn test_expired_at_and_after_boundary() {
    let codec = codec();
    let now = issued_at();
    let token = codec.issue_at(42, 1, now).unwrap();

    let last_valid = now + Duration::minutes(30) - Duration::seconds(1);
    assert!(codec.verify_at(&token, last_valid).is_ok());

    assert_eq!(
        codec.verify_at(&token, now + Duration::minutes(30)),
        Err(TokenError::Expired)
    );
    assert_eq!(
        codec.verify_at(&token, now + Duration::days(3)),
        Err(TokenError::Expired)
    );
}

#[test]
fn test_flipped_signature_byte_is_invalid() {
    let codec = codec();
    let now = issued_at();
    let token = codec.issue_at(42, 1, now).unwrap();

    let signature_start = token.rfind('.').unwrap() + 1;
    let tampered = flip_char(&token, signature_start + 5);
    assert_ne!(tampered, token);
    assert_eq!(codec.verify_at(&tampered, now), Err(TokenError::Invalid));
}

#[test]
fn test_flipped_header_byte_is_invalid() {
    let codec = codec();
    let now = issued_at();
    let token = codec.issue_at(42, 1, now).unwrap();

    // The last character may only carry padding bits, so it is left out.
    let header_len = token.find('.').unwrap();
    for index in 0..header_len - 1 {
        let tampered = flip_char(&token, index);
        assert_eq!(
            codec.verify_at(&tampered, now),
            Err(TokenError::Invalid),
            "flip at header index {index} was accepted"
        );
    }
}

#[test]
fn test_flipped_payload_byte_is_invalid() {
    let codec = codec();
    let now = issued_at();
    let token = codec.issue_at(42, 1, now).unwrap();

    let payload_start = token.find('.').unwrap() + 1;
    let tampered = flip_char(&token, payload_start + 3);
    assert_eq!(codec.verify_at(&tampered, now), Err(TokenError::Invalid));
}

#[test]
fn test_swapped_payload_is_invalid() {
    let codec = codec();
    let now = issued_at();
    let standard = codec.issue_at(42, 1, now).unwrap();

    // Re-sign an escalated payload with another key and graft its payload onto the
    // original header and signature.
    let forged_claims = Claims {
        user_id: 42,
        role_id: 3,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(30)).timestamp(),
    };
    let forged = encode(
        &Header::default(),
        &forged_claims,
        &EncodingKey::from_secret(b"attacker-key"),
    )
    .unwrap();

    let parts: Vec<&str> = standard.split('.').collect();
    let forged_payload = forged.split('.').nth(1).unwrap();
    let grafted = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(codec.verify_at(&forged, now), Err(TokenError::Invalid));
    assert_eq!(codec.verify_at(&grafted, now), Err(TokenError::Invalid));
}

#[test]
fn test_other_secret_rejects_token() {
    let now = issued_at();
    let token = codec().issue_at(42, 1, now).unwrap();

    let rotated = TokenCodec::new("rotated-secret", Duration::minutes(30));
    assert_eq!(rotated.verify_at(&token, now), Err(TokenError::Invalid));
}

#[test]
fn test_garbage_is_invalid() {
    let codec = codec();
    for token in ["", "abc", "a.b.c", "Bearer x.y.z"] {
        assert_eq!(codec.verify(token), Err(TokenError::Invalid), "{token:?}");
    }
}

#[test]
fn test_claims_with_exp_not_after_iat_are_invalid() {
    let now = issued_at();
    let claims = Claims {
        user_id: 1,
        role_id: 1,
        iat: now.timestamp(),
        exp: now.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    assert_eq!(
        codec().verify_at(&token, now - Duration::hours(1)),
        Err(TokenError::Invalid)
    );
}

#[test]
fn test_from_config_uses_secret_and_ttl() {
    let config = AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_minutes: 5,
        ..AppConfig::default()
    };
    let from_config = TokenCodec::from_config(&config);
    assert_eq!(from_config.ttl(), Duration::minutes(5));

    let now = issued_at();
    let token = from_config.issue_at(9, 3, now).unwrap();
    // Same secret, so a codec built by hand accepts it.
    assert_eq!(codec().verify_at(&token, now).unwrap().role_id, 3);
    assert_eq!(
        from_config.verify_at(&token, now + Duration::minutes(5)),
        Err(TokenError::Expired)
    );
}
