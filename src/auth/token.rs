//! Bearer tokens for authenticated requests.
//!
//! Tokens are HS256 JSON Web Tokens carrying the user's ID. The rest of the
//! application treats the encoded token as an opaque string.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// The default lifetime of a token.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::minutes(60);

/// The contents of a token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The user the token was issued to.
    pub user_id: UserID,
    /// The time the token was issued as a Unix timestamp.
    pub iat: i64,
    /// The expiry time of the token as a Unix timestamp.
    pub exp: i64,
}

/// The keys for signing and verifying tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Derive the signing keys from a `secret` string.
    pub fn new(secret: &str) -> Self {
        let hash = Sha512::digest(secret);

        Self {
            encoding_key: EncodingKey::from_secret(&hash),
            decoding_key: DecodingKey::from_secret(&hash),
        }
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenKeys { .. }")
    }
}

/// Create a token for `user_id` that expires after `duration`.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if the claims could not be signed.
pub fn encode_token(user_id: UserID, duration: Duration, keys: &TokenKeys) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        user_id,
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify `token` and return its claims.
///
/// # Errors
///
/// Returns [Error::InvalidToken] if the token is malformed, expired or was
/// signed with a different key.
pub fn decode_token(token: &str, keys: &TokenKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::warn!("Rejected bearer token: {error}");
            Error::InvalidToken
        })
}

#[cfg(test)]
mod token_tests {
    use time::Duration;

    use crate::{
        Error,
        auth::{
            UserID,
            token::{DEFAULT_TOKEN_DURATION, TokenKeys, decode_token, encode_token},
        },
    };

    #[test]
    fn decode_gives_back_user_id() {
        let keys = TokenKeys::new("foobar");
        let token = encode_token(UserID::new(3), DEFAULT_TOKEN_DURATION, &keys).unwrap();

        let claims = decode_token(&token, &keys).unwrap();

        assert_eq!(claims.user_id, UserID::new(3));
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_DURATION.whole_seconds());
    }

    #[test]
    fn decode_fails_with_different_secret() {
        let token =
            encode_token(UserID::new(3), DEFAULT_TOKEN_DURATION, &TokenKeys::new("foo")).unwrap();

        assert_eq!(
            decode_token(&token, &TokenKeys::new("bar")),
            Err(Error::InvalidToken)
        );
    }

    #[test]
    fn decode_fails_on_expired_token() {
        let keys = TokenKeys::new("foobar");
        // Expired well past the default leeway of one minute.
        let token = encode_token(UserID::new(3), Duration::minutes(-5), &keys).unwrap();

        assert_eq!(decode_token(&token, &keys), Err(Error::InvalidToken));
    }

    #[test]
    fn decode_fails_on_garbage() {
        let keys = TokenKeys::new("foobar");

        assert_eq!(decode_token("FOOBAR", &keys), Err(Error::InvalidToken));
    }
}
