use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Public tracking code shared with the customer: eight uppercase hex
/// characters, distinct from the booking's internal id.
pub fn new_tracking_code() -> String {
    format!("{:08X}", rand::thread_rng().gen::<u32>())
}

/// Claims carried by a per-booking guest session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GuestClaims {
    pub sub: String,
    pub scope: String,
    pub exp: usize,
}

const GUEST_SCOPE: &str = "GUEST";

/// Issues and verifies the session credential bound to a single booking.
/// The subject is the booking's `guest_id`; handlers compare it against the
/// booking row before allowing seat selection or proof submission.
#[derive(Clone)]
pub struct SessionIssuer {
    secret: String,
    ttl_seconds: u64,
}

impl SessionIssuer {
    pub fn new(secret: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    pub fn issue(&self, guest_id: Uuid) -> Result<String> {
        let claims = GuestClaims {
            sub: guest_id.to_string(),
            scope: GUEST_SCOPE.to_owned(),
            exp: (Utc::now() + Duration::seconds(self.ttl_seconds as i64)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::Storage(format!("Token encoding failed: {}", e)))
    }

    /// Decode a session token and return the guest id it was issued for.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let data = decode::<GuestClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| Error::Forbidden("Session token is not valid".to_owned()))?;

        if data.claims.scope != GUEST_SCOPE {
            return Err(Error::Forbidden("Session token has wrong scope".to_owned()));
        }

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| Error::Forbidden("Session token subject is malformed".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_codes_are_eight_uppercase_hex_chars() {
        for _ in 0..50 {
            let code = new_tracking_code();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn session_token_round_trips() {
        let issuer = SessionIssuer::new("test-secret", 3600);
        let guest = Uuid::new_v4();

        let token = issuer.issue(guest).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), guest);
    }

    #[test]
    fn session_token_rejects_wrong_secret() {
        let issuer = SessionIssuer::new("test-secret", 3600);
        let other = SessionIssuer::new("other-secret", 3600);
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(other.verify(&token), Err(Error::Forbidden(_))));
    }

    #[test]
    fn session_token_rejects_garbage() {
        let issuer = SessionIssuer::new("test-secret", 3600);
        assert!(matches!(issuer.verify("not-a-token"), Err(Error::Forbidden(_))));
    }
}
