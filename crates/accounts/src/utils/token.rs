//! Confirmation token issuance.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// A freshly issued confirmation secret and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a confirmation token: 32 bytes from the thread-local CSPRNG
/// (256 bits of entropy), URL-safe base64, valid for `ttl` from now.
pub fn issue_confirmation_token(ttl: Duration) -> IssuedToken {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    IssuedToken {
        token: URL_SAFE_NO_PAD.encode(bytes),
        expires_at: Utc::now() + ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_carry_32_random_bytes() {
        let issued = issue_confirmation_token(Duration::hours(1));
        let decoded = URL_SAFE_NO_PAD.decode(&issued.token).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn tokens_are_unique() {
        let a = issue_confirmation_token(Duration::hours(1));
        let b = issue_confirmation_token(Duration::hours(1));
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn expiry_honours_the_ttl() {
        let issued = issue_confirmation_token(Duration::minutes(30));
        let delta = issued.expires_at - Utc::now();
        assert!(delta <= Duration::minutes(30));
        assert!(delta > Duration::minutes(29));
    }
}
