//! Webhook signatures
//!
//! Submissions are signed with HMAC-SHA256 over the raw request body using a
//! shared secret. The hex-encoded tag travels in the `X-Webhook-Signature`
//! header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Outcome of checking a submission's signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Missing,
    Malformed,
    Mismatch,
}

/// Hex-encoded HMAC-SHA256 of `body`
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    hex::encode(mac(secret, body).finalize().into_bytes())
}

/// Verify a hex signature in constant time
pub fn verify(secret: &[u8], body: &[u8], signature: Option<&str>) -> SignatureCheck {
    let Some(signature) = signature.map(str::trim).filter(|s| !s.is_empty()) else {
        return SignatureCheck::Missing;
    };
    let Ok(tag) = hex::decode(signature) else {
        return SignatureCheck::Malformed;
    };

    match mac(secret, body).verify_slice(&tag) {
        Ok(()) => SignatureCheck::Valid,
        Err(_) => SignatureCheck::Mismatch,
    }
}

fn mac(secret: &[u8], body: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret).unwrap_or_else(|_| unreachable!());
    mac.update(body);
    mac
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"student_id":"STU10001","action":"checkin"}"#;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            sign(b"Jefe", b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_round_trip() {
        let signature = sign(b"secret", BODY);
        assert_eq!(verify(b"secret", BODY, Some(&signature)), SignatureCheck::Valid);
        assert_eq!(
            verify(b"secret", BODY, Some(&signature.to_uppercase())),
            SignatureCheck::Valid
        );
    }

    #[test]
    fn test_rejections() {
        let signature = sign(b"secret", BODY);
        assert_eq!(verify(b"other", BODY, Some(&signature)), SignatureCheck::Mismatch);
        assert_eq!(verify(b"secret", b"{}", Some(&signature)), SignatureCheck::Mismatch);
        assert_eq!(verify(b"secret", BODY, None), SignatureCheck::Missing);
        assert_eq!(verify(b"secret", BODY, Some("  ")), SignatureCheck::Missing);
        assert_eq!(verify(b"secret", BODY, Some("zz")), SignatureCheck::Malformed);
    }
}
