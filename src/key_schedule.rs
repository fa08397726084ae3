//! TLS 1.3 key-update derivation (KS).
//!
//! https://tools.ietf.org/html/rfc8446#section-7.1
//!
//! This only implements the slice of the RFC 8446 key schedule this driver
//! itself needs: the traffic-secret-advance used by KeyUpdate, the
//! resumption-PSK derivation used by NewSessionTicket, and the
//! `HKDF-Expand-Label` / `Derive-Secret` building blocks both of those sit
//! on top of. The rest of the key schedule (early/handshake/master secret,
//! the initial handshake traffic secrets) belongs to the initial-handshake
//! negotiation this crate treats as out of scope.

use bytes::Bytes;

use crate::hash::Hash;

/// HKDF-Expand-Label(Secret, Label, Context, Length) =
///     HKDF-Expand(Secret, HkdfLabel, Length)
///
/// Where HkdfLabel is:
/// ```text
/// struct {
///     uint16 length = Length;
///     opaque label<7..255> = "tls13 " + Label;
///     opaque context<0..255> = Context;
/// } HkdfLabel;
/// ```
pub fn hkdf_expand_label(hash: Hash, secret: &[u8], label: &[u8], context: &[u8], length: usize) -> Bytes {
    let mut hkdf_label = Vec::with_capacity(2 + 1 + 6 + label.len() + 1 + context.len());
    hkdf_label.extend_from_slice(&(length as u16).to_be_bytes());

    let full_label_len = 6 + label.len();
    assert!(full_label_len <= 255);
    hkdf_label.push(full_label_len as u8);
    hkdf_label.extend_from_slice(b"tls13 ");
    hkdf_label.extend_from_slice(label);

    assert!(context.len() <= 255);
    hkdf_label.push(context.len() as u8);
    hkdf_label.extend_from_slice(context);

    hash.hkdf_expand(secret, &hkdf_label, length).into()
}

/// Derive-Secret(Secret, Label, Messages) =
///     HKDF-Expand-Label(Secret, Label, Transcript-Hash(Messages), Hash.length)
pub fn derive_secret(hash: Hash, secret: &[u8], label: &[u8], transcript_hash: &[u8]) -> Bytes {
    hkdf_expand_label(hash, secret, label, transcript_hash, hash.size())
}

/// Advances a single direction's traffic secret by one KeyUpdate:
///
/// secretN+1 = HKDF-Expand-Label(hash, secretN, "traffic upd", "", hash.length)
///
/// The cipher identity never changes across a KeyUpdate -- only the traffic
/// secret advances, which the record layer collaborator is expected to use
/// to reseed its AEAD write/read key and IV.
pub fn next_traffic_secret(hash: Hash, current_secret: &[u8]) -> Bytes {
    hkdf_expand_label(hash, current_secret, b"traffic upd", b"", hash.size())
}

/// Derives the resumption PSK carried by a NewSessionTicket:
///
/// psk = HKDF-Expand-Label(hash, resumption_master_secret, "resumption", ticket_nonce, hash.length)
pub fn resumption_psk(hash: Hash, resumption_master_secret: &[u8], ticket_nonce: &[u8]) -> Bytes {
    hkdf_expand_label(hash, resumption_master_secret, b"resumption", ticket_nonce, hash.size())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hkdf_expand_label_is_deterministic() {
        let secret = [0x42u8; 32];
        let a = hkdf_expand_label(Hash::Sha256, &secret, b"traffic upd", b"", 32);
        let b = hkdf_expand_label(Hash::Sha256, &secret, b"traffic upd", b"", 32);
        assert_eq!(a, b);
    }

    #[test]
    fn derive_secret_matches_hkdf_expand_label_prefix() {
        let secret = [0x11u8; 48];
        let transcript_hash = [0x22u8; 48];

        let via_derive_secret = derive_secret(Hash::Sha384, &secret, b"res master", &transcript_hash);
        let via_expand_label =
            hkdf_expand_label(Hash::Sha384, &secret, b"res master", &transcript_hash, Hash::Sha384.size());

        assert_eq!(via_derive_secret, via_expand_label);
        assert_eq!(via_derive_secret.len(), Hash::Sha384.size());
    }

    #[test]
    fn next_traffic_secret_changes_the_secret() {
        let secret = [0x33u8; 32];
        let updated = next_traffic_secret(Hash::Sha256, &secret);
        assert_ne!(&updated[..], &secret[..]);
        assert_eq!(updated.len(), 32);
    }

    #[test]
    fn different_hashes_produce_different_sizes() {
        let secret = [0x44u8; 20];
        let out = next_traffic_secret(Hash::Sha1, &secret);
        assert_eq!(out.len(), 20);

        let secret512 = [0x55u8; 64];
        let out512 = next_traffic_secret(Hash::Sha512, &secret512);
        assert_eq!(out512.len(), 64);
    }
}
