//! Hash-algorithm dispatch and the transcript digest accumulator.
//!
//! The raw hash/HKDF-Expand primitives are collaborators (see §1, §10 of
//! SPEC_FULL.md) supplied by the `sha1`/`sha2`/`hkdf` crates; this module
//! only adds the small enum dispatch the rest of the driver needs to stay
//! generic over which of the four RFC 8446 hashes is in play.

use std::convert::TryFrom;

use digest::Digest;
use hkdf::Hkdf;

use crate::error::TLSError;

/// The hash algorithms this driver knows how to dispatch over.
///
/// Any other hash is a programmer error -- there is deliberately no
/// `Other(..)` escape hatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hash {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl Hash {
    /// Output size in bytes of this hash function.
    pub fn size(&self) -> usize {
        match self {
            Hash::Sha1 => 20,
            Hash::Sha256 => 32,
            Hash::Sha384 => 48,
            Hash::Sha512 => 64,
        }
    }

    /// HKDF-Expand(secret, info, length) under this hash, where `secret` is
    /// already a pseudo-random key (i.e. this calls Expand directly, not
    /// Extract-then-Expand).
    pub fn hkdf_expand(&self, secret: &[u8], info: &[u8], length: usize) -> Vec<u8> {
        let mut out = vec![0u8; length];
        match self {
            Hash::Sha1 => {
                let hk = Hkdf::<sha1::Sha1>::from_prk(secret).expect("invalid PRK length");
                hk.expand(info, &mut out).expect("invalid okm length");
            }
            Hash::Sha256 => {
                let hk = Hkdf::<sha2::Sha256>::from_prk(secret).expect("invalid PRK length");
                hk.expand(info, &mut out).expect("invalid okm length");
            }
            Hash::Sha384 => {
                let hk = Hkdf::<sha2::Sha384>::from_prk(secret).expect("invalid PRK length");
                hk.expand(info, &mut out).expect("invalid okm length");
            }
            Hash::Sha512 => {
                let hk = Hkdf::<sha2::Sha512>::from_prk(secret).expect("invalid PRK length");
                hk.expand(info, &mut out).expect("invalid okm length");
            }
        }
        out
    }

    fn new_digest(&self) -> TranscriptDigest {
        match self {
            Hash::Sha1 => TranscriptDigest::Sha1(sha1::Sha1::new()),
            Hash::Sha256 => TranscriptDigest::Sha256(sha2::Sha256::new()),
            Hash::Sha384 => TranscriptDigest::Sha384(sha2::Sha384::new()),
            Hash::Sha512 => TranscriptDigest::Sha512(sha2::Sha512::new()),
        }
    }
}

impl TryFrom<&str> for Hash {
    type Error = TLSError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sha1" => Ok(Hash::Sha1),
            "sha256" => Ok(Hash::Sha256),
            "sha384" => Ok(Hash::Sha384),
            "sha512" => Ok(Hash::Sha512),
            other => Err(TLSError::misc(format!("unsupported hash: {}", other))),
        }
    }
}

/// A running transcript digest: bytes are folded in incrementally via
/// [HandshakeDigest::update], and the current hash can be read at any point
/// without disturbing further accumulation (cloning a RustCrypto digest
/// state is cheap and exactly what's needed to peek a rolling hash).
#[derive(Clone)]
enum TranscriptDigest {
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
}

pub struct HandshakeDigest {
    hash: Hash,
    digest: TranscriptDigest,
}

impl HandshakeDigest {
    pub fn new(hash: Hash) -> Self {
        Self {
            hash,
            digest: hash.new_digest(),
        }
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Folds `data` into the running digest. This must be called with
    /// exactly the same bytes, in the same order, as are appended to the
    /// handshake message list via `add_handshake_message` -- divergence
    /// between the two is a bug (see SPEC_FULL.md §4.5).
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.digest {
            TranscriptDigest::Sha1(d) => d.update(data),
            TranscriptDigest::Sha256(d) => d.update(data),
            TranscriptDigest::Sha384(d) => d.update(data),
            TranscriptDigest::Sha512(d) => d.update(data),
        }
    }

    /// Reads the current transcript hash without consuming the accumulator.
    pub fn current(&self) -> Vec<u8> {
        match self.digest.clone() {
            TranscriptDigest::Sha1(d) => d.finalize().to_vec(),
            TranscriptDigest::Sha256(d) => d.finalize().to_vec(),
            TranscriptDigest::Sha384(d) => d.finalize().to_vec(),
            TranscriptDigest::Sha512(d) => d.finalize().to_vec(),
        }
    }
}
