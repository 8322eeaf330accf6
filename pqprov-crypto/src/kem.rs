//! Common KEM interface.

use crate::{Error, Result};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Encoded sizes of one KEM, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemSizes {
    pub public_key: usize,
    pub secret_key: usize,
    pub ciphertext: usize,
    pub shared_secret: usize,
}

impl KemSizes {
    /// Sizes of `a || b`.
    pub const fn concat(a: KemSizes, b: KemSizes) -> KemSizes {
        KemSizes {
            public_key: a.public_key + b.public_key,
            secret_key: a.secret_key + b.secret_key,
            ciphertext: a.ciphertext + b.ciphertext,
            shared_secret: a.shared_secret + b.shared_secret,
        }
    }
}

/// A key-encapsulation mechanism over raw byte encodings.
pub trait Kem: Send + Sync {
    fn name(&self) -> &str;

    fn sizes(&self) -> KemSizes;

    fn keypair(&self) -> Result<KemKeypair>;

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulated>;

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret>;
}

/// Public key plus secret key; the secret half is wiped on drop.
pub struct KemKeypair {
    pub public_key: Vec<u8>,
    pub secret_key: Zeroizing<Vec<u8>>,
}

impl KemKeypair {
    pub fn new(public_key: Vec<u8>, secret_key: Vec<u8>) -> Self {
        Self { public_key, secret_key: Zeroizing::new(secret_key) }
    }
}

impl fmt::Debug for KemKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KemKeypair")
            .field("public_key_len", &self.public_key.len())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug)]
pub struct Encapsulated {
    pub ciphertext: Vec<u8>,
    pub shared_secret: SharedSecret,
}

/// Shared secret bytes. Compared in constant time, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `self || other`.
    pub fn concat(&self, other: &SharedSecret) -> SharedSecret {
        let mut out = Vec::with_capacity(self.len() + other.len());
        out.extend_from_slice(&self.0);
        out.extend_from_slice(&other.0);
        SharedSecret(out)
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && bool::from(self.0.as_slice().ct_eq(other.0.as_slice()))
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED; {}])", self.0.len())
    }
}

/// Length check shared by the backends.
pub(crate) fn expect_len(what: &str, actual: usize, expected: usize, err: fn(String) -> Error) -> Result<()> {
    if actual != expected {
        return Err(err(format!("{what}: expected {expected} bytes, got {actual}")));
    }
    Ok(())
}
