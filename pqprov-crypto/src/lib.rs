#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unreachable,
    clippy::todo,
    clippy::unimplemented
)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![allow(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Key-encapsulation backends for the post-quantum provider.
//!
//! - `kem`: the [`Kem`] trait and zeroizing key/secret containers
//! - `mlkem` (feature `kyber`): ML-KEM-512/768/1024
//! - `classic` (feature `classic`): X25519, X448 and P-256/P-384/P-521 ECDH as KEMs
//! - `hybrid`: classical || post-quantum concatenation
//! - `factory`: resolves catalog group names to backends
//! - `selftest`: encapsulate/decapsulate round trip with ciphertext tampering

#[cfg(feature = "classic")]
pub mod classic;
pub mod factory;
pub mod hybrid;
pub mod kem;
#[cfg(feature = "kyber")]
pub mod mlkem;
pub mod selftest;

pub use factory::KemFactory;
pub use kem::{Encapsulated, Kem, KemKeypair, KemSizes, SharedSecret};

/// Error type for KEM operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid key: {0}")]
    /// Key material has the wrong length or encoding
    InvalidKey(String),
    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),
    #[error("Unsupported algorithm: {0}")]
    /// No backend is linked for the algorithm
    Unsupported(String),
}

pub type Result<T> = core::result::Result<T, Error>;
