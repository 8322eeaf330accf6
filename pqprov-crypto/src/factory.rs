//! Name-based backend resolution.
//!
//! Accepts every group name the registry emits: a bare post-quantum name
//! (`kyber768`) or `<classical>_<pq>` (`p384_kyber768`). Names whose
//! primitive has no linked backend resolve to `None`.

use crate::hybrid::HybridKem;
use crate::kem::Kem;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct KemFactory;

impl KemFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn lookup(&self, name: &str) -> Option<Box<dyn Kem>> {
        let kem = match name.split_once('_') {
            Some((prefix, base)) => classical(prefix)
                .zip(post_quantum(base))
                .map(|(c, q)| Box::new(HybridKem::new(c, q)) as Box<dyn Kem>),
            None => post_quantum(name),
        };
        if kem.is_none() {
            debug!(algorithm = name, "no backend linked");
        }
        kem
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

#[cfg(feature = "kyber")]
fn post_quantum(name: &str) -> Option<Box<dyn Kem>> {
    crate::mlkem::lookup(name)
}

#[cfg(not(feature = "kyber"))]
fn post_quantum(_name: &str) -> Option<Box<dyn Kem>> {
    None
}

#[cfg(feature = "classic")]
fn classical(prefix: &str) -> Option<Box<dyn Kem>> {
    crate::classic::lookup(prefix)
}

#[cfg(not(feature = "classic"))]
fn classical(_prefix: &str) -> Option<Box<dyn Kem>> {
    None
}
