//! Classical + post-quantum hybrid KEM.
//!
//! Public keys, secret keys, ciphertexts and shared secrets are the classical
//! encoding followed by the post-quantum one. The classical half has a fixed
//! width, so splitting needs no length prefix.

use crate::kem::{expect_len, Encapsulated, Kem, KemKeypair, KemSizes, SharedSecret};
use crate::{Error, Result};
use tracing::trace;

pub struct HybridKem {
    name: String,
    classical: Box<dyn Kem>,
    pq: Box<dyn Kem>,
}

impl HybridKem {
    /// Combine two backends under the `<classical>_<pq>` name.
    pub fn new(classical: Box<dyn Kem>, pq: Box<dyn Kem>) -> Self {
        let name = format!("{}_{}", classical.name(), pq.name());
        Self { name, classical, pq }
    }

    pub fn classical(&self) -> &dyn Kem {
        self.classical.as_ref()
    }

    pub fn post_quantum(&self) -> &dyn Kem {
        self.pq.as_ref()
    }
}

impl std::fmt::Debug for HybridKem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridKem").field("name", &self.name).finish()
    }
}

impl Kem for HybridKem {
    fn name(&self) -> &str {
        &self.name
    }

    fn sizes(&self) -> KemSizes {
        KemSizes::concat(self.classical.sizes(), self.pq.sizes())
    }

    fn keypair(&self) -> Result<KemKeypair> {
        let c = self.classical.keypair()?;
        let q = self.pq.keypair()?;
        let mut pk = Vec::with_capacity(c.public_key.len() + q.public_key.len());
        pk.extend_from_slice(&c.public_key);
        pk.extend_from_slice(&q.public_key);
        let mut sk = Vec::with_capacity(c.secret_key.len() + q.secret_key.len());
        sk.extend_from_slice(&c.secret_key);
        sk.extend_from_slice(&q.secret_key);
        Ok(KemKeypair::new(pk, sk))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulated> {
        expect_len("hybrid public key", public_key.len(), self.sizes().public_key, Error::InvalidKey)?;
        let (c_pk, q_pk) = public_key.split_at(self.classical.sizes().public_key);
        let c = self.classical.encapsulate(c_pk)?;
        let q = self.pq.encapsulate(q_pk)?;
        trace!(algorithm = %self.name, classical_ct = c.ciphertext.len(), pq_ct = q.ciphertext.len(), "hybrid encapsulation");

        let mut ciphertext = c.ciphertext;
        ciphertext.extend_from_slice(&q.ciphertext);
        Ok(Encapsulated { ciphertext, shared_secret: c.shared_secret.concat(&q.shared_secret) })
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
        let sizes = self.sizes();
        expect_len("hybrid secret key", secret_key.len(), sizes.secret_key, Error::InvalidKey)?;
        expect_len("hybrid ciphertext", ciphertext.len(), sizes.ciphertext, Error::InvalidCiphertext)?;
        let classical = self.classical.sizes();
        let (c_sk, q_sk) = secret_key.split_at(classical.secret_key);
        let (c_ct, q_ct) = ciphertext.split_at(classical.ciphertext);
        let c = self.classical.decapsulate(c_sk, c_ct)?;
        let q = self.pq.decapsulate(q_sk, q_ct)?;
        Ok(c.concat(&q))
    }
}
