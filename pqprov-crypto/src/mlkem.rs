//! ML-KEM (FIPS 203) backends.
//!
//! The `kyber512`, `kyber768` and `kyber1024` groups are served by
//! ML-KEM-512/768/1024 through RustCrypto's `ml-kem` crate. Encodings are the
//! raw FIPS 203 byte strings.

use crate::kem::{expect_len, Encapsulated, Kem, KemKeypair, KemSizes, SharedSecret};
use crate::{Error, Result};
use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, Encoded, EncodedSizeUser, KemCore, MlKem1024, MlKem512, MlKem768};
use rand::rngs::OsRng;
use std::marker::PhantomData;
use tracing::debug;

pub const ML_KEM_512_SIZES: KemSizes = KemSizes { public_key: 800, secret_key: 1632, ciphertext: 768, shared_secret: 32 };
pub const ML_KEM_768_SIZES: KemSizes = KemSizes { public_key: 1184, secret_key: 2400, ciphertext: 1088, shared_secret: 32 };
pub const ML_KEM_1024_SIZES: KemSizes = KemSizes { public_key: 1568, secret_key: 3168, ciphertext: 1568, shared_secret: 32 };

/// One ML-KEM parameter set.
pub struct MlKem<K> {
    name: &'static str,
    sizes: KemSizes,
    _params: PhantomData<fn() -> K>,
}

pub fn kyber512() -> MlKem<MlKem512> {
    MlKem { name: "kyber512", sizes: ML_KEM_512_SIZES, _params: PhantomData }
}

pub fn kyber768() -> MlKem<MlKem768> {
    MlKem { name: "kyber768", sizes: ML_KEM_768_SIZES, _params: PhantomData }
}

pub fn kyber1024() -> MlKem<MlKem1024> {
    MlKem { name: "kyber1024", sizes: ML_KEM_1024_SIZES, _params: PhantomData }
}

/// Backend for a bare post-quantum group name, if one is linked.
pub fn lookup(name: &str) -> Option<Box<dyn Kem>> {
    match name {
        "kyber512" => Some(Box::new(kyber512())),
        "kyber768" => Some(Box::new(kyber768())),
        "kyber1024" => Some(Box::new(kyber1024())),
        _ => None,
    }
}

impl<K: KemCore + 'static> Kem for MlKem<K> {
    fn name(&self) -> &str {
        self.name
    }

    fn sizes(&self) -> KemSizes {
        self.sizes
    }

    fn keypair(&self) -> Result<KemKeypair> {
        let (dk, ek) = K::generate(&mut OsRng);
        debug!(algorithm = self.name, "ml-kem keypair generated");
        Ok(KemKeypair::new(ek.as_bytes().to_vec(), dk.as_bytes().to_vec()))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<Encapsulated> {
        expect_len("public key", public_key.len(), self.sizes.public_key, Error::InvalidKey)?;
        let encoded = Encoded::<K::EncapsulationKey>::try_from(public_key)
            .map_err(|_| Error::InvalidKey(format!("{}: malformed encapsulation key", self.name)))?;
        let ek = K::EncapsulationKey::from_bytes(&encoded);
        let (ct, ss) = ek
            .encapsulate(&mut OsRng)
            .map_err(|_| Error::Crypto(format!("{}: encapsulation failed", self.name)))?;
        Ok(Encapsulated { ciphertext: ct.to_vec(), shared_secret: SharedSecret::new(ss.to_vec()) })
    }

    fn decapsulate(&self, secret_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
        expect_len("secret key", secret_key.len(), self.sizes.secret_key, Error::InvalidKey)?;
        expect_len("ciphertext", ciphertext.len(), self.sizes.ciphertext, Error::InvalidCiphertext)?;
        let encoded = Encoded::<K::DecapsulationKey>::try_from(secret_key)
            .map_err(|_| Error::InvalidKey(format!("{}: malformed decapsulation key", self.name)))?;
        let dk = K::DecapsulationKey::from_bytes(&encoded);
        let ct = Ciphertext::<K>::try_from(ciphertext)
            .map_err(|_| Error::InvalidCiphertext(format!("{}: malformed ciphertext", self.name)))?;
        // Implicit rejection: a tampered ciphertext yields a pseudorandom secret, not an error.
        let ss = dk
            .decapsulate(&ct)
            .map_err(|_| Error::Crypto(format!("{}: decapsulation failed", self.name)))?;
        Ok(SharedSecret::new(ss.to_vec()))
    }
}
