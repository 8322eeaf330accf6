//! KEM round-trip verification.
//!
//! For each algorithm: generate a key pair, encapsulate, decapsulate and
//! compare; then complement the first and last ciphertext bytes and
//! decapsulate again. A decapsulation error on the tampered ciphertext is
//! acceptable, but a recovered secret equal to the original is a failure.

use crate::factory::KemFactory;
use crate::kem::Kem;
use crate::Error;
use tracing::{info, warn};

/// Why an algorithm failed its check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckFailure {
    #[error("key generation failed: {0}")]
    Keypair(Error),
    #[error("encapsulation failed: {0}")]
    Encapsulate(Error),
    #[error("decapsulation failed: {0}")]
    Decapsulate(Error),
    #[error("decapsulated secret differs from encapsulated secret")]
    SecretMismatch,
    #[error("empty ciphertext")]
    EmptyCiphertext,
    #[error("tampered ciphertext decapsulated to the original secret")]
    TamperUndetected,
}

/// Details of a passing check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KemCheck {
    pub algorithm: String,
    pub ciphertext_len: usize,
    pub shared_secret_len: usize,
    /// Whether the tampered ciphertext was refused outright rather than
    /// decapsulated to an unrelated secret.
    pub tamper_rejected: bool,
}

pub fn check_kem(kem: &dyn Kem) -> Result<KemCheck, CheckFailure> {
    let kp = kem.keypair().map_err(CheckFailure::Keypair)?;
    let enc = kem.encapsulate(&kp.public_key).map_err(CheckFailure::Encapsulate)?;
    let dec = kem.decapsulate(&kp.secret_key, &enc.ciphertext).map_err(CheckFailure::Decapsulate)?;
    if dec != enc.shared_secret {
        return Err(CheckFailure::SecretMismatch);
    }

    let mut tampered = enc.ciphertext.clone();
    let (Some(first), Some(last)) = (tampered.first().copied(), tampered.last().copied()) else {
        return Err(CheckFailure::EmptyCiphertext);
    };
    let n = tampered.len();
    tampered[0] = !first;
    tampered[n - 1] = !last;

    let tamper_rejected = match kem.decapsulate(&kp.secret_key, &tampered) {
        Ok(ss) if ss == enc.shared_secret => return Err(CheckFailure::TamperUndetected),
        Ok(_) => false,
        Err(_) => true,
    };

    Ok(KemCheck {
        algorithm: kem.name().to_owned(),
        ciphertext_len: enc.ciphertext.len(),
        shared_secret_len: enc.shared_secret.len(),
        tamper_rejected,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed(KemCheck),
    /// No backend is linked for the algorithm.
    Skipped,
    Failed(CheckFailure),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub results: Vec<(String, Outcome)>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|(_, o)| matches!(o, Outcome::Passed(_))).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|(_, o)| matches!(o, Outcome::Skipped)).count()
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|(_, o)| matches!(o, Outcome::Failed(_))).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Check every named algorithm, skipping those without a backend.
pub fn run_suite<I, S>(names: I, factory: &KemFactory) -> SuiteReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = SuiteReport::default();
    for name in names {
        let name = name.as_ref();
        let outcome = match factory.lookup(name) {
            None => {
                info!(algorithm = name, "not testing unavailable algorithm");
                Outcome::Skipped
            }
            Some(kem) => match check_kem(kem.as_ref()) {
                Ok(check) => {
                    info!(algorithm = name, tamper_rejected = check.tamper_rejected, "kem check passed");
                    Outcome::Passed(check)
                }
                Err(failure) => {
                    warn!(algorithm = name, %failure, "kem check failed");
                    Outcome::Failed(failure)
                }
            },
        };
        report.results.push((name.to_owned(), outcome));
    }
    report
}
