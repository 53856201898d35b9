use std::fmt;

use rand::distr::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};

use crate::error::{RenderError, RenderResult};

/// Length of the random suffix appended to generated identifiers.
pub const IDENTIFIER_SUFFIX_LEN: usize = 32;

/// Source of unpredictable identifiers for generated selectors and function
/// names.
pub trait RandomSource: fmt::Debug + Send + Sync {
    /// Returns `length` ASCII alphanumeric characters.
    fn random_string(&self, length: usize) -> String;
}

/// Random source backed by the operating system.
///
/// Draws from the thread-local CSPRNG, which is seeded from the OS.
#[derive(Debug, Clone, Copy)]
pub struct OsRandom(());

impl OsRandom {
    /// Probes the OS generator once and fails if it cannot deliver bytes.
    pub fn new() -> RenderResult<Self> {
        let mut probe = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|err| RenderError::RandomSourceUnavailable(err.to_string()))?;
        Ok(Self(()))
    }
}

impl RandomSource for OsRandom {
    fn random_string(&self, length: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}
