use crate::domain::ports::TokenGenerator;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

/// Alphanumeric tokens drawn from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTokenGenerator;

impl TokenGenerator for OsTokenGenerator {
    fn generate(&self, size: usize) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(size)
            .map(char::from)
            .collect()
    }
}
