//! Candidate short code generation
//!
//! Candidates are drawn uniformly from `[A-Za-z0-9]` with the thread-local
//! CSPRNG. Nothing here checks uniqueness: collisions are resolved by the
//! allocator against the store.

use crate::errors::{Result, UrlVaultError};
use crate::utils::generate_random_code;

pub const MIN_CODE_LENGTH: usize = 10;
pub const MAX_CODE_LENGTH: usize = 15;

/// A code length inside the allowed `[10, 15]` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeLength(usize);

impl CodeLength {
    pub const MIN: CodeLength = CodeLength(MIN_CODE_LENGTH);
    pub const MAX: CodeLength = CodeLength(MAX_CODE_LENGTH);

    pub fn new(length: usize) -> Result<Self> {
        if (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            Ok(CodeLength(length))
        } else {
            Err(UrlVaultError::invalid_format(format!(
                "Length must be between {} and {}, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, length
            )))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Next length up, or `None` once the maximum is reached.
    pub fn escalate(self) -> Option<CodeLength> {
        (self.0 < MAX_CODE_LENGTH).then(|| CodeLength(self.0 + 1))
    }
}

impl Default for CodeLength {
    fn default() -> Self {
        CodeLength::MIN
    }
}

impl std::fmt::Display for CodeLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn generate_candidate(length: CodeLength) -> String {
    generate_random_code(length.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_bounds() {
        assert!(CodeLength::new(9).is_err());
        assert!(CodeLength::new(16).is_err());
        assert_eq!(CodeLength::new(10).unwrap().get(), 10);
        assert_eq!(CodeLength::new(15).unwrap().get(), 15);

        let err = CodeLength::new(0).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_escalate_stops_at_max() {
        let mut length = CodeLength::MIN;
        let mut steps = 0;
        while let Some(next) = length.escalate() {
            length = next;
            steps += 1;
        }
        assert_eq!(length, CodeLength::MAX);
        assert_eq!(steps, MAX_CODE_LENGTH - MIN_CODE_LENGTH);
    }

    #[test]
    fn test_candidate_length_and_alphabet() {
        for len in MIN_CODE_LENGTH..=MAX_CODE_LENGTH {
            let code = generate_candidate(CodeLength::new(len).unwrap());
            assert_eq!(code.len(), len);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_candidates_are_spread() {
        let codes: HashSet<String> = (0..1000)
            .map(|_| generate_candidate(CodeLength::MIN))
            .collect();
        assert_eq!(codes.len(), 1000);
    }
}
