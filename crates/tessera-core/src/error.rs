//! Error types for the Tessera core.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public image bytes")] InvalidPublicImage,
    #[error("invalid proof bytes")] InvalidProof,
    #[error("proof verification failed on input {index}")] VerificationFailed { index: usize },
    #[error("proof count mismatch: {proofs} proofs for {inputs} inputs")] ProofCountMismatch { proofs: usize, inputs: usize },
    #[error("unsupported guard condition on input {index}")] UnsupportedGuard { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("value overflow")] ValueOverflow,
    #[error("serialization: {0}")] Serialization(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("network mismatch: expected {expected}, got {got}")] NetworkMismatch { expected: String, got: String },
    #[error("address is not pay-to-public-key")] NotPayToPublicKey,
    #[error("unknown network prefix: {0:#04x}")] UnknownNetworkPrefix(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_verification_failed() {
        let e = CryptoError::VerificationFailed { index: 2 };
        assert_eq!(e.to_string(), "proof verification failed on input 2");
    }

    #[test]
    fn display_unknown_prefix() {
        let e = AddressError::UnknownNetworkPrefix(0x20);
        assert_eq!(e.to_string(), "unknown network prefix: 0x20");
    }

    #[test]
    fn display_serialization() {
        assert_eq!(
            TransactionError::Serialization("unexpected end".into()).to_string(),
            "serialization: unexpected end"
        );
    }
}
