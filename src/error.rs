#[allow(unused)]
pub use anyhow::{anyhow, bail, ensure, Error};

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("Key file [{0}] could not be read")]
    KeyFileUnreadable(String),
    #[error("Malformed RSA private key")]
    MalformedPrivateKey,
    #[error("Malformed RSA public key")]
    MalformedPublicKey,
    #[error("Public key does not belong to the private key")]
    KeyPairMismatch,
    #[error("Signing failed: [{0}]")]
    SigningFailed(String),
    #[error("Signature tag didn't verify")]
    InvalidSignature,
    #[error("Token has expired")]
    TokenHasExpired,
    #[error("Malformed token: [{0}]")]
    MalformedToken(String),
    #[error("Verification failed: [{0}]")]
    VerificationFailed(String),
    #[error("Recovered claims differ from the signed claims")]
    ClaimsMismatch,
    #[error("Unknown codec [{0}]")]
    UnknownCodec(String),
    #[error("Unknown operation [{0}]")]
    UnknownOperation(String),
    #[error("Invalid configuration: [{0}]")]
    InvalidConfig(String),
}
