use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::ClaimsPayload;
use crate::codec::Codec;
use crate::error::*;
use crate::keys::KeyPair;
use crate::token::EncodedToken;

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation
}

fn sign_with(key: &EncodingKey, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
    let token = encode(&Header::new(Algorithm::RS256), claims, key)
        .map_err(|e| BenchError::SigningFailed(e.to_string()))?;
    Ok(token.into())
}

fn verify_with(
    key: &DecodingKey,
    validation: &Validation,
    token: &EncodedToken,
) -> Result<ClaimsPayload, Error> {
    let data = decode::<ClaimsPayload>(token.as_str(), key, validation).map_err(classify)?;
    Ok(data.claims)
}

fn classify(e: JwtError) -> BenchError {
    match e.kind() {
        ErrorKind::InvalidSignature => BenchError::InvalidSignature,
        ErrorKind::ExpiredSignature => BenchError::TokenHasExpired,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => BenchError::MalformedToken(e.to_string()),
        _ => BenchError::VerificationFailed(e.to_string()),
    }
}

/// `jsonwebtoken` with keys parsed once, at construction.
pub struct JsonWebTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JsonWebTokenCodec {
    pub const NAME: &'static str = "jsonwebtoken";

    pub fn new(keys: &KeyPair) -> Result<Self, Error> {
        Ok(JsonWebTokenCodec {
            encoding_key: EncodingKey::from_rsa_pem(keys.private_pem().as_bytes())
                .map_err(|_| BenchError::MalformedPrivateKey)?,
            decoding_key: DecodingKey::from_rsa_pem(keys.public_pem().as_bytes())
                .map_err(|_| BenchError::MalformedPublicKey)?,
            validation: validation(),
        })
    }
}

impl Codec for JsonWebTokenCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
        sign_with(&self.encoding_key, claims)
    }

    fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error> {
        verify_with(&self.decoding_key, &self.validation, token)
    }
}

/// `jsonwebtoken` rebuilding its keys from PEM inside every call.
pub struct JsonWebTokenPerCallCodec {
    public_pem: String,
    private_pem: zeroize::Zeroizing<String>,
}

impl JsonWebTokenPerCallCodec {
    pub const NAME: &'static str = "jsonwebtoken-per-call";

    pub fn new(keys: &KeyPair) -> Result<Self, Error> {
        Ok(JsonWebTokenPerCallCodec {
            public_pem: keys.public_pem().to_string(),
            private_pem: zeroize::Zeroizing::new(keys.private_pem().to_string()),
        })
    }
}

impl Codec for JsonWebTokenPerCallCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
        let key = EncodingKey::from_rsa_pem(self.private_pem.as_bytes())
            .map_err(|_| BenchError::MalformedPrivateKey)?;
        sign_with(&key, claims)
    }

    fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error> {
        let key = DecodingKey::from_rsa_pem(self.public_pem.as_bytes())
            .map_err(|_| BenchError::MalformedPublicKey)?;
        verify_with(&key, &validation(), token)
    }
}
