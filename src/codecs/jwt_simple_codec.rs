use jwt_simple::prelude::*;
use jwt_simple::JWTError;
use serde::{Deserialize, Serialize};

use crate::claims::{ClaimsPayload, UserData};
use crate::codec::Codec;
use crate::error::{BenchError, Error};
use crate::keys::KeyPair;
use crate::token::EncodedToken;

#[derive(Serialize, Deserialize)]
struct UserClaims {
    #[serde(default)]
    data: UserData,
}

fn options() -> VerificationOptions {
    VerificationOptions {
        time_tolerance: Some(Duration::from_secs(0)),
        ..Default::default()
    }
}

fn sign_with(key_pair: &RS256KeyPair, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
    let mut jwt_claims = Claims::with_custom_claims(
        UserClaims {
            data: claims.data.clone(),
        },
        Duration::from_secs(0),
    );
    // Sign the same claim set as the other codecs.
    jwt_claims.issued_at = None;
    jwt_claims.invalid_before = None;
    jwt_claims.expires_at = Some(claims.expires_at);
    let token = key_pair
        .sign(jwt_claims)
        .map_err(|e| BenchError::SigningFailed(e.to_string()))?;
    Ok(token.into())
}

fn verify_with(
    public_key: &RS256PublicKey,
    options: &VerificationOptions,
    token: &EncodedToken,
) -> Result<ClaimsPayload, Error> {
    let jwt_claims = public_key
        .verify_token::<UserClaims>(token.as_str(), Some(options.clone()))
        .map_err(classify)?;
    let expires_at = jwt_claims
        .expires_at
        .ok_or_else(|| BenchError::VerificationFailed("missing exp claim".into()))?;
    Ok(ClaimsPayload {
        data: jwt_claims.custom.data,
        expires_at,
    })
}

fn classify(e: Error) -> BenchError {
    match e.downcast_ref::<JWTError>() {
        Some(JWTError::InvalidSignature) => BenchError::InvalidSignature,
        Some(JWTError::TokenHasExpired) => BenchError::TokenHasExpired,
        Some(
            JWTError::CompactEncodingError
            | JWTError::NotJWT
            | JWTError::HeaderTooLarge
            | JWTError::TokenTooLong,
        ) => BenchError::MalformedToken(e.to_string()),
        Some(_) => BenchError::VerificationFailed(e.to_string()),
        None => BenchError::MalformedToken(e.to_string()),
    }
}

/// `jwt-simple` with keys parsed once, at construction.
pub struct JwtSimpleCodec {
    key_pair: RS256KeyPair,
    public_key: RS256PublicKey,
    options: VerificationOptions,
}

impl JwtSimpleCodec {
    pub const NAME: &'static str = "jwt-simple";

    pub fn new(keys: &KeyPair) -> Result<Self, Error> {
        Ok(JwtSimpleCodec {
            key_pair: RS256KeyPair::from_pem(keys.private_pem())
                .map_err(|_| BenchError::MalformedPrivateKey)?,
            public_key: RS256PublicKey::from_pem(keys.public_pem())
                .map_err(|_| BenchError::MalformedPublicKey)?,
            options: options(),
        })
    }
}

impl Codec for JwtSimpleCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
        sign_with(&self.key_pair, claims)
    }

    fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error> {
        verify_with(&self.public_key, &self.options, token)
    }
}

/// `jwt-simple` rebuilding its keys from PEM inside every call.
pub struct JwtSimplePerCallCodec {
    public_pem: String,
    private_pem: zeroize::Zeroizing<String>,
}

impl JwtSimplePerCallCodec {
    pub const NAME: &'static str = "jwt-simple-per-call";

    pub fn new(keys: &KeyPair) -> Result<Self, Error> {
        Ok(JwtSimplePerCallCodec {
            public_pem: keys.public_pem().to_string(),
            private_pem: zeroize::Zeroizing::new(keys.private_pem().to_string()),
        })
    }
}

impl Codec for JwtSimplePerCallCodec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
        let key_pair =
            RS256KeyPair::from_pem(&self.private_pem).map_err(|_| BenchError::MalformedPrivateKey)?;
        sign_with(&key_pair, claims)
    }

    fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error> {
        let public_key =
            RS256PublicKey::from_pem(&self.public_pem).map_err(|_| BenchError::MalformedPublicKey)?;
        verify_with(&public_key, &options(), token)
    }
}
