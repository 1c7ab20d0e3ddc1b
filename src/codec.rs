use crate::claims::ClaimsPayload;
use crate::error::*;
use crate::token::EncodedToken;

/// A JWT library wrapped for comparison.
///
/// Implementations own the key objects they sign and verify with, built
/// from the shared [`KeyPair`](crate::keys::KeyPair). Every codec uses RS256.
pub trait Codec {
    /// Name used in reports and configuration.
    fn name(&self) -> &'static str;

    /// Serialize `claims` and sign them.
    fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error>;

    /// Check the signature and the expiration of `token`, returning the claims it carries.
    ///
    /// Failures are reported as [`BenchError`] values.
    fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error>;

    /// Sign `claims`, verify the result and check that the recovered claims are unchanged.
    fn round_trip(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
        let token = self.sign(claims)?;
        let recovered = self.verify(&token)?;
        ensure!(&recovered == claims, BenchError::ClaimsMismatch);
        Ok(token)
    }
}
