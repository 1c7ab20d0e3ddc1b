mod jsonwebtoken_codec;
mod jwt_simple_codec;

pub use self::jsonwebtoken_codec::*;
pub use self::jwt_simple_codec::*;

use crate::codec::Codec;
use crate::error::*;
use crate::keys::KeyPair;

/// Every registered codec, in report order.
pub const NAMES: &[&str] = &[
    JsonWebTokenCodec::NAME,
    JsonWebTokenPerCallCodec::NAME,
    JwtSimpleCodec::NAME,
    JwtSimplePerCallCodec::NAME,
];

/// Build the codec registered as `name`.
pub fn by_name(keys: &KeyPair, name: &str) -> Result<Box<dyn Codec>, Error> {
    let codec: Box<dyn Codec> = match name {
        JsonWebTokenCodec::NAME => Box::new(JsonWebTokenCodec::new(keys)?),
        JsonWebTokenPerCallCodec::NAME => Box::new(JsonWebTokenPerCallCodec::new(keys)?),
        JwtSimpleCodec::NAME => Box::new(JwtSimpleCodec::new(keys)?),
        JwtSimplePerCallCodec::NAME => Box::new(JwtSimplePerCallCodec::new(keys)?),
        _ => bail!(BenchError::UnknownCodec(name.to_string())),
    };
    Ok(codec)
}

/// Build every registered codec.
pub fn all(keys: &KeyPair) -> Result<Vec<Box<dyn Codec>>, Error> {
    NAMES.iter().map(|name| by_name(keys, name)).collect()
}

/// Build the codecs named in `names`, or all of them if `names` is empty.
pub fn select<S: AsRef<str>>(keys: &KeyPair, names: &[S]) -> Result<Vec<Box<dyn Codec>>, Error> {
    if names.is_empty() {
        return all(keys);
    }
    names.iter().map(|name| by_name(keys, name.as_ref())).collect()
}
