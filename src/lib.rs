#![forbid(unsafe_code)]

pub mod claims;
pub mod codec;
pub mod codecs;
pub mod config;
pub mod driver;
pub mod error;
pub mod keys;
pub mod token;

mod serde_additions;

pub use coarsetime;

pub mod prelude {
    pub use crate::claims::*;
    pub use crate::codec::*;
    pub use crate::codecs::{
        self, JsonWebTokenCodec, JsonWebTokenPerCallCodec, JwtSimpleCodec, JwtSimplePerCallCodec,
    };
    pub use crate::config::Config;
    pub use crate::driver::*;
    pub use crate::error::{BenchError, Error};
    pub use crate::keys::{self, KeyPair};
    pub use crate::token::*;
    pub use coarsetime::{self, Clock, Duration, UnixTimeStamp};
}
