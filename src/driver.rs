use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use benchmark_simple::{Bench, Options};
use coarsetime::Duration;

use crate::claims::{ClaimsPayload, DEFAULT_VERIFY_TOKEN_LIFETIME_SECS};
use crate::codec::Codec;
use crate::config::Config;
use crate::error::*;

/// What a timed loop iteration does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Refresh the expiration and sign the payload
    Sign,
    /// Verify a long-lived token signed before the loop started
    Verify,
    /// Refresh, sign and verify in a single iteration
    RoundTrip,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Sign, Operation::Verify, Operation::RoundTrip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::RoundTrip => "round-trip",
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BenchError::UnknownOperation(s.to_string()).into())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of benchmarking one operation of one codec.
#[derive(Debug)]
pub struct Measurement {
    pub codec: &'static str,
    pub operation: Operation,
    /// Formatted throughput, or the error that aborted the measurement
    pub outcome: Result<String, Error>,
}

impl Measurement {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&BenchError> {
        self.outcome.as_ref().err()?.downcast_ref::<BenchError>()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(throughput) => write!(f, "{} - {}: {}", self.codec, self.operation, throughput),
            Err(e) => write!(f, "{} - {}: FAILED ({})", self.codec, self.operation, e),
        }
    }
}

/// Runs codecs through timed loops, one benchmark at a time.
pub struct Driver {
    bench: Bench,
    options: Options,
    token_lifetime: Duration,
    verify_token_lifetime: Duration,
}

impl Driver {
    pub fn new(config: &Config) -> Self {
        Self::with_options(config.options(), config.token_lifetime)
            .with_verify_token_lifetime(config.verify_token_lifetime)
    }

    pub fn with_options(options: Options, token_lifetime: Duration) -> Self {
        Driver {
            bench: Bench::new(),
            options,
            token_lifetime,
            verify_token_lifetime: Duration::from_secs(DEFAULT_VERIFY_TOKEN_LIFETIME_SECS),
        }
    }

    /// Validity window of the token checked by verification loops.
    ///
    /// It must outlast the whole loop, which usually runs far longer than
    /// the lifetime of the tokens signed per iteration.
    pub fn with_verify_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.verify_token_lifetime = lifetime;
        self
    }

    /// Benchmark every operation of every codec, in order.
    pub fn run_all(&self, codecs: &[Box<dyn Codec>], operations: &[Operation]) -> Vec<Measurement> {
        let mut measurements = Vec::with_capacity(codecs.len() * operations.len());
        for codec in codecs {
            for &operation in operations {
                measurements.push(self.run(codec.as_ref(), operation));
            }
        }
        measurements
    }

    /// Benchmark a single operation.
    ///
    /// A failing preflight round trip skips the timed loop. A failure inside
    /// the loop stops the work for the remaining iterations. Both are reported
    /// in the returned measurement and never retried.
    pub fn run(&self, codec: &dyn Codec, operation: Operation) -> Measurement {
        log::debug!("{} - {}: starting", codec.name(), operation);
        let outcome = self.measure(codec, operation);
        if let Err(e) = &outcome {
            log::error!("{} - {}: {}", codec.name(), operation, e);
        }
        Measurement {
            codec: codec.name(),
            operation,
            outcome,
        }
    }

    fn measure(&self, codec: &dyn Codec, operation: Operation) -> Result<String, Error> {
        let lifetime = self.token_lifetime;
        let claims = ClaimsPayload::sample(lifetime);
        codec.round_trip(&claims)?;

        let claims = RefCell::new(claims);
        let failure = RefCell::new(None);
        let res = match operation {
            Operation::Sign => self.bench.run(&self.options, || {
                guarded(&failure, || {
                    let mut claims = claims.borrow_mut();
                    claims.refresh(lifetime);
                    codec.sign(&claims)
                })
            }),
            Operation::Verify => {
                let token = codec.round_trip(&ClaimsPayload::sample(self.verify_token_lifetime))?;
                self.bench.run(&self.options, || {
                    guarded(&failure, || codec.verify(&token))
                })
            }
            Operation::RoundTrip => self.bench.run(&self.options, || {
                guarded(&failure, || {
                    let mut claims = claims.borrow_mut();
                    claims.refresh(lifetime);
                    codec.round_trip(&claims)
                })
            }),
        };
        if let Some(e) = failure.into_inner() {
            return Err(e);
        }
        Ok(res.throughput(1).to_string())
    }
}

fn guarded<T>(
    failure: &RefCell<Option<Error>>,
    op: impl FnOnce() -> Result<T, Error>,
) -> Option<T> {
    if failure.borrow().is_some() {
        return None;
    }
    match op() {
        Ok(v) => Some(v),
        Err(e) => {
            *failure.borrow_mut() = Some(e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::EncodedToken;
    use std::cell::Cell;

    fn quick_options() -> Options {
        Options {
            iterations: 3,
            warmup_iterations: 1,
            min_samples: 2,
            max_samples: 3,
            max_rsd: 100.0,
            ..Default::default()
        }
    }

    /// Echoes the payload as JSON; verification starts failing after `fail_after` calls.
    struct ScriptedCodec {
        verified: Cell<usize>,
        fail_after: usize,
    }

    impl Codec for ScriptedCodec {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
            Ok(serde_json::to_string(claims)?.into())
        }

        fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error> {
            let n = self.verified.get();
            self.verified.set(n + 1);
            ensure!(n < self.fail_after, BenchError::InvalidSignature);
            Ok(serde_json::from_str(token.as_str())?)
        }
    }

    fn scripted(fail_after: usize) -> ScriptedCodec {
        ScriptedCodec {
            verified: Cell::new(0),
            fail_after,
        }
    }

    #[test]
    fn operation_names() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(" Round-Trip ".parse::<Operation>().unwrap(), Operation::RoundTrip);
        assert!("decrypt".parse::<Operation>().is_err());
    }

    #[test]
    fn measures_a_working_codec() {
        let driver = Driver::with_options(quick_options(), Duration::from_secs(60));
        let codec = scripted(usize::MAX);
        let measurements = driver.run_all(&[Box::new(codec) as Box<dyn Codec>], &Operation::ALL);
        assert_eq!(measurements.len(), 3);
        for m in &measurements {
            assert!(m.is_success(), "{m}");
            assert_eq!(m.codec, "scripted");
            assert!(m.to_string().starts_with(&format!("scripted - {}: ", m.operation)));
        }
    }

    #[test]
    fn preflight_failure_skips_the_loop() {
        let driver = Driver::with_options(quick_options(), Duration::from_secs(60));
        let codec = scripted(0);
        let m = driver.run(&codec, Operation::Sign);
        assert!(!m.is_success());
        assert!(matches!(m.error(), Some(BenchError::InvalidSignature)));
        assert_eq!(codec.verified.get(), 1);
        assert!(m.to_string().contains("FAILED"));
    }

    /// Delegates to a real codec, slowing verification down.
    struct SlowVerify<C>(C);

    impl<C: Codec> Codec for SlowVerify<C> {
        fn name(&self) -> &'static str {
            self.0.name()
        }

        fn sign(&self, claims: &ClaimsPayload) -> Result<EncodedToken, Error> {
            self.0.sign(claims)
        }

        fn verify(&self, token: &EncodedToken) -> Result<ClaimsPayload, Error> {
            std::thread::sleep(std::time::Duration::from_millis(400));
            self.0.verify(token)
        }
    }

    #[test]
    fn verify_loop_outlasts_the_signing_lifetime() {
        let keys = crate::keys::KeyPair::from_pem(
            include_str!("../tests/fixtures/public.pem"),
            include_str!("../tests/fixtures/private.pem"),
        )
        .unwrap();
        let codec = SlowVerify(crate::codecs::JwtSimpleCodec::new(&keys).unwrap());
        let driver = Driver::with_options(quick_options(), Duration::from_secs(1));

        let start = std::time::Instant::now();
        let m = driver.run(&codec, Operation::Verify);
        assert!(m.is_success(), "{m}");
        // well past the expiry of a token signed with the 1 s lifetime
        assert!(start.elapsed() > std::time::Duration::from_secs(2));
    }

    #[test]
    fn loop_failure_is_reported_once() {
        let driver = Driver::with_options(quick_options(), Duration::from_secs(60));
        let codec = scripted(3);
        let m = driver.run(&codec, Operation::Verify);
        assert!(matches!(m.error(), Some(BenchError::InvalidSignature)));
        // preflight, loop token check, one successful iteration, then the failing one
        assert_eq!(codec.verified.get(), 4);
    }
}
