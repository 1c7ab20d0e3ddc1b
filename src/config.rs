use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use benchmark_simple::Options;
use coarsetime::Duration;

use crate::claims::{DEFAULT_TOKEN_LIFETIME_SECS, DEFAULT_VERIFY_TOKEN_LIFETIME_SECS};
use crate::codecs;
use crate::driver::Operation;
use crate::error::*;

pub const DEFAULT_PUBLIC_KEY_PATH: &str = "./public.key";
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "./private.key";

pub const ENV_PUBLIC_KEY: &str = "JWT_BENCH_PUBLIC_KEY";
pub const ENV_PRIVATE_KEY: &str = "JWT_BENCH_PRIVATE_KEY";
pub const ENV_CODECS: &str = "JWT_BENCH_CODECS";
pub const ENV_OPERATIONS: &str = "JWT_BENCH_OPERATIONS";
pub const ENV_TOKEN_LIFETIME_SECS: &str = "JWT_BENCH_TOKEN_LIFETIME_SECS";
pub const ENV_VERIFY_TOKEN_LIFETIME_SECS: &str = "JWT_BENCH_VERIFY_TOKEN_LIFETIME_SECS";
pub const ENV_ITERATIONS: &str = "JWT_BENCH_ITERATIONS";
pub const ENV_WARMUP_ITERATIONS: &str = "JWT_BENCH_WARMUP_ITERATIONS";
pub const ENV_MIN_SAMPLES: &str = "JWT_BENCH_MIN_SAMPLES";
pub const ENV_MAX_SAMPLES: &str = "JWT_BENCH_MAX_SAMPLES";

/// Benchmark run settings
#[derive(Clone, Debug)]
pub struct Config {
    /// PEM-encoded RSA public key
    pub public_key_path: PathBuf,

    /// PEM-encoded RSA private key
    pub private_key_path: PathBuf,

    /// Codecs to measure, in order. Every registered codec when empty.
    pub codecs: Vec<String>,

    /// Operations to measure for each codec
    pub operations: Vec<Operation>,

    /// Validity window of the tokens signed during the run
    pub token_lifetime: Duration,

    /// Validity window of the single token checked by verification loops.
    /// Must outlast a whole loop.
    pub verify_token_lifetime: Duration,

    pub iterations: u64,
    pub warmup_iterations: u64,
    pub min_samples: usize,
    pub max_samples: usize,

    /// Maximum relative standard deviation, in percent, before sampling stops
    pub max_rsd: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            public_key_path: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            private_key_path: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
            codecs: Vec::new(),
            operations: vec![Operation::Sign, Operation::Verify],
            token_lifetime: Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS),
            verify_token_lifetime: Duration::from_secs(DEFAULT_VERIFY_TOKEN_LIFETIME_SECS),
            iterations: 1000,
            warmup_iterations: 100,
            min_samples: 5,
            max_samples: 10,
            max_rsd: 1.0,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = var(ENV_PUBLIC_KEY) {
            config.public_key_path = PathBuf::from(path);
        }
        if let Some(path) = var(ENV_PRIVATE_KEY) {
            config.private_key_path = PathBuf::from(path);
        }
        if let Some(list) = var(ENV_CODECS) {
            config.codecs = split_list(&list).map(str::to_string).collect();
            for name in &config.codecs {
                ensure!(
                    codecs::NAMES.contains(&name.as_str()),
                    BenchError::UnknownCodec(name.clone())
                );
            }
        }
        if let Some(list) = var(ENV_OPERATIONS) {
            config.operations = split_list(&list)
                .map(Operation::from_str)
                .collect::<Result<_, _>>()?;
        }
        if let Some(secs) = var(ENV_TOKEN_LIFETIME_SECS) {
            config.token_lifetime = Duration::from_secs(parse_number(ENV_TOKEN_LIFETIME_SECS, &secs)?);
        }
        if let Some(secs) = var(ENV_VERIFY_TOKEN_LIFETIME_SECS) {
            config.verify_token_lifetime =
                Duration::from_secs(parse_number(ENV_VERIFY_TOKEN_LIFETIME_SECS, &secs)?);
        }
        if let Some(n) = var(ENV_ITERATIONS) {
            config.iterations = parse_number(ENV_ITERATIONS, &n)?;
        }
        if let Some(n) = var(ENV_WARMUP_ITERATIONS) {
            config.warmup_iterations = parse_number(ENV_WARMUP_ITERATIONS, &n)?;
        }
        if let Some(n) = var(ENV_MIN_SAMPLES) {
            config.min_samples = parse_number(ENV_MIN_SAMPLES, &n)?;
        }
        if let Some(n) = var(ENV_MAX_SAMPLES) {
            config.max_samples = parse_number(ENV_MAX_SAMPLES, &n)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        ensure!(
            self.iterations > 0,
            BenchError::InvalidConfig("iterations must be positive".into())
        );
        ensure!(
            self.min_samples > 0 && self.min_samples <= self.max_samples,
            BenchError::InvalidConfig("samples must satisfy 0 < min <= max".into())
        );
        ensure!(
            self.token_lifetime.as_secs() > 0,
            BenchError::InvalidConfig("token lifetime must be at least one second".into())
        );
        ensure!(
            self.verify_token_lifetime.as_secs() > 0,
            BenchError::InvalidConfig("verify token lifetime must be at least one second".into())
        );
        ensure!(
            !self.operations.is_empty(),
            BenchError::InvalidConfig("no operation selected".into())
        );
        Ok(())
    }

    /// Loop sizing for the benchmark runner.
    pub fn options(&self) -> Options {
        Options {
            iterations: self.iterations,
            warmup_iterations: self.warmup_iterations,
            min_samples: self.min_samples,
            max_samples: self.max_samples,
            max_rsd: self.max_rsd,
            ..Default::default()
        }
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| BenchError::InvalidConfig(format!("{name}={value} is not a number")).into())
}
