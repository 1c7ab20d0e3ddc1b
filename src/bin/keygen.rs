//! Writes a fresh RSA key pair to the paths the benchmark reads.
//!
//! cargo run --bin keygen
//! JWT_BENCH_PUBLIC_KEY=/tmp/pub.pem JWT_BENCH_PRIVATE_KEY=/tmp/priv.pem cargo run --bin keygen

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use env_logger::Env;
use jwt_bench::error::{anyhow, ensure};
use jwt_bench::prelude::*;
use jwt_simple::prelude::RS256KeyPair;
use zeroize::Zeroizing;

const MODULUS_BITS: usize = 2048;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    for path in [&config.public_key_path, &config.private_key_path] {
        ensure!(!path.exists(), "{} already exists", path.display());
    }
    let key_pair = RS256KeyPair::generate(MODULUS_BITS)?;
    let private_pem = Zeroizing::new(key_pair.to_pem()?);
    let public_pem = key_pair.public_key().to_pem()?;

    // Refuse to produce a pair the benchmark would reject.
    let keys = KeyPair::from_pem(&public_pem, &private_pem)?;

    write_new(&config.private_key_path, private_pem.as_bytes())?;
    write_new(&config.public_key_path, public_pem.as_bytes())?;
    log::info!(
        "Wrote {MODULUS_BITS}-bit key pair to {} and {} (fingerprint {})",
        config.public_key_path.display(),
        config.private_key_path.display(),
        keys.fingerprint()
    );
    Ok(())
}

fn write_new(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| anyhow!("{}: {e}", path.display()))?;
    file.write_all(contents)?;
    Ok(())
}
