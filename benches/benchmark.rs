use std::process::ExitCode;

use env_logger::Env;
use jwt_bench::prelude::*;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let keys = match keys::global(&config) {
        Ok(keys) => keys,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let codecs = match codecs::select(keys, &config.codecs) {
        Ok(codecs) => codecs,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let driver = Driver::new(&config);
    let measurements = driver.run_all(&codecs, &config.operations);
    for res in &measurements {
        println!("{res}");
    }
    let failed = measurements.iter().filter(|res| !res.is_success()).count();

    if failed > 0 {
        log::warn!("{failed} benchmark(s) failed");
    }
    ExitCode::SUCCESS
}
