use console_bridge::{BridgeConfig, ConsoleHandle};
use env_logger::{Builder, Env};
use log::error;
use std::env;
use std::process::ExitCode;
use wasm_console::{RunArgs, run};

pub fn main() -> ExitCode {
    // Module output is logged at Info, so show it unless RUST_LOG says otherwise.
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = BridgeConfig::from_env();
    let outcome = RunArgs::parse(env::args().skip(1)).and_then(|args| {
        run(&args, ConsoleHandle::log_console(config.label.clone()), &config)
    });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
