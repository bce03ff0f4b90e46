//! # layerconf demo application
//!
//! Parses its arguments against the demo schema, resolves the configuration
//! through every layer and prints it as JSON.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example layerconf_demo
//! cargo run --example layerconf_demo -- --key_02__subkey_01 cli_nested
//! APP_NAME_KEY_00=from_env cargo run --example layerconf_demo
//! cargo run --example layerconf_demo -- --print-mappings
//! RUST_LOG=layerconf=debug cargo run --example layerconf_demo
//! ```
//!
//! The config file is read from `~/.config/app_name/config.json`:
//!
//! ```json
//! { "key_02": { "subkey_02": "file_nested" } }
//! ```

mod config;

use std::process::ExitCode;

use clap::{Arg, ArgAction};
use confique::Config;
use layerconf::{AppConfig, LayerconfError, cli_args_from_matches};
use tracing_subscriber::EnvFilter;

use config::DemoConfig;

fn run() -> Result<(), LayerconfError> {
    let matches = DemoConfig::command()
        .arg(
            Arg::new("print-mappings")
                .long("print-mappings")
                .action(ArgAction::SetTrue)
                .help("Print the config/env mapping table as markdown and exit"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_parser(clap::value_parser!(usize))
                .default_value("4")
                .help("JSON indentation"),
        )
        .get_matches();

    if matches.get_flag("print-mappings") {
        print!("{}", DemoConfig::markdown()?);
        return Ok(());
    }

    let config = DemoConfig::layered()
        .cli_args(cli_args_from_matches(&matches, &DemoConfig::META))
        .load()?;
    let indent = matches.get_one::<usize>("indent").copied().unwrap_or(4);
    println!("{}", config.to_json(indent)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
