//! Clap adapter for layerconf.
//!
//! This module is the **optional integration layer** between layerconf's
//! parser-agnostic core and the [clap](https://docs.rs/clap) CLI parser. It is
//! compiled only when the `clap` Cargo feature is enabled (on by default).
//!
//! [`build_command`] turns a schema into a `clap::Command` with one
//! `--<path>` option per leaf, nested levels joined by `__`:
//!
//! ```text
//! --key_00 <VALUE>              Set key_00
//! --key_02__subkey_01 <VALUE>   Set key_02.subkey_01
//! ```
//!
//! Options have no clap-side defaults, so an option the user didn't pass comes
//! back as `None` from [`cli_args_from_matches`] and never hides a value from a
//! lower layer. The returned command is an ordinary `clap::Command`: add your
//! own arguments or subcommands to it before parsing; they are ignored when the
//! config mapping is extracted.

use clap::{Arg, ArgAction, ArgMatches, Command};
use confique::meta::Meta;

use crate::names::cli_flag;
use crate::paths::collect_paths;

/// Build a parser with one optional string option per config path.
pub fn build_command(app_name: &str, meta: &Meta) -> Command {
    let args = collect_paths(meta).into_iter().map(|path| {
        let flag = cli_flag(&path);
        Arg::new(flag.clone())
            .long(flag)
            .value_name("VALUE")
            .action(ArgAction::Set)
            .help(format!("Set {path}"))
    });
    Command::new(app_name.to_string())
        .about(format!("{app_name} Configuration"))
        .args(args)
}

/// Extract the flat `dotted_path → value` mapping from parsed matches.
///
/// Every config path appears once, `None` when the option was not given.
/// Arguments that aren't config options are ignored.
pub fn cli_args_from_matches(matches: &ArgMatches, meta: &Meta) -> Vec<(String, Option<String>)> {
    collect_paths(meta)
        .into_iter()
        .map(|path| {
            let value = matches
                .try_get_one::<String>(&cli_flag(&path))
                .ok()
                .flatten()
                .cloned();
            (path, value)
        })
        .collect()
}
