//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs are populated from clap
//! - `Into<*Args>` impls bridge dispatch to the command handlers

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use super::args::DEFAULT_OUTPUT;
use crate::commands::build::BuildArgs;
use crate::commands::fmt::FmtArgs;

/// Flags every command accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalParams {
    pub output: PathBuf,
    pub color: ColorChoice,
    pub verbose: bool,
}

impl GlobalParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            output: m
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            color: if m.get_flag("disable_style") {
                ColorChoice::Never
            } else {
                ColorChoice::Auto
            },
            verbose: m.get_flag("verbose"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildParams {
    pub path: PathBuf,
    pub global: GlobalParams,
}

impl BuildParams {
    /// Works on the root matches too, where `build .` is implied.
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            path: m
                .try_get_one::<PathBuf>("path")
                .ok()
                .flatten()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            global: GlobalParams::from_matches(m),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            path: p.path,
            output: p.global.output,
            color: p.global.color.should_colorize(),
            verbose: p.global.verbose,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtParams {
    pub path: PathBuf,
}

impl FmtParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            path: m.get_one::<PathBuf>("path").cloned().unwrap_or_default(),
        }
    }
}

impl From<FmtParams> for FmtArgs {
    fn from(p: FmtParams) -> Self {
        Self { path: p.path }
    }
}
