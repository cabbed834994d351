mod cli;
mod commands;

use cli::{BuildParams, FmtParams, GlobalParams, build_cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    let global = match matches.subcommand() {
        Some((_, m)) => GlobalParams::from_matches(m),
        None => GlobalParams::from_matches(&matches),
    };
    init_logging(&global);

    match matches.subcommand() {
        Some(("build", m)) => {
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        Some(("fmt", m)) => {
            let params = FmtParams::from_matches(m);
            commands::fmt::run(params.into());
        }
        Some(("lsp", _)) => commands::lsp::run(),
        Some(("version", _)) => commands::version::run(),
        None => {
            let params = BuildParams::from_matches(&matches);
            commands::build::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` means `debug`.
fn init_logging(global: &GlobalParams) {
    let default = if global.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color.should_colorize())
        .init();
}
