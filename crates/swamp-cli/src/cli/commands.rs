//! Command builders for the CLI.
//!
//! `build` is also the default: a bare `swamp` builds the current directory.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("swamp")
        .about("Compiler for the Swamp language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(output_arg())
        .arg(disable_style_arg())
        .arg(verbose_arg())
        .subcommand(build_command())
        .subcommand(fmt_command())
        .subcommand(lsp_command())
        .subcommand(version_command())
}

/// Type check a solution or package and write its type information.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Type check a solution or package and write its pack")
        .override_usage(
            "\
  swamp build [PATH]
  swamp build [PATH] -o <FILE>",
        )
        .after_help(
            r#"EXAMPLES:
  swamp build                      # solution.toml or package in the current directory
  swamp build games/arcade         # package directory
  swamp build solution.toml        # solution file
  swamp build -o build/game.pack   # custom output file"#,
        )
        .arg(path_arg())
}

/// Format source files.
pub fn fmt_command() -> Command {
    Command::new("fmt")
        .about("Format source files")
        .arg(fmt_path_arg())
}

/// Start the language server.
pub fn lsp_command() -> Command {
    Command::new("lsp").about("Start the language server on stdio")
}

/// Print the compiler version.
pub fn version_command() -> Command {
    Command::new("version").about("Print the compiler version")
}
