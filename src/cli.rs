// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::{commands, infra::t, resolve_locale};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(lang) = args.iter().find_map(|arg| arg.strip_prefix("--lang=")) {
        return Some(lang.to_string());
    }
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn build_cli(locale: &str) -> Command {
    Command::new("harness-reporter")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(
                    Arg::new("files")
                        .help(t!("arg_files", locale = locale).to_string())
                        .value_name("FILES")
                        .num_args(0..)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("runner")
                        .short('r')
                        .long("runner")
                        .help(t!("arg_runner", locale = locale).to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("coverage")
                        .long("coverage")
                        .help(t!("arg_coverage", locale = locale).to_string())
                        .value_name("SNAPSHOT")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no-color")
                        .long("no-color")
                        .help(t!("arg_no_color", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Parses the command line and runs the chosen command.
/// Returns the process status for `main`.
pub async fn run() -> Result<u8> {
    // Pre-parse language so that help text is already localized.
    let requested = pre_parse_language();
    let language = resolve_locale(requested.as_deref());
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = commands::run::RunArgs {
                files: run_matches
                    .get_many::<PathBuf>("files")
                    .map(|files| files.cloned().collect())
                    .unwrap_or_default(),
                runner: run_matches.get_one::<String>("runner").cloned(),
                config: run_matches.get_one::<PathBuf>("config").cloned(),
                coverage: run_matches.get_one::<PathBuf>("coverage").cloned(),
                no_color: run_matches.get_flag("no-color"),
                lang: requested,
            };
            commands::run::execute(args).await
        }
        Some(("init", init_matches)) => {
            let cwd = env::current_dir()?;
            commands::init::execute(&cwd, init_matches.get_flag("force"), &language)?;
            Ok(0)
        }
        // `subcommand_required` makes clap exit with usage before reaching here.
        _ => Ok(0),
    }
}
