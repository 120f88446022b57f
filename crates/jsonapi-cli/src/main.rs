//! `jsonapi`: inspect a schema registry and check query strings against it

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::CheckOutcome;
use config::CliConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("jsonapi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("JSON:API schema registry tools")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .default_value("jsonapi.toml")
                .value_parser(value_parser!(PathBuf))
                .help("Config file with [encoder] and [[schemas]]"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("types").about("List registered resource types"))
        .subcommand(
            Command::new("paths")
                .about("List include paths of a resource type")
                .arg(Arg::new("type").required(true).help("Resource type"))
                .arg(
                    Arg::new("depth")
                        .long("depth")
                        .value_parser(value_parser!(usize))
                        .help("Expansion depth, at most 8 (defaults to the schema's max depth)"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a query string for a resource type")
                .arg(Arg::new("type").required(true).help("Primary resource type"))
                .arg(
                    Arg::new("query")
                        .required(true)
                        .help("Query string, e.g. 'include=author&fields[posts]=title'"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'m>(args: &'m ArgMatches, name: &str) -> Result<&'m String> {
    args.get_one::<String>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let path = matches
        .get_one::<PathBuf>("config")
        .context("missing --config")?;
    let config = CliConfig::load(path)?;
    let container = config.container()?;

    match matches.subcommand() {
        Some(("types", _)) => {
            for line in commands::list_types(&container) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("paths", args)) => {
            let resource_type = required(args, "type")?;
            let depth = args.get_one::<usize>("depth").copied();
            for path in commands::list_paths(&container, resource_type, depth)? {
                println!("{path}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("check", args)) => {
            let resource_type = required(args, "type")?;
            let query = required(args, "query")?;
            match commands::check_query(&config, &container, resource_type, query)? {
                CheckOutcome::Valid(parameters) => {
                    println!("{}", serde_json::to_string_pretty(&parameters)?);
                    Ok(ExitCode::SUCCESS)
                }
                CheckOutcome::Invalid(document) => {
                    println!("{}", serde_json::to_string_pretty(&document)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(2)
        }
    }
}
