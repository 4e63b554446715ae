use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use ome_cli::{emit, inspect, load_config, roundtrip};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("omegraph")
        .version(ome_model::VERSION)
        .about("Materialize OME element trees into a linked object graph")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON or YAML model configuration"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless RUST_LOG is set"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Materialize a document and report on its references")
                .arg(
                    Arg::new("document")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Tree document (.json, .yaml)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Materialize a document and render it back")
                .arg(
                    Arg::new("document")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Tree document (.json, .yaml)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of stdout"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("inspect", args)) => {
            let document = args.get_one::<PathBuf>("document").context("document is required")?;
            let summary = inspect(document, &config)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.to_text());
            }
        }
        Some(("roundtrip", args)) => {
            let document = args.get_one::<PathBuf>("document").context("document is required")?;
            let tree = roundtrip(document, &config)?;
            let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);
            if let Some(text) = emit(&tree, output)? {
                println!("{text}");
            }
        }
        other => anyhow::bail!("unknown subcommand {other:?}"),
    }

    Ok(())
}
