use std::env;

use anyhow::Context as _;
use argot::{LoadedArguments, Parser, Schema, UnknownArguments};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Schema)]
struct Arguments {
    #[arg("-v,--verbose")]
    verbose: bool,

    #[arg("-n,--dry-run")]
    dry_run: bool,

    #[arg("-j,--jobs")]
    jobs: i64,

    #[arg("--exclude,-x")]
    exclude: Vec<String>,

    #[arg("--retry")]
    retries: Vec<i64>,

    #[arg("positional,required")]
    source: String,

    #[arg("positional")]
    destination: String,

    #[arg("positional")]
    extra: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ARGOT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let parser = match env::var_os("ARGOT_SKIP_UNKNOWN") {
        Some(_) => Parser::new().unknown_arguments(UnknownArguments::Skip),
        None => Parser::new(),
    };

    let arguments = LoadedArguments::from_env();
    let program = arguments
        .argv0()
        .map(|argv0| argv0.to_string_lossy().into_owned())
        .unwrap_or_else(|| "argot-demo".to_owned());

    let mut parsed = Arguments {
        jobs: 1,
        ..Arguments::default()
    };

    arguments
        .parse_into(&parser, &mut parsed)
        .with_context(|| format!("{program}: failed to parse command line"))?;

    tracing::info!(?parser, "parsed arguments");
    println!("{parsed:#?}");

    Ok(())
}
