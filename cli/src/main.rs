mod cli;
mod error;
mod output;

use std::fs;
use std::io::{self, Read};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use visitgen_compiler::{compile_registry_to_c, compile_schema};

use crate::{
    cli::Cli,
    error::{CliError, ExitCode},
    output::StagedOutputs,
};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_schema(cli: &Cli) -> Result<(String, String), CliError> {
    match &cli.input {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            Ok((path.display().to_string(), text))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| CliError::io("<stdin>", e))?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let (source_name, text) = read_schema(cli)?;
    debug!(input = %source_name, bytes = text.len(), "read schema");

    let registry = compile_schema(&text).map_err(|source| CliError::Generate { source_name, source })?;

    if cli.dump_registry {
        println!("{}", serde_json::to_string_pretty(&registry)?);
        return Ok(());
    }

    let options = cli.generator_options();
    let code = compile_registry_to_c(&registry, &options);

    let mut outputs = StagedOutputs::new(&cli.output_dir)?;
    if cli.wants_source() {
        outputs.stage(&options.source_file(), &code.definitions)?;
    }
    if cli.wants_header() {
        outputs.stage(&options.header_file(), &code.declarations)?;
    }
    outputs.commit()?;
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version arrive here too, on stdout.
            let code = if err.use_stderr() { ExitCode::InvalidArguments } else { ExitCode::Success };
            let _ = err.print();
            std::process::exit(code as i32);
        }
    };
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => std::process::exit(ExitCode::Success as i32),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}
