use std::path::PathBuf;

use clap::{ArgAction, Parser};
use visitgen_compiler::GeneratorOptions;

#[derive(Parser, Debug)]
#[command(name = "visitgen", version)]
#[command(about = "Generate C visitor traversal functions from a schema", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Write the visitor definitions (`<prefix>qapi-visit.c`) only
    #[arg(short = 'c', long)]
    pub source: bool,

    /// Write the visitor declarations (`<prefix>qapi-visit.h`) only
    #[arg(short = 'h', long)]
    pub header: bool,

    /// Prefix for output file names and the types header include
    #[arg(short, long, env = "VISITGEN_PREFIX", default_value = "")]
    pub prefix: String,

    /// Directory receiving the generated files (created if missing)
    #[arg(short, long, env = "VISITGEN_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Schema file (defaults to standard input)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Skip enum typedefs and `_lookup` tables
    #[arg(long)]
    pub no_enum_tables: bool,

    /// Print the resolved type registry as JSON instead of generating code
    #[arg(long)]
    pub dump_registry: bool,

    /// Log pass boundaries to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Neither `--source` nor `--header` means both.
    pub fn wants_source(&self) -> bool {
        self.source || !self.header
    }

    pub fn wants_header(&self) -> bool {
        self.header || !self.source
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            prefix:      self.prefix.clone(),
            enum_tables: !self.no_enum_tables,
        }
    }
}
