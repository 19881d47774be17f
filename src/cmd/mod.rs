mod generate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reso-erd")]
#[command(version)]
#[command(about = "Derive a Mermaid ERD from the RESO Data Dictionary", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the data dictionary and schema, then write the ERD
    Generate {
        /// Also write a diagram without orphaned (unconnected) entities
        #[arg(long)]
        exclude_orphans: bool,

        /// Output file for the full diagram (default: reso_erd.md)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the orphan-excluded diagram (default: reso_erd_connected.md)
        #[arg(long)]
        connected_output: Option<PathBuf>,

        /// Data dictionary CSV: URL or local path
        #[arg(long)]
        dictionary: Option<String>,

        /// XML schema: URL or local path
        #[arg(long)]
        schema: Option<String>,

        /// Output format: markdown or json (detected from --output if not specified)
        #[arg(short, long)]
        format: Option<String>,

        /// YAML config file for sources, columns and output settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail on ambiguous primary keys or duplicate schema declarations
        #[arg(long)]
        strict: bool,

        /// Preview without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Show progress while downloading
        #[arg(short, long)]
        progress: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the JSON Schema of the JSON output format
    Schema,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Whether info-level logging was requested
    pub fn verbose(&self) -> bool {
        matches!(self.command, Commands::Generate { verbose: true, .. })
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            exclude_orphans,
            output,
            connected_output,
            dictionary,
            schema,
            format,
            config,
            strict,
            dry_run,
            progress,
            verbose,
        } => generate::run(
            exclude_orphans,
            output,
            connected_output,
            dictionary,
            schema,
            format,
            config,
            strict,
            dry_run,
            progress,
            verbose,
        ),
        Commands::Schema => {
            println!("{}", crate::json_schema::erd_schema_json()?);
            Ok(())
        }
        Commands::Completions { shell } => {
            generate_completions(shell, &mut Cli::command(), "reso-erd", &mut io::stdout());
            Ok(())
        }
    }
}
