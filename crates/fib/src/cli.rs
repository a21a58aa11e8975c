//! Command-line surface and dispatch.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::bundle::{Bundler, run_bundle};
use crate::app::response::{ResponseFileBuilder, run_create_rsp};
use crate::domain::model::{BundleOptions, LanguageFilter, SortMode};
use crate::infra::config::{self, Config};
use crate::infra::console::Console;

#[derive(Debug, Parser)]
#[command(name = "fib", version, about = "Root command for File Bundler CLI", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bundle code files into a single file
    Bundle(BundleArgs),
    /// Create a response file holding a bundle command
    #[command(name = "create-rsp")]
    CreateRsp,
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct BundleArgs {
    /// File path and name for the bundled file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Choose languages (e.g. '.cs .py') or 'all'
    #[arg(short, long, num_args = 1..)]
    pub language: Vec<String>,

    /// Include file source notes in the output
    #[arg(short, long)]
    pub note: bool,

    /// Sort files ('alphabetic', 'language' or 'none')
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Remove empty lines from source files
    #[arg(short, long = "remove_empty_lines")]
    pub remove_empty_lines: bool,

    /// Add author information
    #[arg(short, long)]
    pub author: Option<String>,
}

impl BundleArgs {
    /// Resolve flags against configured defaults; explicit flags win.
    pub fn into_options(self, defaults: &config::Bundle) -> BundleOptions {
        let language = if self.language.is_empty() {
            defaults.language().map(str::to_owned)
        } else {
            Some(self.language.join(" "))
        };
        let sort = self.sort.as_deref().unwrap_or_else(|| defaults.sort());

        BundleOptions {
            output_path: self.output,
            language: LanguageFilter::parse(language.as_deref()),
            include_source_note: self.note || defaults.note(),
            sort: SortMode::from_name(sort),
            remove_empty_lines: self.remove_empty_lines || defaults.remove_empty_lines(),
            author: self.author.or_else(|| defaults.author().map(str::to_owned)),
        }
    }
}

/// Dispatch a parsed command line. Command failures are reported on the console, not returned.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Bundle(args) => {
            let config = load_config();
            let options = args.into_options(&config.bundle);
            tracing::debug!(?options, "resolved bundle options");
            let bundler = Bundler::new().with_ignore_globs(config.ignore.globs);
            run_bundle(&bundler, &options, &mut Console::stdout());
        }
        Commands::CreateRsp => {
            let config = load_config();
            let builder =
                ResponseFileBuilder::new(io::stdin().lock()).with_program(config.response.program);
            run_create_rsp(builder, &mut Console::stdout());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "fib", &mut io::stdout());
        }
    }
    Ok(())
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "ignoring configuration, using defaults");
        Config::default()
    })
}
