//! cellgpt - drive the spreadsheet functions from a terminal.
//!
//! Handy for checking a config file or an API key without a spreadsheet
//! host. Grids are passed as JSON and printed as tab-separated rows.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cellgpt::{
    CellGpt, CellValue, CompletionOptions, CompletionResult, Config, FilePropertyStore,
    MemoryPropertyStore, PromptValue, PropertyStore, Shaped,
};

/// LLM completion functions for spreadsheet cells
#[derive(Parser)]
#[command(name = "cellgpt")]
#[command(version = cellgpt::PKG_VERSION)]
#[command(about = "Run cellgpt completion functions from the command line")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key to use instead of the credentials file.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Complete one or more prompts (each prompt becomes one row)
    Complete {
        /// Prompt text
        prompts: Vec<String>,
        /// Grid of prompts as JSON, e.g. '[["a","b"],["c","d"]]'
        #[arg(long, conflicts_with = "prompts")]
        grid: Option<String>,
        /// Model override (ignored with --basic/--advanced)
        #[arg(short, long)]
        model: Option<String>,
        /// Maximum completion tokens
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,
        /// Use the fixed low-cost model
        #[arg(long, conflicts_with = "advanced")]
        basic: bool,
        /// Use the fixed higher-capability model
        #[arg(long)]
        advanced: bool,
    },

    /// List models available to the API key
    Models,

    /// Store the API key in the credentials file (empty string clears it)
    SetKey {
        /// API key
        key: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(version = %cellgpt::version_string(), "starting");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_formula_error());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> cellgpt::Result<()> {
    let config = Config::load(args.config.as_deref())?;

    let file_store = FilePropertyStore::default_location();
    let credentials: Arc<dyn PropertyStore> = match (&args.command, args.api_key) {
        // set-key always writes to the credentials file
        (Command::SetKey { .. }, _) | (_, None) => match file_store {
            Some(store) => Arc::new(store),
            None => Arc::new(MemoryPropertyStore::new()),
        },
        (_, Some(key)) => Arc::new(MemoryPropertyStore::with_api_key(key)),
    };

    let gpt = CellGpt::builder()
        .config(config)
        .credentials(credentials)
        .build()?;

    match args.command {
        Command::Complete {
            prompts,
            grid,
            model,
            max_tokens,
            temperature,
            basic,
            advanced,
        } => {
            let prompt = prompt_value(prompts, grid)?;
            let options = CompletionOptions {
                model,
                max_tokens,
                temperature,
            };
            let output = if advanced {
                gpt.gpt_advanced(&prompt, &options)?
            } else if basic {
                gpt.gpt_basic(&prompt, &options)?
            } else {
                gpt.gpt(&prompt, &options)?
            };
            print_shaped(&output, CompletionResult::as_str);
        }

        Command::Models => {
            let models = gpt.models()?;
            print_shaped(&models, String::as_str);
        }

        Command::SetKey { key } => {
            let status = gpt.set_api_key(&key)?;
            println!("{status}");
            if !status.is_success() {
                return Err(cellgpt::CellGptError::AuthenticationFailed);
            }
        }
    }

    Ok(())
}

/// Positional prompts become a one-column grid (a single one stays scalar).
fn prompt_value(mut prompts: Vec<String>, grid: Option<String>) -> cellgpt::Result<PromptValue> {
    if let Some(json) = grid {
        let value: PromptValue = serde_json::from_str(&json)?;
        value.validate()?;
        return Ok(value);
    }
    match prompts.len() {
        0 => Ok(PromptValue::Scalar(CellValue::Empty)),
        1 => Ok(PromptValue::scalar(prompts.remove(0))),
        _ => PromptValue::grid(prompts.into_iter().map(|p| vec![p.into()]).collect()),
    }
}

fn print_shaped<T>(value: &Shaped<T>, text: fn(&T) -> &str) {
    match value {
        Shaped::Scalar(cell) => println!("{}", text(cell)),
        Shaped::Grid(rows) => {
            for row in rows {
                let line: Vec<&str> = row.iter().map(text).collect();
                println!("{}", line.join("\t"));
            }
        }
    }
}
