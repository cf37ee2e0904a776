use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pathdict::config::Config;
use pathdict::document::{Tree, Value};
use pathdict::file::loader::{load_file, load_from_stdin};
use pathdict::file::saver::{save_file, to_string};
use pathdict::file::Format;
use pathdict::handle::{GatherAs, Handle};
use pathdict::path::PathMode;

/// pathdict - query and edit nested JSON/YAML documents by path
#[derive(Parser)]
#[command(name = "pathdict")]
#[command(version)]
#[command(about = "Query and edit nested JSON/YAML documents by path", long_about = None)]
struct Cli {
    /// Path separator (default: from config, else "/")
    #[arg(long, global = true)]
    sep: Option<String>,

    /// Treat paths literally: no splitting, no wildcards
    #[arg(long, global = true)]
    raw: bool,

    /// Output format (default: from config, else json)
    #[arg(long, global = true, value_enum)]
    format: Option<Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value at PATH
    Get {
        /// Input file, or "-" for stdin
        file: String,
        /// Path to read (default: the root)
        path: Option<String>,
        /// JSON printed when nothing is at PATH
        #[arg(long)]
        default: Option<String>,
    },
    /// Print every value matching a wildcard PATH
    Gather {
        file: String,
        path: String,
        /// Pair each value with its path
        #[arg(long)]
        with_paths: bool,
        /// Result shape: list or map
        #[arg(long = "as", default_value = "list")]
        shape: GatherAs,
    },
    /// Set VALUE at every path matching PATH
    Set {
        file: String,
        path: String,
        /// JSON value; anything that is not valid JSON is taken as a string
        value: String,
        /// Save the result back to FILE instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Print the sum of the numbers at PATH
    Sum { file: String, path: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(sep) = cli.sep {
        config.separator = sep;
    }
    if cli.raw {
        config.mode = PathMode::Literal;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Command::Get {
            file,
            path,
            default,
        } => {
            let tree = load(&file)?;
            let mut handle = Handle::with_config(&tree, &config);
            let value = handle
                .at(path.unwrap_or_default())
                .one()?
                .get()?;
            let value = match (value, default) {
                (Some(value), _) => value,
                (None, Some(default)) => parse_value(&default),
                (None, None) => bail!("nothing at that path"),
            };
            print(&value, &config)
        }
        Command::Gather {
            file,
            path,
            with_paths,
            shape,
        } => {
            let tree = load(&file)?;
            let mut handle = Handle::with_config(&tree, &config);
            let gathered = handle.at(path).many().gather_as(shape, with_paths)?;
            print(&gathered, &config)
        }
        Command::Set {
            file,
            path,
            value,
            write,
        } => {
            let tree = load(&file)?;
            let mut handle = Handle::with_config(&tree, &config);
            handle.at(path).many().set(parse_value(&value))?;

            if write {
                if file == "-" {
                    bail!("cannot write back to stdin");
                }
                save_file(&file, &tree, &config)
                    .with_context(|| format!("Failed to save {}", file))
            } else {
                print(&tree.snapshot(), &config)
            }
        }
        Command::Sum { file, path } => {
            let tree = load(&file)?;
            let mut handle = Handle::with_config(&tree, &config);
            let total = handle.at(path).many().sum()?;
            println!("{}", total);
            Ok(())
        }
    }
}

fn load(file: &str) -> Result<Tree> {
    if file == "-" {
        load_from_stdin()
    } else {
        load_file(file)
    }
}

fn parse_value(text: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(parsed) => Value::from(parsed),
        Err(_) => Value::from(text),
    }
}

fn print(value: &Value, config: &Config) -> Result<()> {
    print!("{}", to_string(value, config.format, config.indent_size)?);
    Ok(())
}
