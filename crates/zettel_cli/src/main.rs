//! `zettel` command-line entry point.
//!
//! # Responsibility
//! - Map each subcommand to one `zettel_core` use-case and print its result.
//! - Resolve the notes directory and logging setup from flags or env.
//!
//! # Exit status
//! - `0` on success.
//! - `1` when the operation fails (message on stderr).
//! - `2` for an unknown subcommand or wrong arguments (clap usage error).

use clap::{Args, Parser, Subcommand};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use zettel_core::{
    default_log_level, init_logging, FsNoteDirectory, ListQuery, ListView, NoteService, Order,
};

/// Level used when logging to stderr without an explicit `--log-level`.
const STDERR_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "zettel")]
#[command(version, about = "Allocate note identifiers and list note outlines")]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the note files
    #[arg(long, env = "ZETTEL_DIR", default_value = ".", global = true)]
    dir: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "ZETTEL_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (default: stderr)
    #[arg(long, env = "ZETTEL_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct ListArgs {
    /// Only list notes whose filename starts with this prefix
    prefix: Option<String>,

    /// Print the outline bottom-to-top
    #[arg(long)]
    reverse: bool,

    /// Print the sorted records as JSON instead of an outline
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the next free identifier under PARENT (`/` for top level)
    NextId {
        /// Parent identifier, note filename, or `/`
        parent: String,
    },

    /// Print a new note filename under PARENT titled by WORDS
    GenerateFilename {
        /// Parent identifier, note filename, or `/`
        parent: String,

        /// Tags and description words
        words: Vec<String>,
    },

    /// Move a note to another identifier at the same depth
    Rename {
        /// Existing note filename
        filename: String,

        /// New identifier
        identifier: String,
    },

    /// Outline in identifier order, grouped by top-level note
    ListByUid(ListArgs),

    /// Outline in last-modified order, grouped by date
    ListByLastModified(ListArgs),

    /// Outline in priority order, grouped by priority marker
    ListByPriority(ListArgs),

    /// Outline in header-tag order, grouped by tag set
    ListByTags {
        #[command(flatten)]
        list: ListArgs,

        /// Only list notes whose header carries this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = setup_logging(&cli) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<(), String> {
    let level = match (&cli.log_level, &cli.log_dir) {
        (Some(level), _) => level.as_str(),
        (None, Some(_)) => default_log_level(),
        (None, None) => STDERR_LOG_LEVEL,
    };
    init_logging(level, cli.log_dir.as_deref())
}

fn run(cli: Cli) -> Result<String, Box<dyn Error>> {
    let service = NoteService::new(FsNoteDirectory::new(cli.dir));

    let output = match cli.command {
        Commands::NextId { parent } => service.next_identifier(&parent)?.to_string(),
        Commands::GenerateFilename { parent, words } => {
            service.generate_filename(&parent, words.as_slice())?
        }
        Commands::Rename {
            filename,
            identifier,
        } => service.rename_note(&filename, &identifier)?,
        Commands::ListByUid(list) => render_list(&service, ListView::ByIdentifier, list)?,
        Commands::ListByLastModified(list) => {
            render_list(&service, ListView::ByLastModified, list)?
        }
        Commands::ListByPriority(list) => render_list(&service, ListView::ByPriority, list)?,
        Commands::ListByTags { list, tags } => {
            render_list(&service, ListView::ByHeaderTags(tags), list)?
        }
    };
    Ok(output)
}

fn render_list(
    service: &NoteService<FsNoteDirectory>,
    view: ListView,
    args: ListArgs,
) -> Result<String, Box<dyn Error>> {
    let query = list_query(view, &args);
    if args.json {
        let records = service.list_records(&query)?;
        return Ok(serde_json::to_string_pretty(&records)?);
    }
    Ok(service.list_arranged(&query)?)
}

fn list_query(view: ListView, args: &ListArgs) -> ListQuery {
    let order = if args.reverse {
        Order::Reverse
    } else {
        Order::Forward
    };
    let query = ListQuery::new(view).with_order(order);
    match &args.prefix {
        Some(prefix) => query.with_prefix(prefix.as_str()),
        None => query,
    }
}
