//! # Dispatch
//!
//! 1. **Argument Parsing**: clap derive in [`super::setup`]
//! 2. **Logging**: a `tracing-subscriber` writer on stderr, filtered by
//!    `RUST_LOG` or raised with `-v`
//! 3. **Context Setup**: [`mapcfg::init::initialize`] finds the project,
//!    loads configuration and builds the file-backed API
//! 4. **Dispatch**: one API call per subcommand
//! 5. **Output**: [`super::render`] prints the result
//!
//! Errors bubble up as `anyhow::Error`; `main` prints them and exits with 1.

use anyhow::{bail, Context, Result};
use mapcfg::api::MapcfgApi;
use mapcfg::commands::{CmdResult, MessageLevel};
use mapcfg::init::{initialize, InitOptions};
use mapcfg::store::DocumentStore;
use tracing_subscriber::EnvFilter;

use super::render::{render_doctor, render_document_header, render_result};
use super::setup::{parse_cli, Cli, Commands, InsertCommands, OutputFormat, ScopeArgs};

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("cannot read the current directory")?;
    let ctx = initialize(
        &cwd,
        InitOptions {
            document: cli.document.clone(),
            candidates: cli.candidates.clone(),
            force: cli.force,
        },
    )?;
    tracing::debug!(root = %ctx.root.display(), command = ?cli.command, "dispatching");

    dispatch(ctx.api, &cli)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a second init (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch<S: DocumentStore>(mut api: MapcfgApi<S>, cli: &Cli) -> Result<()> {
    let output = cli.output;
    let result = match &cli.command {
        Commands::Flatten { zone, group, query } => {
            api.flatten(zone.as_deref(), group.as_deref(), query.as_deref())?
        }
        Commands::Insert { what } => insert(&mut api, what)?,
        Commands::Remove { zone, ids } => api.remove(zone.as_deref(), ids.as_slice())?,
        Commands::Move {
            id,
            from,
            to,
            group,
            index,
        } => api.move_node(id, from.as_deref(), to.as_deref(), group.as_deref(), *index)?,
        Commands::Toggle { picker, ids } => api.toggle(picker, ids.as_slice())?,
        Commands::Scope(args) => scope(&mut api, args)?,
        Commands::List { picker, query } => api.list(picker, query)?,
        Commands::Resolve { ids } => api.resolve(ids.as_slice())?,
        Commands::Zones { kind } => {
            if output == OutputFormat::Text {
                print!("{}", render_document_header(&api.document()?));
            }
            api.zones(kind.map(Into::into))?
        }
        Commands::Doctor { fix } => {
            let (result, report) = api.doctor(*fix)?;
            print!("{}", render_doctor(&result, &report, output));
            if !report.is_clean() && !result.changed {
                bail!("document has inconsistencies");
            }
            return Ok(());
        }
    };

    print!("{}", render_result(&result, output));
    fail_on_error_messages(&result)
}

fn insert<S: DocumentStore>(api: &mut MapcfgApi<S>, what: &InsertCommands) -> Result<CmdResult> {
    let result = match what {
        InsertCommands::Layer { id, parent, index } => {
            api.insert_layer(id, parent.as_deref(), *index)?
        }
        InsertCommands::Tool {
            tool_type,
            target,
            index,
        } => api.insert_tool(tool_type, target.as_deref(), *index)?,
        InsertCommands::Group {
            id,
            caption,
            parent,
            index,
        } => api.insert_group(id.as_deref(), caption.as_deref(), parent.as_deref(), *index)?,
    };
    Ok(result)
}

fn scope<S: DocumentStore>(api: &mut MapcfgApi<S>, args: &ScopeArgs) -> Result<CmdResult> {
    let result = match &args.picker {
        Some(picker) => api.scope_picker(picker, &args.id, &args.groups)?,
        None => api.scope_item(args.zone.as_deref(), &args.id, &args.groups)?,
    };
    Ok(result)
}

/// Error-level messages were already printed; only the exit code is left.
fn fail_on_error_messages(result: &CmdResult) -> Result<()> {
    let errors = result
        .messages
        .iter()
        .filter(|m| matches!(m.level, MessageLevel::Error))
        .count();
    if errors > 0 {
        bail!("{} error(s) reported", errors);
    }
    Ok(())
}
