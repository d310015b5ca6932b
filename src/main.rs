use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use festival_lineup::config::{load_catalog, load_settings};
use festival_lineup::display::{render_grid, render_list, write_schedule_to_file};
use festival_lineup::export::export_schedule_csv;
use festival_lineup::parser::{import_roster, load_roster_csv};
use festival_lineup::store::{FileStore, KeyValueStore};
use festival_lineup::web;
use festival_lineup::{Action, Outcome, Session};

#[derive(Parser)]
#[command(name = "festival-lineup", about = "Plan which act plays which stage and when")]
struct Cli {
    /// Settings file (defaults to ./festival.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the saved lineup
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the planner UI and JSON API
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    #[command(flatten)]
    Local(LocalCommand),
}

/// Commands applied directly to the saved lineup
#[derive(Subcommand)]
enum LocalCommand {
    /// Print the stage x time grid
    Grid,
    /// Print scheduled and unscheduled performers
    List,
    /// Add a performer to the roster
    Add { name: String },
    /// Remove a performer and free its slot
    Remove { id: String },
    /// Put a performer into a slot, moving it and displacing any occupant
    Assign {
        id: String,
        #[arg(long)]
        stage: String,
        #[arg(long)]
        time: String,
    },
    /// Take a performer out of its slot
    Unassign { id: String },
    /// Empty a slot
    Clear {
        #[arg(long)]
        stage: String,
        #[arg(long)]
        time: String,
    },
    /// Restore the seed roster and clear the schedule
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Write the schedule as CSV
    Export { path: PathBuf },
    /// Add performers from a roster CSV
    Import { path: PathBuf },
    /// Write the per-stage text schedule
    Write { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    let catalog = load_catalog(&settings)?;
    let store = FileStore::new(settings.data_dir.clone());

    match cli.command {
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or(settings.bind_addr);
            let store: Box<dyn KeyValueStore + Send> = Box::new(store);
            println!("Access the planner at http://{}", bind_addr);
            web::start_server(&bind_addr, Session::open(store, catalog))
                .await
                .with_context(|| format!("server on {bind_addr} failed"))?;
            Ok(())
        }
        Command::Local(command) => run_local(command, Session::open(store, catalog)),
    }
}

fn run_local(command: LocalCommand, mut session: Session<FileStore>) -> anyhow::Result<()> {
    match command {
        LocalCommand::Grid => print!("{}", render_grid(&session.grid())),
        LocalCommand::List => print!("{}", render_list(&session.list())),
        LocalCommand::Add { name } => report(session.apply(Action::AddPerformer { name })?),
        LocalCommand::Remove { id } => report(session.apply(Action::RemovePerformer { id: id.into() })?),
        LocalCommand::Assign { id, stage, time } => report(session.apply(Action::Assign {
            id: id.into(),
            stage,
            time,
        })?),
        LocalCommand::Unassign { id } => report(session.apply(Action::Unassign { id: id.into() })?),
        LocalCommand::Clear { stage, time } => report(session.apply(Action::ClearSlot { stage, time })?),
        LocalCommand::Reset { yes } => {
            let confirmed = yes || confirm_reset()?;
            report(session.apply(Action::Reset { confirmed })?);
        }
        LocalCommand::Export { path } => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            export_schedule_csv(&session.grid(), file)?;
            println!("Schedule exported to {}", path.display());
        }
        LocalCommand::Import { path } => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open '{}'", path.display()))?;
            let rows = load_roster_csv(file)?;
            let summary = import_roster(&mut session, rows);
            println!(
                "Imported {} performers ({} scheduled, {} skipped)",
                summary.added, summary.assigned, summary.skipped
            );
        }
        LocalCommand::Write { path } => {
            write_schedule_to_file(session.catalog(), session.lineup(), &path)
                .map_err(|e| anyhow::anyhow!("failed to write '{}': {}", path.display(), e))?;
            println!("Schedule saved to {}", path.display());
        }
    }

    Ok(())
}

fn confirm_reset() -> anyhow::Result<bool> {
    print!("Reset all data? This will clear your schedule and restore the original artist list. [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Added { id } => println!("Added performer {}", id),
        Outcome::Removed { id, freed } => match freed {
            Some(slot) => println!("Removed {} and freed {}", id, slot),
            None => println!("Removed {}", id),
        },
        Outcome::Assigned { id, slot, displaced } => match displaced {
            Some(prev) => println!("{} now plays {} ({} unscheduled)", id, slot, prev),
            None => println!("{} now plays {}", id, slot),
        },
        Outcome::Unassigned { id, slot } => println!("{} no longer plays {}", id, slot),
        Outcome::SlotCleared { slot, performer } => println!("Cleared {} ({} unscheduled)", slot, performer),
        Outcome::Reset => println!("Lineup reset to the original roster"),
        Outcome::ViewChanged { view } => println!("Showing {} view", view),
        Outcome::Ignored { reason } => println!("Nothing changed: {}", reason),
    }
}
