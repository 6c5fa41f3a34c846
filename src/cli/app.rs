//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use super::{menu, output};
use crate::storage::{ControllerMode, Format, Session};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(author, version, about = "Personal task planner for the terminal")]
pub struct Cli {
    /// State directory holding the task list and configuration
    #[arg(long, env = "AGENDA_HOME", value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new pending task
    Add {
        /// Task description
        content: String,

        /// Due date in YYYY-MM-DD format
        date: String,
    },

    /// Remove a task by its list position
    Remove {
        /// Position shown in brackets by `list`
        index: usize,

        /// Operate on the finished list instead of the pending one
        #[arg(long)]
        finished: bool,
    },

    /// Edit a task's description and/or date
    Edit {
        /// Position shown in brackets by `list`
        index: usize,

        /// New description (omit to keep the current one)
        #[arg(long)]
        content: Option<String>,

        /// New due date in YYYY-MM-DD format (omit to keep the current one)
        #[arg(long)]
        date: Option<String>,

        /// Operate on the finished list instead of the pending one
        #[arg(long)]
        finished: bool,
    },

    /// Mark a pending task as finished
    Finish {
        /// Position shown in brackets by `list`
        index: usize,
    },

    /// Move a finished task back to pending
    Unfinish {
        /// Position shown in brackets by `list`
        index: usize,
    },

    /// List tasks
    List {
        /// Show the finished list instead of the pending one
        #[arg(long)]
        finished: bool,
    },

    /// Remove every finished task
    Clear,

    /// Show or change the save format
    Config {
        /// New format: native, json or yaml (omit to show the current one)
        format: Option<String>,
    },
}

fn parse_date_arg(input: &str) -> Result<(i32, u32, u32)> {
    menu::parse_date(input)
        .ok_or_else(|| anyhow!("cannot parse date {:?}; use YYYY-MM-DD", input))
}

/// Parses arguments and executes; the entry point called from `main`
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut session = match &cli.dir {
        Some(dir) => Session::open_at(dir)?,
        None => Session::open()?,
    };

    let Some(command) = cli.command else {
        // Bare invocation: behaviour comes from the configuration
        return match session.config().controller {
            ControllerMode::Menu => menu::run(&mut session),
            ControllerMode::List => {
                output::print_tasks(session.store.pending(), false);
                Ok(())
            }
        };
    };

    // One-shot commands persist immediately; there is no later prompt
    match command {
        Commands::Add { content, date } => {
            let (year, month, day) = parse_date_arg(&date)?;
            session.store.new_task(content, year, month, day)?;
            session.save()?;
            println!("Added pending task due {}.", date);
        }

        Commands::Remove { index, finished } => {
            let removed = if finished {
                session.store.remove_finished(index)?
            } else {
                session.store.remove_pending(index)?
            };
            session.save()?;
            println!("Removed \"{}\".", removed.content);
        }

        Commands::Edit {
            index,
            content,
            date,
            finished,
        } => {
            // An explicitly empty --content keeps the description, same as
            // pressing Return in the interactive dialog
            let content = content.filter(|c| !c.is_empty());
            let date = date.as_deref().map(parse_date_arg).transpose()?;

            if finished {
                session.store.edit_finished(index, content, date)?;
            } else {
                session.store.edit_pending(index, content, date)?;
            }
            session.save()?;
            println!("Updated task {}.", index);
        }

        Commands::Finish { index } => {
            session.store.finish(index)?;
            session.save()?;
            println!("Marked task {} as finished.", index);
        }

        Commands::Unfinish { index } => {
            session.store.unfinish(index)?;
            session.save()?;
            println!("Marked task {} as pending.", index);
        }

        Commands::List { finished } => {
            if finished {
                output::print_tasks(session.store.finished(), true);
            } else {
                output::print_tasks(session.store.pending(), false);
            }
        }

        Commands::Clear => {
            session.store.clear_finished();
            session.save()?;
            println!("Wiped finished tasks.");
        }

        Commands::Config { format: None } => {
            println!("Saving in {} format. Available formats:", session.active_format());
            for format in Format::ALL {
                println!("  {:<8} {}", format.name(), format.describe());
            }
        }

        Commands::Config {
            format: Some(name),
        } => {
            let format: Format = name.parse()?;
            session.set_format(format)?;
            // Rewrite the task list in the new format right away
            session.save()?;
            println!("Now saving in {} format.", format);
        }
    }

    Ok(())
}
