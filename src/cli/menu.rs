//! Interactive menu controller
//!
//! Line-based terminal menus over the pending and finished views. Every
//! dialog returns to the view it came from; range and validation errors
//! print a short message and re-show the view instead of terminating.
//! On quit, if the in-memory list diverges from the save file, the user
//! is asked whether to save.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use super::output;
use crate::domain::{StoreError, TaskError};
use crate::storage::{Format, Session};

#[derive(Clone, Copy, PartialEq)]
enum View {
    Pending,
    Finished,
}

const PENDING_OPTS: [(&str, &str); 7] = [
    ("A", "Add new task"),
    ("R", "Remove task"),
    ("E", "Edit task"),
    ("M", "Mark task finished"),
    ("F", "View finished tasks"),
    ("C", "Edit configuration"),
    ("Q", "Quit"),
];

const FINISHED_OPTS: [(&str, &str); 7] = [
    ("W", "Wipe finished tasks"),
    ("R", "Remove task"),
    ("E", "Edit task"),
    ("M", "Mark task pending"),
    ("L", "View pending tasks"),
    ("C", "Edit configuration"),
    ("Q", "Quit"),
];

/// Runs the interactive menu loop until the user quits
pub fn run(session: &mut Session) -> Result<()> {
    println!("  \x1b[1mWelcome to the Agenda task planner!\x1b[0m");

    let mut view = View::Pending;
    loop {
        let choice = match view {
            View::Pending => {
                output::print_tasks(session.store.pending(), false);
                menu(&PENDING_OPTS, "You are viewing pending tasks")?
            }
            View::Finished => {
                output::print_tasks(session.store.finished(), true);
                menu(&FINISHED_OPTS, "You are viewing finished tasks")?
            }
        };

        match (view, choice.as_str()) {
            (View::Pending, "A") => add_dialog(session)?,
            (View::Pending, "R") => with_task(session, |s, i| s.store.remove_pending(i).map(drop))?,
            (View::Pending, "E") => edit_dialog(session, false)?,
            (View::Pending, "M") => with_task(session, |s, i| s.store.finish(i))?,
            (View::Pending, "F") => view = View::Finished,

            (View::Finished, "W") => session.store.clear_finished(),
            (View::Finished, "R") => {
                with_task(session, |s, i| s.store.remove_finished(i).map(drop))?
            }
            (View::Finished, "E") => edit_dialog(session, true)?,
            (View::Finished, "M") => with_task(session, |s, i| s.store.unfinish(i))?,
            (View::Finished, "L") => view = View::Pending,

            (_, "C") => config_dialog(session)?,
            (_, "Q") => return quit(session),

            _ => bad_input()?,
        }
    }
}

/// Prints a titled menu and reads the user's (upper-cased) choice
fn menu(opts: &[(&str, &str)], title: &str) -> Result<String> {
    output::rule();
    println!("{}", title);
    for (key, label) in opts {
        println!("  [{}] {}", key, label);
    }
    Ok(prompt("")?.to_uppercase())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    if read == 0 {
        // Zero bytes means stdin is closed; retrying would loop forever
        bail!("Input ended before the menu was quit");
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Parses a YYYY-MM-DD date with any single-character delimiters
pub(crate) fn parse_date(input: &str) -> Option<(i32, u32, u32)> {
    let year = input.get(0..4)?.parse().ok()?;
    let month = input.get(5..7)?.parse().ok()?;
    let day = input.get(8..10)?.parse().ok()?;
    Some((year, month, day))
}

/// Asks which task to operate on; None when the reply is not a number
fn ask_task() -> Result<Option<usize>> {
    let reply = prompt("Which one? Provide number noted in brackets: ")?;
    match reply.parse() {
        Ok(index) => Ok(Some(index)),
        Err(_) => {
            prompt("That was not a number. Press Return and try again.")?;
            Ok(None)
        }
    }
}

/// Runs a store mutation against a user-chosen index, translating errors
/// into retry messages
fn with_task(
    session: &mut Session,
    op: impl FnOnce(&mut Session, usize) -> Result<(), StoreError>,
) -> Result<()> {
    let Some(index) = ask_task()? else {
        return Ok(());
    };
    match op(session, index) {
        Ok(()) => Ok(()),
        Err(StoreError::OutOfRange { .. }) => bad_task(),
        Err(StoreError::Task(_)) => bad_input(),
    }
}

fn add_dialog(session: &mut Session) -> Result<()> {
    println!("Creating new task. It will be marked as pending.");
    let content = prompt("Task description: ")?;
    let reply = prompt("Date (use \"YYYY-MM-DD\" format or similar with single character delimiters): ")?;

    let Some((year, month, day)) = parse_date(&reply) else {
        return bad_input();
    };
    match session.store.new_task(content, year, month, day) {
        Ok(()) => Ok(()),
        Err(TaskError::EmptyContent | TaskError::InvalidDate { .. }) => bad_input(),
    }
}

fn edit_dialog(session: &mut Session, finished: bool) -> Result<()> {
    let Some(index) = ask_task()? else {
        return Ok(());
    };

    println!("Editing task {}. Enter new values or press Return to leave unchanged", index);
    let content = prompt("Task description: ")?;
    let reply = prompt("Date (use \"YYYY-MM-DD\" format or similar with single character delimiters): ")?;

    // Empty reply keeps the description; an unparseable date keeps the date.
    let content = (!content.is_empty()).then_some(content);
    let date = parse_date(&reply);

    let result = if finished {
        session.store.edit_finished(index, content, date)
    } else {
        session.store.edit_pending(index, content, date)
    };
    match result {
        Ok(()) => Ok(()),
        Err(StoreError::OutOfRange { .. }) => bad_task(),
        Err(StoreError::Task(_)) => bad_input(),
    }
}

fn config_dialog(session: &mut Session) -> Result<()> {
    output::rule();
    println!(
        "The program is currently configured to save in {} format. If you wish to change that, available values are:",
        session.active_format()
    );
    for format in Format::ALL {
        println!("  {:<8} {}", format.name(), format.describe());
    }

    let reply = prompt("New format (press Return to keep the current one): ")?;
    if reply.is_empty() {
        return Ok(());
    }
    match reply.parse::<Format>() {
        Ok(format) => {
            session.set_format(format)?;
            println!("Now saving in {} format.", format);
            Ok(())
        }
        Err(err) => {
            println!("{}", err);
            Ok(())
        }
    }
}

fn quit(session: &mut Session) -> Result<()> {
    if session.changes_detected() {
        println!("Your task list differs from the one on disk. Do you wish to save changes?");
        let choice = prompt("\"N\" for \"No\", any key for \"Yes\": ")?;
        if choice.to_uppercase() != "N" {
            session.save()?;
        }
    }
    Ok(())
}

fn bad_task() -> Result<()> {
    prompt("Task you asked for somehow does not exist. Press Return, check the number and try again.")?;
    Ok(())
}

fn bad_input() -> Result<()> {
    prompt("You entered something we did not expect. Press Return and try again.")?;
    Ok(())
}
