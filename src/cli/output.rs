//! Task list rendering
//!
//! Lists print one numbered entry per task, date first, with ANSI marks
//! for overdue and due-today pending tasks. The number in brackets is the
//! positional index the mutation commands and menu dialogs expect; it is
//! only valid until the next mutation.

use chrono::{Local, NaiveDate};

use crate::domain::{Schedule, Task};

const RULE: &str = "================================================================================";

/// Prints a task list. `finished` suppresses the overdue/today marks,
/// which only make sense for pending tasks.
pub fn print_tasks(tasks: &[Task], finished: bool) {
    print_tasks_on(tasks, finished, Local::now().date_naive());
}

fn print_tasks_on(tasks: &[Task], finished: bool, today: NaiveDate) {
    println!("{}", RULE);
    if tasks.is_empty() {
        println!("\t>> No tasks found <<");
        return;
    }

    for (index, task) in tasks.iter().enumerate() {
        print!("[{}]\t{}", index, task.date.format("%d %b %Y, %A:"));
        if !finished {
            if let Some(mark) = schedule_mark(task, today) {
                print!("{}", mark);
            }
        }
        println!();
        println!("  {}", task.content);
        if index + 1 < tasks.len() {
            println!();
        }
    }
}

fn schedule_mark(task: &Task, today: NaiveDate) -> Option<&'static str> {
    match task.schedule(today) {
        Schedule::Overdue => Some(" \x1b[1;31m<< !!OVERDUE!!\x1b[0m"),
        Schedule::Today => Some(" \x1b[1;32m<< Today!\x1b[0m"),
        Schedule::Upcoming => None,
    }
}

/// Prints the rule line that frames menus and lists
pub fn rule() {
    println!("{}", RULE);
}
