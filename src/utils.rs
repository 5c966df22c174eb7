//! Some utility functions

use std::io::{stdin, stdout, Write};

use crate::board::Board;
use crate::calendar::reminder::ReminderScheduler;
use crate::calendar::task::Task;


/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let reminder = if task.reminder() { "⏰" } else { " " };
    println!("    {}{} {}  {}\t[{}, {}]\t{}",
        completion, reminder,
        task.start().format("%Y-%m-%d %H:%M"),
        task.title(),
        task.priority(), task.category(),
        task.id());
}

/// A debug utility that pretty-prints the reminders that are still waiting to fire
pub fn print_reminders(reminders: &ReminderScheduler) {
    let scheduled = reminders.scheduled();
    if scheduled.is_empty() {
        println!("    (no pending reminder)");
    }
    for (id, fire_at) in scheduled {
        println!("    {}\t{}", fire_at.format("%Y-%m-%d %H:%M"), id);
    }
}

/// A debug utility that pretty-prints a kanban board
pub fn print_board(board: &Board) {
    for (column, cards) in board.columns() {
        println!("{} ({})", column.title(), cards.len());
        for card in cards {
            println!("    [{}] {}\t{} (due {})\t{}", card.priority, card.title, card.assignee, card.due_date, card.id());
        }
    }
}


/// Ask a yes/no question on the terminal. Anything but an explicit "yes" is a "no".
pub fn ask_confirmation(question: &str) -> bool {
    let mut stdout = stdout();
    if let Err(err) = write!(stdout, "{} [y/N] ", question).and_then(|_| stdout.flush()) {
        log::warn!("Unable to write to the terminal: {}", err);
        return false;
    }

    let mut answer = String::new();
    match stdin().read_line(&mut answer) {
        Err(err) => {
            log::warn!("Unable to read the answer: {}", err);
            false
        },
        Ok(_) => is_yes(&answer),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("") == false);
        assert!(is_yes("no") == false);
        assert!(is_yes("yep") == false);
    }
}
