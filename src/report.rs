//! Text rendering of an [`OutcomeGrid`].
//!
//! ```text
//!            \     flock
//! sharemode   \   Attempted mode
//! Current mode \  exclusive   | shared      | none
//!                 R   W   RW  | R   W   RW  | R   W   RW
//! exclusive   R   x   x   x     x   x   x     .   .   .
//! ```

use std::fmt;

use crate::lock::{AccessIntent, Disposition, Mechanism};
use crate::matrix::{Cell, OutcomeGrid};

const LABEL_WIDTH: usize = 16;

/// Rows are the first party's cells, columns the second's.
pub struct Chart<'a> {
    grid: &'a OutcomeGrid,
    first: Mechanism,
    second: Mechanism,
}

impl<'a> Chart<'a> {
    pub fn new(grid: &'a OutcomeGrid, first: Mechanism, second: Mechanism) -> Self {
        Self {
            grid,
            first,
            second,
        }
    }
}

fn heading(disposition: Disposition) -> &'static str {
    match disposition {
        Disposition::Exclusive => "exclusive",
        Disposition::Shared => "shared",
        Disposition::None => "none",
    }
}

fn marker(verdict: bool) -> char {
    if verdict { '.' } else { 'x' }
}

impl fmt::Display for Chart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:11}\\     {}", "", self.second)?;
        writeln!(f, "{:<10}  \\   Attempted mode", self.first.as_arg())?;

        write!(f, "{:<LABEL_WIDTH$}", "Current mode \\")?;
        let groups: Vec<String> = Disposition::ALL
            .iter()
            .map(|&d| format!("{:<12}", heading(d)))
            .collect();
        writeln!(f, "{}", groups.join("| ").trim_end())?;

        write!(f, "{:LABEL_WIDTH$}", "")?;
        let intents: String = AccessIntent::ALL
            .iter()
            .map(|i| format!("{:<4}", i.short()))
            .collect();
        let intents = vec![intents; Disposition::ALL.len()];
        writeln!(f, "{}", intents.join("| ").trim_end())?;

        let mut rows = Cell::all().peekable();
        while let Some(row) = rows.next() {
            let group = if row.intent == AccessIntent::ReadOnly {
                heading(row.disposition)
            } else {
                ""
            };
            let mut line = format!("{group:<12}{:<4}", row.intent.short());
            for col in Cell::all() {
                let starts_group = col.intent == AccessIntent::ReadOnly;
                if starts_group && col.disposition != Disposition::Exclusive {
                    line.push_str("  ");
                }
                line.push(marker(self.grid.get(row, col)));
                line.push_str("   ");
            }
            writeln!(f, "{}", line.trim_end())?;

            if let Some(next) = rows.peek() {
                if next.disposition != row.disposition {
                    writeln!(f, "----------")?;
                }
            }
        }
        Ok(())
    }
}
