//! The 9x9 sweep: every (disposition, intent) of the first party against
//! every (disposition, intent) of the second.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::lock::{AccessIntent, Disposition, Mechanism};
use crate::trial::{self, Isolate, Request};

pub const SIDE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub disposition: Disposition,
    pub intent: AccessIntent,
}

impl Cell {
    /// Chart order: grouped by disposition, then by intent.
    pub fn all() -> impl Iterator<Item = Cell> {
        Disposition::ALL.into_iter().flat_map(|disposition| {
            AccessIntent::ALL
                .into_iter()
                .map(move |intent| Cell { disposition, intent })
        })
    }

    pub fn index(self) -> usize {
        self.disposition as usize * AccessIntent::ALL.len() + self.intent as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub path: PathBuf,
    pub mechanism: Mechanism,
}

impl Party {
    pub fn new(path: impl Into<PathBuf>, mechanism: Mechanism) -> Self {
        Self {
            path: path.into(),
            mechanism,
        }
    }

    pub fn request(&self, cell: Cell) -> Request {
        Request::new(&self.path, cell.intent, cell.disposition, self.mechanism)
    }
}

/// Collects verdicts as the sweep produces them; each cell is set once.
#[derive(Debug, Default)]
pub struct GridBuilder {
    cells: [[Option<bool>; SIDE]; SIDE],
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: Cell, col: Cell, verdict: bool) -> Result<()> {
        let (row, col) = (row.index(), col.index());
        let slot = &mut self.cells[row][col];
        if slot.is_some() {
            return Err(Error::DuplicateCell { row, col });
        }
        *slot = Some(verdict);
        Ok(())
    }

    pub fn finish(self) -> Result<OutcomeGrid> {
        let missing = self.cells.iter().flatten().filter(|c| c.is_none()).count();
        if missing > 0 {
            return Err(Error::IncompleteGrid { missing });
        }
        Ok(OutcomeGrid {
            cells: self.cells.map(|row| row.map(|c| c == Some(true))),
        })
    }
}

/// Verdicts of a complete sweep, indexed by (first party's cell, second
/// party's cell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeGrid {
    cells: [[bool; SIDE]; SIDE],
}

impl OutcomeGrid {
    pub fn from_cells(cells: [[bool; SIDE]; SIDE]) -> Self {
        Self { cells }
    }

    pub fn get(&self, row: Cell, col: Cell) -> bool {
        self.cells[row.index()][col.index()]
    }

    pub fn rows(&self) -> &[[bool; SIDE]; SIDE] {
        &self.cells
    }
}

/// Runs one trial per cell, strictly in chart order.
pub fn sweep<I>(first: &Party, second: &Party, isolate: &I) -> Result<OutcomeGrid>
where
    I: Isolate + ?Sized,
{
    let mut grid = GridBuilder::new();
    for row in Cell::all() {
        let holder = first.request(row);
        for col in Cell::all() {
            let contender = second.request(col);
            let verdict = trial::run(&holder, &contender, isolate)?;
            debug!(
                "{} : {:<36} {:<36}",
                if verdict { " ok " } else { "fail" },
                holder.describe(),
                contender.describe()
            );
            grid.record(row, col, verdict)?;
        }
    }
    grid.finish()
}
