// Crossgrid – An interactive crossword grid
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Positions are always (row, column)
pub type Pos = (u32, u32);

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum Mark {
    #[default]
    Unmarked,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug)]
struct Cell {
    // None for a blocked cell
    solution: Option<char>,
    user: Option<char>,
    result: Mark,
}

#[derive(Debug)]
pub struct Grid {
    cells: Box<[Cell]>,
    width: u32,
    height: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("empty grid")]
    EmptyGrid,
    #[error("row {row} has {found} cells but the grid is {expected} wide")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("cell {row},{col} has more than one letter")]
    LongCell {
        row: usize,
        col: usize,
    },
}

fn parse_cell(s: &str) -> Option<Option<char>> {
    let s = s.trim();
    let mut chars = s.chars();

    match chars.next() {
        None => Some(None),
        Some(ch) => {
            if chars.next().is_some() {
                None
            } else {
                Some(Some(uppercase(ch)))
            }
        },
    }
}

/// Uppercases a single letter. Letters whose uppercase form is more
/// than one character keep only the first one.
pub fn uppercase(ch: char) -> char {
    ch.to_uppercase().next().unwrap_or(ch)
}

impl Grid {
    /// Builds a grid from rows of cell strings as sent by the puzzle
    /// server. An empty or whitespace-only string is a blocked cell.
    pub fn new<R, S>(rows: &[R]) -> Result<Grid, Error>
        where R: AsRef<[S]>,
              S: AsRef<str>
    {
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);

        if width < 1 {
            return Err(Error::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(width * rows.len());

        for (row_num, row) in rows.iter().enumerate() {
            let row = row.as_ref();

            if row.len() != width {
                return Err(Error::RaggedRow {
                    row: row_num,
                    found: row.len(),
                    expected: width,
                });
            }

            for (col_num, value) in row.iter().enumerate() {
                let Some(solution) = parse_cell(value.as_ref())
                else {
                    return Err(Error::LongCell { row: row_num, col: col_num });
                };

                cells.push(Cell {
                    solution,
                    user: None,
                    result: Mark::Unmarked,
                });
            }
        }

        Ok(Grid {
            cells: cells.into_boxed_slice(),
            width: width as u32,
            height: rows.len() as u32,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, row: u32, col: u32) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| (row * self.width + col) as usize)
    }

    fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.index(row, col).map(|index| &self.cells[index])
    }

    fn open_cell_mut(&mut self, row: u32, col: u32) -> Option<&mut Cell> {
        self.index(row, col)
            .map(|index| &mut self.cells[index])
            .filter(|cell| cell.solution.is_some())
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.index(row, col).is_some()
    }

    /// Coordinates outside of the grid count as blocked too so that
    /// navigation can treat both cases the same way.
    pub fn is_blocked(&self, row: u32, col: u32) -> bool {
        self.cell(row, col).map(|cell| cell.solution.is_none()).unwrap_or(true)
    }

    pub fn solution(&self, row: u32, col: u32) -> Option<char> {
        self.cell(row, col).and_then(|cell| cell.solution)
    }

    pub fn user_char(&self, row: u32, col: u32) -> Option<char> {
        self.cell(row, col).and_then(|cell| cell.user)
    }

    /// Stores the last character of `value` in uppercase. An empty
    /// string clears the cell. Blocked cells are left alone.
    pub fn set_user_char(&mut self, row: u32, col: u32, value: &str) {
        if let Some(cell) = self.open_cell_mut(row, col) {
            cell.user = value.chars().last().map(uppercase);
        }
    }

    /// Turns a cell into a blocked cell, dropping anything entered
    /// into it.
    pub fn block(&mut self, row: u32, col: u32) {
        if let Some(index) = self.index(row, col) {
            self.cells[index] = Cell {
                solution: None,
                user: None,
                result: Mark::Unmarked,
            };
        }
    }

    pub fn result(&self, row: u32, col: u32) -> Mark {
        self.cell(row, col).map(|cell| cell.result).unwrap_or_default()
    }

    pub fn set_result(&mut self, row: u32, col: u32, mark: Mark) {
        if let Some(cell) = self.open_cell_mut(row, col) {
            cell.result = mark;
        }
    }

    pub fn clear_results(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.result = Mark::Unmarked;
        }
    }

    pub fn reset_answers(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.user = None;
            cell.result = Mark::Unmarked;
        }
    }

    pub fn reveal_solution(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.solution.is_some() {
                cell.user = cell.solution;
                cell.result = Mark::Correct;
            }
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let width = self.width;

        (0..self.height).flat_map(move |row| {
            (0..width).map(move |col| (row, col))
        })
    }

    /// The solution as rows of strings in the same shape that the
    /// puzzle server sends it.
    pub fn solution_rows(&self) -> Vec<Vec<String>> {
        self.cells.chunks(self.width as usize).map(|row| {
            row.iter().map(|cell| {
                cell.solution.map(String::from).unwrap_or_default()
            }).collect()
        }).collect()
    }
}

impl FromStr for Grid {
    type Err = Error;

    // One line per row with a dot or a space for blocked cells. Short
    // lines are padded with blocked cells.
    fn from_str(s: &str) -> Result<Grid, Error> {
        let width = s.lines().map(|line| line.trim_end().chars().count())
            .max()
            .unwrap_or(0);

        let mut rows = s.lines()
            .map(|line| {
                let mut row = line.trim_end().chars()
                    .map(|ch| if ch == '.' {
                        String::new()
                    } else {
                        ch.to_string()
                    })
                    .collect::<Vec<_>>();
                row.resize(width, String::new());
                row
            })
            .collect::<Vec<_>>();

        while rows.last().map(|row| row.iter().all(|s| s.trim().is_empty()))
            .unwrap_or(false)
        {
            rows.pop();
        }

        Grid::new(&rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            for cell in row.iter() {
                write!(f, "{}", cell.solution.unwrap_or('.'))?;
            }
        }

        Ok(())
    }
}
