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

//! The answer key is the solution grid written as a JSON array of rows
//! so that the answer key page can show it without the puzzle server.

use thiserror::Error;
use super::grid::{self, Grid};

pub const STORAGE_KEY: &'static str = "crosswordSolution";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Grid(#[from] grid::Error),
}

pub fn to_json(grid: &Grid) -> Result<String, Error> {
    Ok(serde_json::to_string(&grid.solution_rows())?)
}

pub fn parse(json: &str) -> Result<Grid, Error> {
    let rows = serde_json::from_str::<Vec<Vec<String>>>(json)?;

    Ok(Grid::new(&rows)?)
}
