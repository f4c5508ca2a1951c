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

use std::fmt::Write;
use super::grid::Mark;
use super::puzzle::Puzzle;

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CellView {
    pub blocked: bool,
    pub number: Option<u32>,
    pub value: Option<char>,
    pub mark: Mark,
    pub highlighted: bool,
    pub focused: bool,
}

impl CellView {
    pub fn new(puzzle: &Puzzle, row: u32, col: u32) -> CellView {
        let grid = puzzle.grid();

        if grid.is_blocked(row, col) {
            return CellView {
                blocked: true,
                number: None,
                value: None,
                mark: Mark::Unmarked,
                highlighted: false,
                focused: false,
            };
        }

        CellView {
            blocked: false,
            number: puzzle.index().number_at(row, col),
            value: grid.user_char(row, col),
            mark: grid.result(row, col),
            highlighted: puzzle.is_highlighted(row, col),
            focused: puzzle.focus() == Some((row, col)),
        }
    }

    /// The CSS classes for the cell’s input element. Blocked cells
    /// don’t have one so this is only meaningful for open cells.
    pub fn class_name(&self) -> String {
        let mut class_name = if self.value.is_some() {
            "cell filled"
        } else {
            "cell empty"
        }.to_string();

        match self.mark {
            Mark::Correct => class_name.push_str(" correct"),
            Mark::Incorrect => class_name.push_str(" incorrect"),
            Mark::Unmarked => (),
        }

        if self.highlighted {
            class_name.push_str(" highlight");
        }

        class_name
    }

    pub fn value_text(&self) -> String {
        self.value.map(String::from).unwrap_or_default()
    }
}

/// Draws the grid as text with two lines per row. The first has the
/// clue numbers and the second the letters. Blocked cells are drawn
/// with `#` and marked letters get a `+` or a `-` after them.
pub fn render_text(puzzle: &Puzzle) -> String {
    let mut text = String::new();

    for row in 0..puzzle.height() {
        let cells = (0..puzzle.width())
            .map(|col| CellView::new(puzzle, row, col))
            .collect::<Vec<_>>();

        for cell in cells.iter() {
            match cell.number {
                Some(number) => write!(&mut text, "{:<4}", number).unwrap(),
                None => text.push_str("    "),
            }
        }

        text.truncate(text.trim_end_matches(' ').len());
        text.push('\n');

        for cell in cells.iter() {
            if cell.blocked {
                text.push_str(" ## ");
                continue;
            }

            let mark = match cell.mark {
                Mark::Correct => '+',
                Mark::Incorrect => '-',
                Mark::Unmarked => ' ',
            };

            write!(&mut text, " {}{} ", cell.value.unwrap_or('_'), mark)
                .unwrap();
        }

        text.truncate(text.trim_end_matches(' ').len());
        text.push('\n');
    }

    text
}
