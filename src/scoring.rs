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
use super::grid::{self, Grid, Mark, Pos};
use super::word_index::{WordId, WordIndex};

// Stands in for an empty cell when rebuilding the user’s word
const BLANK: char = ' ';

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Score {
    pub correct: usize,
    pub incorrect: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Correct Words: {}, Incorrect Words: {}",
            self.correct,
            self.incorrect,
        )
    }
}

/// Returns what the user has entered for a word or None if none of
/// its cells have been filled in.
fn attempt(grid: &Grid, cells: &[Pos]) -> Option<String> {
    let mut attempted = false;

    let word = cells.iter().map(|&(row, col)| {
        match grid.user_char(row, col) {
            Some(ch) => {
                attempted = true;
                ch
            },
            None => BLANK,
        }
    }).collect::<String>();

    attempted.then_some(word)
}

/// Compares a single word without touching the grid. Returns None if
/// the word hasn’t been attempted.
pub fn check_word(
    grid: &Grid,
    index: &WordIndex,
    word_id: WordId,
) -> Option<Mark> {
    let word = index.word(word_id)?;
    let attempt = attempt(grid, index.cells_of(word_id))?;

    if attempt.trim().chars().eq(word.text.chars().map(grid::uppercase)) {
        Some(Mark::Correct)
    } else {
        Some(Mark::Incorrect)
    }
}

/// Marks every cell of every attempted word as correct or incorrect
/// and counts the words. Cells that only belong to words that
/// haven’t been attempted end up unmarked. Where two words cross, the
/// one later in the list decides the mark.
pub fn check_all(grid: &mut Grid, index: &WordIndex) -> Score {
    let mut score = Score::default();

    grid.clear_results();

    for word_id in 0..index.words().len() {
        let Some(mark) = check_word(grid, index, word_id)
        else {
            continue;
        };

        if mark == Mark::Correct {
            score.correct += 1;
        } else {
            score.incorrect += 1;
        }

        for &(row, col) in index.cells_of(word_id) {
            grid.set_result(row, col, mark);
        }
    }

    log::info!("{}", score);

    score
}
