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

use std::collections::HashMap;
use std::str::FromStr;
use super::grid::{Grid, Pos};
use super::navigation::{Direction, Navigator};
use super::puzzle_data::{self, Orientation, PuzzleData};
use super::scoring::{self, Score};
use super::word_index::{WordId, WordIndex};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Clue<'a> {
    pub number: u32,
    pub text: &'a str,
    pub word_id: WordId,
}

pub struct Puzzle {
    grid: Grid,
    index: WordIndex,
    clues: HashMap<String, String>,
    navigator: Navigator,
    score: Option<Score>,

    // One bit per cell in reading order
    cells_dirty: Vec<u64>,
    active_word_dirty: bool,
    focus_dirty: bool,
    summary_dirty: bool,
}

impl Puzzle {
    pub fn new(data: PuzzleData) -> Puzzle {
        let PuzzleData { grid, clues, words } = data;

        let n_cells = (grid.width() * grid.height()) as usize;
        let mut cells_dirty = vec![u64::MAX; n_cells.div_ceil(64)];

        if n_cells % 64 != 0 {
            if let Some(last) = cells_dirty.last_mut() {
                *last = u64::MAX >> (64 - n_cells % 64);
            }
        }

        log::info!(
            "loaded a {}x{} puzzle with {} words",
            grid.width(),
            grid.height(),
            words.len(),
        );

        Puzzle {
            grid,
            index: WordIndex::new(words),
            clues,
            navigator: Navigator::new(),
            score: None,

            cells_dirty,
            active_word_dirty: true,
            focus_dirty: false,
            summary_dirty: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn index(&self) -> &WordIndex {
        &self.index
    }

    pub fn active_word(&self) -> Option<WordId> {
        self.navigator.active_word()
    }

    pub fn focus(&self) -> Option<Pos> {
        self.navigator.focus()
    }

    pub fn is_highlighted(&self, row: u32, col: u32) -> bool {
        self.navigator.is_highlighted(&self.index, row, col)
    }

    fn dirty_cell(&mut self, (row, col): Pos) {
        if self.grid.contains(row, col) {
            let bit = (row * self.grid.width() + col) as usize;
            self.cells_dirty[bit / 64] |= 1 << (bit % 64);
        }
    }

    fn dirty_word(&mut self, word_id: Option<WordId>) {
        if let Some(word_id) = word_id {
            let cells = self.index.cells_of(word_id).to_vec();

            for pos in cells {
                self.dirty_cell(pos);
            }
        }
    }

    fn dirty_all_cells(&mut self) {
        for pos in self.grid.positions().collect::<Vec<_>>() {
            self.dirty_cell(pos);
        }
    }

    // Compares the navigator against the state from before a
    // transition and queues up whatever needs redrawing
    fn note_navigation(
        &mut self,
        old_word: Option<WordId>,
        old_focus: Option<Pos>,
    ) {
        let new_word = self.navigator.active_word();

        if new_word != old_word {
            self.dirty_word(old_word);
            self.dirty_word(new_word);
            self.active_word_dirty = true;
        }

        let new_focus = self.navigator.focus();

        if new_focus != old_focus {
            if let Some(pos) = old_focus {
                self.dirty_cell(pos);
            }
            if let Some(pos) = new_focus {
                self.dirty_cell(pos);
            }
            self.focus_dirty = true;
        }
    }

    fn navigate<F, T>(&mut self, func: F) -> T
        where F: FnOnce(&mut Navigator, &mut Grid, &WordIndex) -> T
    {
        let old_word = self.navigator.active_word();
        let old_focus = self.navigator.focus();

        let result = func(&mut self.navigator, &mut self.grid, &self.index);

        self.note_navigation(old_word, old_focus);

        result
    }

    pub fn select_cell(&mut self, row: u32, col: u32) -> Option<WordId> {
        self.navigate(|navigator, grid, index| {
            navigator.select(grid, index, row, col)
        })
    }

    pub fn select_clue(&mut self, word_id: WordId) -> Option<Pos> {
        self.navigate(|navigator, _, index| {
            navigator.select_word(index, word_id)
        })
    }

    pub fn type_char(&mut self, row: u32, col: u32, value: &str) -> Pos {
        let focus = self.navigate(|navigator, grid, index| {
            navigator.type_char(grid, index, row, col, value)
        });

        self.dirty_cell((row, col));

        focus
    }

    pub fn arrow(&mut self, direction: Direction, row: u32, col: u32) -> Pos {
        self.navigate(|navigator, grid, _| {
            navigator.arrow(grid, direction, row, col)
        })
    }

    pub fn backspace(&mut self, row: u32, col: u32) -> Pos {
        let focus = self.navigate(|navigator, grid, index| {
            navigator.backspace(grid, index, row, col)
        });

        // Either the cell itself or the one the focus moved to was
        // cleared
        self.dirty_cell((row, col));
        self.dirty_cell(focus);

        focus
    }

    pub fn check_answers(&mut self) -> Score {
        let score = scoring::check_all(&mut self.grid, &self.index);

        self.score = Some(score);
        self.summary_dirty = true;
        self.dirty_all_cells();

        score
    }

    /// Clears everything the user has entered along with the results
    /// of the last check. The active word and focus stay where they
    /// are.
    pub fn reset(&mut self) {
        log::info!("resetting the puzzle");

        self.grid.reset_answers();

        if self.score.take().is_some() {
            self.summary_dirty = true;
        }

        self.dirty_all_cells();
    }

    pub fn show_answers(&mut self) {
        log::info!("revealing the answers");

        self.grid.reveal_solution();
        self.dirty_all_cells();
    }

    pub fn summary_text(&self) -> String {
        self.score.map(|score| score.to_string()).unwrap_or_default()
    }

    /// The clues to show for one direction sorted by number. Words
    /// without a number or without any clue text are left out.
    pub fn clue_list(&self, orientation: Orientation) -> Vec<Clue> {
        let mut clues = self.index.words().iter()
            .enumerate()
            .filter(|(_, word)| {
                word.orientation == orientation && word.number > 0
            })
            .filter_map(|(word_id, word)| {
                self.clues.get(&word.text)
                    .filter(|text| !text.is_empty())
                    .map(|text| Clue {
                        number: word.number,
                        text: text.as_str(),
                        word_id,
                    })
            })
            .collect::<Vec<_>>();

        // Stable so that duplicate numbers keep list order
        clues.sort_by_key(|clue| clue.number);

        clues
    }

    pub fn changed_cells(&mut self) -> ChangedCells {
        let n_chunks = self.cells_dirty.len();

        ChangedCells::new(
            self.grid.width(),
            std::mem::replace(&mut self.cells_dirty, vec![0; n_chunks]),
        )
    }

    pub fn changed_active_word(&mut self) -> Option<Option<WordId>> {
        if self.active_word_dirty {
            self.active_word_dirty = false;
            Some(self.navigator.active_word())
        } else {
            None
        }
    }

    pub fn changed_focus(&mut self) -> Option<Pos> {
        if std::mem::replace(&mut self.focus_dirty, false) {
            self.navigator.focus()
        } else {
            None
        }
    }

    pub fn changed_summary(&mut self) -> Option<String> {
        if self.summary_dirty {
            self.summary_dirty = false;
            Some(self.summary_text())
        } else {
            None
        }
    }
}

impl FromStr for Puzzle {
    type Err = puzzle_data::Error;

    fn from_str(s: &str) -> Result<Puzzle, puzzle_data::Error> {
        s.parse::<PuzzleData>().map(Puzzle::new)
    }
}

pub struct ChangedCells {
    grid_width: u32,
    cells_dirty: Vec<u64>,
    chunk: usize,
}

impl ChangedCells {
    fn new(grid_width: u32, cells_dirty: Vec<u64>) -> ChangedCells {
        ChangedCells {
            grid_width,
            cells_dirty,
            chunk: 0,
        }
    }
}

impl Iterator for ChangedCells {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        loop {
            let bits = self.cells_dirty.get_mut(self.chunk)?;

            if *bits == 0 {
                self.chunk += 1;
                continue;
            }

            let index = bits.trailing_zeros();
            *bits &= u64::MAX.wrapping_shl(index).wrapping_shl(1);

            let cell = (self.chunk * 64) as u32 + index;

            return Some((cell / self.grid_width, cell % self.grid_width));
        }
    }
}
