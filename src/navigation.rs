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

//! Tracks which word is being edited and where the cursor is. Every
//! transition takes the grid and the word index explicitly and returns
//! the cell that should have the focus afterwards. Targets that are
//! blocked or outside of the grid are ignored.

use super::grid::{Grid, Pos};
use super::puzzle_data::Orientation;
use super::word_index::{WordId, WordIndex};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn step(self, (row, col): Pos) -> Option<Pos> {
        match self {
            Direction::Up => row.checked_sub(1).map(|row| (row, col)),
            Direction::Down => row.checked_add(1).map(|row| (row, col)),
            Direction::Left => col.checked_sub(1).map(|col| (row, col)),
            Direction::Right => col.checked_add(1).map(|col| (row, col)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Navigator {
    active_word: Option<WordId>,
    focus: Option<Pos>,
}

impl Navigator {
    pub fn new() -> Navigator {
        Navigator::default()
    }

    pub fn active_word(&self) -> Option<WordId> {
        self.active_word
    }

    pub fn focus(&self) -> Option<Pos> {
        self.focus
    }

    fn active_orientation(&self, index: &WordIndex) -> Option<Orientation> {
        self.active_word
            .and_then(|word_id| index.word(word_id))
            .map(|word| word.orientation)
    }

    // Picks one of the words covering a cell. The active word wins if
    // it covers the cell, then a word in the same direction as the
    // active word, then across before down. Anything left over is
    // decided by the order of the word list.
    fn choose_word(
        &self,
        index: &WordIndex,
        candidates: &[WordId],
    ) -> Option<WordId> {
        if let Some(active_word) = self.active_word {
            if candidates.contains(&active_word) {
                return Some(active_word);
            }
        }

        let active_orientation = self.active_orientation(index);

        let rank = |&word_id: &WordId| {
            let orientation = index.word(word_id).map(|word| word.orientation);

            (
                orientation != active_orientation,
                orientation != Some(Orientation::Across),
            )
        };

        // min_by_key returns the first of several equal elements
        candidates.iter()
            .copied()
            .min_by_key(|word_id| rank(word_id))
    }

    /// Handles a click on a cell. Returns the newly active word.
    pub fn select(
        &mut self,
        grid: &Grid,
        index: &WordIndex,
        row: u32,
        col: u32,
    ) -> Option<WordId> {
        let candidates = index.words_at(row, col);

        self.active_word = self.choose_word(index, candidates);

        if !grid.is_blocked(row, col) {
            self.focus = Some((row, col));
        }

        log::debug!(
            "select {},{} -> word {:?}",
            row,
            col,
            self.active_word,
        );

        self.active_word
    }

    /// Makes a word active from the clue list and moves the focus to
    /// its first cell.
    pub fn select_word(
        &mut self,
        index: &WordIndex,
        word_id: WordId,
    ) -> Option<Pos> {
        let &start = index.cells_of(word_id).first()?;

        self.active_word = Some(word_id);
        self.focus = Some(start);

        Some(start)
    }

    /// Handles a value typed into a cell. A character moves the focus
    /// along the active word, stopping at its last cell. Deleting never
    /// moves the focus.
    pub fn type_char(
        &mut self,
        grid: &mut Grid,
        index: &WordIndex,
        row: u32,
        col: u32,
        value: &str,
    ) -> Pos {
        if grid.is_blocked(row, col) {
            return self.focus.unwrap_or((row, col));
        }

        grid.set_user_char(row, col, value);

        let mut focus = (row, col);

        if !value.is_empty() {
            if let Some(word_id) = self.active_word {
                let next = index.position_in(word_id, row, col)
                    .and_then(|pos| index.cells_of(word_id).get(pos + 1));

                if let Some(&next) = next {
                    focus = next;
                }
            }
        }

        log::trace!("type {:?} at {},{} -> {:?}", value, row, col, focus);

        self.focus = Some(focus);

        focus
    }

    /// Moves the focus one cell in a direction regardless of the active
    /// word.
    pub fn arrow(
        &mut self,
        grid: &Grid,
        direction: Direction,
        row: u32,
        col: u32,
    ) -> Pos {
        let focus = direction.step((row, col))
            .filter(|&(row, col)| !grid.is_blocked(row, col))
            .unwrap_or((row, col));

        self.focus = Some(focus);

        focus
    }

    /// Handles the backspace key. A filled cell is just cleared.
    /// Otherwise the focus moves back along the active word’s
    /// direction and that cell is cleared. With no active word it moves
    /// up.
    pub fn backspace(
        &mut self,
        grid: &mut Grid,
        index: &WordIndex,
        row: u32,
        col: u32,
    ) -> Pos {
        let mut focus = (row, col);

        if grid.user_char(row, col).is_some() {
            grid.set_user_char(row, col, "");
        } else {
            let orientation = self.active_orientation(index)
                .unwrap_or(Orientation::Down);

            if let Some(previous) = orientation.previous((row, col))
                .filter(|&(row, col)| !grid.is_blocked(row, col))
            {
                grid.set_user_char(previous.0, previous.1, "");
                focus = previous;
            }
        }

        self.focus = Some(focus);

        focus
    }

    pub fn is_highlighted(&self, index: &WordIndex, row: u32, col: u32) -> bool {
        self.active_word
            .map(|word_id| index.position_in(word_id, row, col).is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::puzzle_data::PuzzleData;

    // c a t .
    // . . o .
    // . . e .
    const PUZZLE: &'static str = r#"{
        "grid": [
            ["c", "a", "t", ""],
            ["", "", "o", ""],
            ["", "", "e", ""]
        ],
        "placed_words": [
            {"word": "cat", "number": 1, "orientation": "across",
             "start_row": 0, "start_col": 0},
            {"word": "toe", "number": 2, "orientation": "down",
             "start_row": 0, "start_col": 2}
        ]
    }"#;

    // Same layout but the down word comes first in the list
    const DOWN_FIRST_PUZZLE: &'static str = r#"{
        "grid": [
            ["c", "a", "t", ""],
            ["", "", "o", ""],
            ["", "", "e", ""]
        ],
        "placed_words": [
            {"word": "toe", "number": 2, "orientation": "down",
             "start_row": 0, "start_col": 2},
            {"word": "cat", "number": 1, "orientation": "across",
             "start_row": 0, "start_col": 0}
        ]
    }"#;

    fn load(source: &str) -> (Grid, WordIndex) {
        let data = source.parse::<PuzzleData>().unwrap();
        (data.grid, WordIndex::new(data.words))
    }

    #[test]
    fn select_single_word() {
        let (grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        assert_eq!(nav.select(&grid, &index, 0, 1), Some(0));
        assert_eq!(nav.focus(), Some((0, 1)));
        assert_eq!(nav.select(&grid, &index, 2, 2), Some(1));
        assert_eq!(nav.focus(), Some((2, 2)));

        // Blocked cells make the navigator idle but leave the focus
        assert_eq!(nav.select(&grid, &index, 1, 0), None);
        assert_eq!(nav.active_word(), None);
        assert_eq!(nav.focus(), Some((2, 2)));
    }

    #[test]
    fn intersection_prefers_across() {
        let (grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();
        assert_eq!(nav.select(&grid, &index, 0, 2), Some(0));

        let (grid, index) = load(DOWN_FIRST_PUZZLE);
        let mut nav = Navigator::new();
        assert_eq!(nav.select(&grid, &index, 0, 2), Some(1));
    }

    #[test]
    fn intersection_keeps_active_word() {
        let (grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        // Activate the down word and then click the shared cell
        nav.select(&grid, &index, 1, 2);
        assert_eq!(nav.select(&grid, &index, 0, 2), Some(1));

        // Same again starting from the across word
        nav.select(&grid, &index, 0, 0);
        assert_eq!(nav.select(&grid, &index, 0, 2), Some(0));
    }

    #[test]
    fn intersection_follows_orientation() {
        // “ox” runs down from 1,0 and isn’t part of the intersection
        // at 0,2, so clicking there should still pick the down word.
        let (grid, index) = load(r#"{
            "grid": [
                ["c", "a", "t"],
                ["o", "", "o"],
                ["x", "", "e"]
            ],
            "placed_words": [
                {"word": "cat", "number": 1, "orientation": "across",
                 "start_row": 0, "start_col": 0},
                {"word": "toe", "number": 2, "orientation": "down",
                 "start_row": 0, "start_col": 2},
                {"word": "ox", "number": 3, "orientation": "down",
                 "start_row": 1, "start_col": 0}
            ]
        }"#);
        let mut nav = Navigator::new();

        assert_eq!(nav.select(&grid, &index, 2, 0), Some(2));
        assert_eq!(nav.select(&grid, &index, 0, 2), Some(1));
    }

    #[test]
    fn select_word_from_clue() {
        let (_, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        assert_eq!(nav.select_word(&index, 1), Some((0, 2)));
        assert_eq!(nav.active_word(), Some(1));
        assert_eq!(nav.focus(), Some((0, 2)));

        assert_eq!(nav.select_word(&index, 5), None);
        assert_eq!(nav.active_word(), Some(1));
    }

    #[test]
    fn type_word() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select(&grid, &index, 0, 0);

        assert_eq!(nav.type_char(&mut grid, &index, 0, 0, "c"), (0, 1));
        assert_eq!(nav.type_char(&mut grid, &index, 0, 1, "a"), (0, 2));
        // The last cell doesn’t advance
        assert_eq!(nav.type_char(&mut grid, &index, 0, 2, "t"), (0, 2));
        assert_eq!(nav.focus(), Some((0, 2)));

        assert_eq!(grid.user_char(0, 0), Some('C'));
        assert_eq!(grid.user_char(0, 1), Some('A'));
        assert_eq!(grid.user_char(0, 2), Some('T'));
    }

    #[test]
    fn type_down_word() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select_word(&index, 1);

        assert_eq!(nav.type_char(&mut grid, &index, 0, 2, "t"), (1, 2));
        assert_eq!(nav.type_char(&mut grid, &index, 1, 2, "o"), (2, 2));
        assert_eq!(nav.type_char(&mut grid, &index, 2, 2, "e"), (2, 2));
    }

    #[test]
    fn type_delete_stays() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select(&grid, &index, 0, 0);
        nav.type_char(&mut grid, &index, 0, 0, "c");

        assert_eq!(nav.type_char(&mut grid, &index, 0, 0, ""), (0, 0));
        assert_eq!(grid.user_char(0, 0), None);
    }

    #[test]
    fn type_outside_active_word() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        // No active word
        assert_eq!(nav.type_char(&mut grid, &index, 0, 0, "c"), (0, 0));
        assert_eq!(grid.user_char(0, 0), Some('C'));

        // Active word doesn’t contain the cell
        nav.select(&grid, &index, 0, 0);
        assert_eq!(nav.type_char(&mut grid, &index, 2, 2, "e"), (2, 2));
        assert_eq!(grid.user_char(2, 2), Some('E'));

        // Blocked cells are ignored
        assert_eq!(nav.type_char(&mut grid, &index, 1, 0, "x"), (2, 2));
        assert_eq!(grid.user_char(1, 0), None);
        assert_eq!(nav.focus(), Some((2, 2)));
    }

    #[test]
    fn arrows() {
        let (grid, _) = load(PUZZLE);
        let mut nav = Navigator::new();

        assert_eq!(nav.arrow(&grid, Direction::Right, 0, 0), (0, 1));
        assert_eq!(nav.arrow(&grid, Direction::Left, 0, 1), (0, 0));
        // Off the edge of the grid
        assert_eq!(nav.arrow(&grid, Direction::Left, 0, 0), (0, 0));
        assert_eq!(nav.arrow(&grid, Direction::Up, 0, 0), (0, 0));
        // Into a blocked cell
        assert_eq!(nav.arrow(&grid, Direction::Down, 0, 0), (0, 0));
        assert_eq!(nav.arrow(&grid, Direction::Right, 0, 2), (0, 2));
        assert_eq!(nav.arrow(&grid, Direction::Down, 0, 2), (1, 2));
        assert_eq!(nav.arrow(&grid, Direction::Down, 2, 2), (2, 2));
        assert_eq!(nav.focus(), Some((2, 2)));

        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("a"), None);
    }

    #[test]
    fn arrows_keep_active_word() {
        let (grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select(&grid, &index, 0, 0);
        nav.arrow(&grid, Direction::Right, 0, 2);
        nav.arrow(&grid, Direction::Down, 0, 2);

        assert_eq!(nav.active_word(), Some(0));
    }

    #[test]
    fn backspace_filled_cell() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select(&grid, &index, 0, 1);
        grid.set_user_char(0, 0, "c");
        grid.set_user_char(0, 1, "a");

        assert_eq!(nav.backspace(&mut grid, &index, 0, 1), (0, 1));
        assert_eq!(grid.user_char(0, 1), None);
        assert_eq!(grid.user_char(0, 0), Some('C'));
    }

    #[test]
    fn backspace_empty_cell() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select(&grid, &index, 0, 2);
        grid.set_user_char(0, 1, "a");

        assert_eq!(nav.backspace(&mut grid, &index, 0, 2), (0, 1));
        assert_eq!(grid.user_char(0, 1), None);

        assert_eq!(nav.backspace(&mut grid, &index, 0, 1), (0, 0));
        // First cell of the word and of the grid
        assert_eq!(nav.backspace(&mut grid, &index, 0, 0), (0, 0));
        assert_eq!(nav.focus(), Some((0, 0)));
    }

    #[test]
    fn backspace_down_word() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        nav.select_word(&index, 1);
        grid.set_user_char(1, 2, "o");

        assert_eq!(nav.backspace(&mut grid, &index, 2, 2), (1, 2));
        assert_eq!(grid.user_char(1, 2), None);
        assert_eq!(nav.backspace(&mut grid, &index, 1, 2), (0, 2));
        assert_eq!(nav.backspace(&mut grid, &index, 0, 2), (0, 2));
    }

    #[test]
    fn backspace_without_active_word() {
        let (mut grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        // Moves up
        assert_eq!(nav.backspace(&mut grid, &index, 2, 2), (1, 2));
        // Nothing above the top row
        assert_eq!(nav.backspace(&mut grid, &index, 0, 1), (0, 1));
    }

    #[test]
    fn backspace_into_blocked_cell() {
        let (mut grid, index) = load(r#"{
            "grid": [
                ["a", "", "b"],
                ["", "", "e"]
            ],
            "placed_words": [
                {"word": "be", "number": 1, "orientation": "down",
                 "start_row": 0, "start_col": 2},
                {"word": "a", "number": 2, "orientation": "across",
                 "start_row": 0, "start_col": 0}
            ]
        }"#);
        let mut nav = Navigator::new();

        nav.select_word(&index, 1);
        assert_eq!(nav.backspace(&mut grid, &index, 0, 2), (0, 2));
    }

    #[test]
    fn highlight() {
        let (grid, index) = load(PUZZLE);
        let mut nav = Navigator::new();

        assert!(!nav.is_highlighted(&index, 0, 0));

        nav.select(&grid, &index, 1, 2);

        assert!(nav.is_highlighted(&index, 0, 2));
        assert!(nav.is_highlighted(&index, 2, 2));
        assert!(!nav.is_highlighted(&index, 0, 0));

        // Clicking a blocked cell drops the highlight
        nav.select(&grid, &index, 1, 0);

        assert!(!nav.is_highlighted(&index, 0, 2));
        assert_eq!(nav.focus(), Some((1, 2)));
    }
}
