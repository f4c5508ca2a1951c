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

use std::collections::{hash_map, HashMap};
use super::grid::Pos;
use super::puzzle_data::PlacedWord;

// Index of the word in the list sent by the puzzle server
pub type WordId = usize;

#[derive(Debug)]
pub struct WordIndex {
    words: Vec<PlacedWord>,
    cells: Vec<Box<[Pos]>>,
    covering: HashMap<Pos, Vec<WordId>>,
    numbers: HashMap<Pos, u32>,
}

impl WordIndex {
    pub fn new(words: Vec<PlacedWord>) -> WordIndex {
        let mut cells = Vec::with_capacity(words.len());
        let mut covering = HashMap::<Pos, Vec<WordId>>::new();
        let mut numbers = HashMap::new();

        for (word_id, word) in words.iter().enumerate() {
            let word_cells = word.cells().collect::<Box<[Pos]>>();

            for &pos in word_cells.iter() {
                covering.entry(pos).or_default().push(word_id);
            }

            cells.push(word_cells);

            if word.number > 0 {
                if let hash_map::Entry::Vacant(entry) =
                    numbers.entry(word.start())
                {
                    entry.insert(word.number);
                }
            }
        }

        WordIndex {
            words,
            cells,
            covering,
            numbers,
        }
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> Option<&PlacedWord> {
        self.words.get(word_id)
    }

    /// The words covering a cell in list order. There will be two at
    /// an intersection.
    pub fn words_at(&self, row: u32, col: u32) -> &[WordId] {
        self.covering.get(&(row, col)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cells_of(&self, word_id: WordId) -> &[Pos] {
        self.cells.get(word_id).map(|cells| &cells[..]).unwrap_or(&[])
    }

    pub fn position_in(
        &self,
        word_id: WordId,
        row: u32,
        col: u32,
    ) -> Option<usize> {
        self.cells_of(word_id).iter().position(|&pos| pos == (row, col))
    }

    pub fn number_at(&self, row: u32, col: u32) -> Option<u32> {
        self.numbers.get(&(row, col)).copied()
    }

    pub fn is_covered(&self, row: u32, col: u32) -> bool {
        self.covering.contains_key(&(row, col))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::puzzle_data::{Orientation, PuzzleData};

    // c a t . .
    // . . o . .
    // . . e . .
    // . . s k i
    const PUZZLE: &'static str = r#"{
        "grid": [
            ["c", "a", "t", "", ""],
            ["", "", "o", "", ""],
            ["", "", "e", "", ""],
            ["", "", "s", "k", "i"]
        ],
        "placed_words": [
            {"word": "cat", "number": 1, "orientation": "across",
             "start_row": 0, "start_col": 0},
            {"word": "toes", "number": 2, "orientation": "down",
             "start_row": 0, "start_col": 2},
            {"word": "ski", "number": 3, "orientation": "across",
             "start_row": 3, "start_col": 2}
        ]
    }"#;

    fn index() -> (PuzzleData, WordIndex) {
        let data = PUZZLE.parse::<PuzzleData>().unwrap();
        let index = WordIndex::new(data.words.clone());
        (data, index)
    }

    #[test]
    fn cells_of() {
        let (_, index) = index();

        assert_eq!(index.cells_of(0), &[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(index.cells_of(1), &[(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(index.cells_of(2), &[(3, 2), (3, 3), (3, 4)]);
        assert!(index.cells_of(3).is_empty());

        assert_eq!(index.word(2).unwrap().orientation, Orientation::Across);
        assert!(index.word(3).is_none());
    }

    #[test]
    fn words_at() {
        let (_, index) = index();

        assert_eq!(index.words_at(0, 0), &[0]);
        assert_eq!(index.words_at(0, 2), &[0, 1]);
        assert_eq!(index.words_at(3, 2), &[1, 2]);
        assert_eq!(index.words_at(1, 2), &[1]);
        assert!(index.words_at(1, 0).is_empty());
        assert!(index.words_at(100, 100).is_empty());
    }

    #[test]
    fn positions_and_numbers() {
        let (_, index) = index();

        assert_eq!(index.position_in(1, 0, 2), Some(0));
        assert_eq!(index.position_in(1, 3, 2), Some(3));
        assert_eq!(index.position_in(1, 0, 0), None);

        assert_eq!(index.number_at(0, 0), Some(1));
        assert_eq!(index.number_at(0, 2), Some(2));
        assert_eq!(index.number_at(3, 2), Some(3));
        assert_eq!(index.number_at(0, 1), None);
    }

    #[test]
    fn unnumbered_words() {
        let mut words = index().0.words;
        words[1].number = 0;

        let index = WordIndex::new(words);

        assert_eq!(index.number_at(0, 2), None);
        assert_eq!(index.words_at(0, 2), &[0, 1]);
    }

    #[test]
    fn covered_cells_match_open_cells() {
        let (data, index) = index();

        for (row, col) in data.grid.positions() {
            assert_eq!(
                !data.grid.is_blocked(row, col),
                index.is_covered(row, col),
            );
        }
    }
}
