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

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use serde::Deserialize;
use thiserror::Error;
use super::grid::{self, Grid, Pos};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Across,
    Down,
}

impl Orientation {
    pub fn next(self, (row, col): Pos) -> Option<Pos> {
        match self {
            Orientation::Across => col.checked_add(1).map(|col| (row, col)),
            Orientation::Down => row.checked_add(1).map(|row| (row, col)),
        }
    }

    pub fn previous(self, (row, col): Pos) -> Option<Pos> {
        match self {
            Orientation::Across => col.checked_sub(1).map(|col| (row, col)),
            Orientation::Down => row.checked_sub(1).map(|row| (row, col)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PlacedWord {
    #[serde(rename = "word")]
    pub text: String,
    // Zero if the word doesn’t start on a numbered cell
    #[serde(default)]
    pub number: u32,
    pub orientation: Orientation,
    pub start_row: u32,
    pub start_col: u32,
}

impl PlacedWord {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn start(&self) -> Pos {
        (self.start_row, self.start_col)
    }

    /// The cells covered by the word in reading order. Positions that
    /// would overflow the coordinate type are cut off, which can only
    /// happen for a word that is going to fail validation anyway.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let orientation = self.orientation;

        std::iter::successors(Some(self.start()), move |&pos| {
            orientation.next(pos)
        }).take(self.len())
    }
}

#[derive(Debug)]
pub struct PuzzleData {
    pub grid: Grid,
    pub clues: HashMap<String, String>,
    pub words: Vec<PlacedWord>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Grid(#[from] grid::Error),
    #[error("word {0} is empty")]
    EmptyWord(usize),
    #[error("“{0}” goes outside of the grid")]
    OutOfBounds(String),
    #[error("“{word}” crosses a blocked cell at {row},{col}")]
    BlockedCell {
        word: String,
        row: u32,
        col: u32,
    },
    #[error("“{word}” doesn’t match the grid at {row},{col}")]
    LetterMismatch {
        word: String,
        row: u32,
        col: u32,
    },
}

// The response sent by the puzzle server
#[derive(Deserialize)]
struct Payload {
    grid: Vec<Vec<String>>,
    #[serde(default)]
    clues: HashMap<String, String>,
    placed_words: Vec<PlacedWord>,
}

fn validate_word(
    grid: &Grid,
    word_num: usize,
    word: &PlacedWord,
) -> Result<(), Error> {
    let length = word.len();

    if length < 1 {
        return Err(Error::EmptyWord(word_num));
    }

    let mut n_cells = 0;

    for ((row, col), letter) in word.cells().zip(word.text.chars()) {
        if !grid.contains(row, col) {
            return Err(Error::OutOfBounds(word.text.clone()));
        }

        let Some(solution) = grid.solution(row, col)
        else {
            return Err(Error::BlockedCell {
                word: word.text.clone(),
                row,
                col,
            });
        };

        if grid::uppercase(letter) != solution {
            return Err(Error::LetterMismatch {
                word: word.text.clone(),
                row,
                col,
            });
        }

        n_cells += 1;
    }

    if n_cells < length {
        Err(Error::OutOfBounds(word.text.clone()))
    } else {
        Ok(())
    }
}

impl PuzzleData {
    /// Validates the words against the grid. Letters in the grid that
    /// no word covers are turned into blocked cells so that every
    /// fillable cell belongs to a word.
    pub fn new(
        mut grid: Grid,
        clues: HashMap<String, String>,
        words: Vec<PlacedWord>,
    ) -> Result<PuzzleData, Error> {
        for (word_num, word) in words.iter().enumerate() {
            validate_word(&grid, word_num, word)?;
        }

        let covered = words.iter()
            .flat_map(|word| word.cells())
            .collect::<HashSet<Pos>>();

        let uncovered = grid.positions()
            .filter(|&(row, col)| {
                !grid.is_blocked(row, col) && !covered.contains(&(row, col))
            })
            .collect::<Vec<_>>();

        if !uncovered.is_empty() {
            log::warn!(
                "blocking {} grid cells that aren’t part of any word",
                uncovered.len(),
            );

            for (row, col) in uncovered {
                grid.block(row, col);
            }
        }

        Ok(PuzzleData { grid, clues, words })
    }
}

impl FromStr for PuzzleData {
    type Err = Error;

    fn from_str(s: &str) -> Result<PuzzleData, Error> {
        let payload = serde_json::from_str::<Payload>(s)?;
        let grid = Grid::new(&payload.grid)?;

        PuzzleData::new(grid, payload.clues, payload.placed_words)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CAT_PUZZLE: &'static str = r#"{
        "grid": [["c", "a", "t"], ["", "", "o"], ["", "", "e"]],
        "clues": {"cat": "Feline", "toe": "Part of a foot"},
        "placed_words": [
            {"word": "cat", "number": 1, "orientation": "across",
             "start_row": 0, "start_col": 0},
            {"word": "toe", "number": 2, "orientation": "down",
             "start_row": 0, "start_col": 2}
        ]
    }"#;

    #[test]
    fn parse() {
        let data = CAT_PUZZLE.parse::<PuzzleData>().unwrap();

        assert_eq!(data.grid.width(), 3);
        assert_eq!(data.grid.height(), 3);
        assert_eq!(data.words.len(), 2);
        assert_eq!(
            data.words[1],
            PlacedWord {
                text: "toe".to_string(),
                number: 2,
                orientation: Orientation::Down,
                start_row: 0,
                start_col: 2,
            },
        );
        assert_eq!(data.clues.get("cat").map(String::as_str), Some("Feline"));
    }

    #[test]
    fn word_cells() {
        let data = CAT_PUZZLE.parse::<PuzzleData>().unwrap();

        assert_eq!(
            data.words[0].cells().collect::<Vec<_>>(),
            &[(0, 0), (0, 1), (0, 2)],
        );
        assert_eq!(
            data.words[1].cells().collect::<Vec<_>>(),
            &[(0, 2), (1, 2), (2, 2)],
        );
    }

    #[test]
    fn orientation_steps() {
        assert_eq!(Orientation::Across.next((1, 1)), Some((1, 2)));
        assert_eq!(Orientation::Down.next((1, 1)), Some((2, 1)));
        assert_eq!(Orientation::Across.previous((1, 0)), None);
        assert_eq!(Orientation::Down.previous((0, 1)), None);
        assert_eq!(Orientation::Down.previous((3, 1)), Some((2, 1)));
    }

    fn load(grid: &str, words: Vec<PlacedWord>) -> Result<PuzzleData, Error> {
        PuzzleData::new(grid.parse().unwrap(), HashMap::new(), words)
    }

    fn word(text: &str, orientation: Orientation, row: u32, col: u32)
            -> PlacedWord {
        PlacedWord {
            text: text.to_string(),
            number: 1,
            orientation,
            start_row: row,
            start_col: col,
        }
    }

    #[test]
    fn validation_errors() {
        assert_eq!(
            &load("cat", vec![word("cats", Orientation::Across, 0, 0)])
                .unwrap_err().to_string(),
            "“cats” goes outside of the grid",
        );
        assert_eq!(
            &load("cat", vec![word("ca", Orientation::Down, 0, 0)])
                .unwrap_err().to_string(),
            "“ca” goes outside of the grid",
        );
        assert_eq!(
            &load("c.t", vec![word("cat", Orientation::Across, 0, 0)])
                .unwrap_err().to_string(),
            "“cat” crosses a blocked cell at 0,1",
        );
        assert_eq!(
            &load("cot", vec![word("cat", Orientation::Across, 0, 0)])
                .unwrap_err().to_string(),
            "“cat” doesn’t match the grid at 0,1",
        );
        assert_eq!(
            &load("cat", vec![word("", Orientation::Across, 0, 0)])
                .unwrap_err().to_string(),
            "word 0 is empty",
        );
        assert!(matches!(
            r#"{"grid": [["a", "b"], ["c"]], "placed_words": []}"#
                .parse::<PuzzleData>(),
            Err(Error::Grid(grid::Error::RaggedRow { .. })),
        ));
        assert!(matches!(
            r#"{"grid": [["a"]], "placed_words": [
                {"word": "a", "number": -1, "orientation": "across",
                 "start_row": 0, "start_col": 0}
            ]}"#.parse::<PuzzleData>(),
            Err(Error::Json(_)),
        ));
        assert!(matches!(
            r#"{"grid": [["a"]], "placed_words": [
                {"word": "a", "number": 1, "orientation": "sideways",
                 "start_row": 0, "start_col": 0}
            ]}"#.parse::<PuzzleData>(),
            Err(Error::Json(_)),
        ));
    }

    #[test]
    fn case_insensitive_letters() {
        let data = load("CAT", vec![word("cat", Orientation::Across, 0, 0)])
            .unwrap();
        assert_eq!(data.words.len(), 1);

        // ß uppercases to two letters but the grid only keeps one
        let data = load("maß", vec![word("maß", Orientation::Across, 0, 0)])
            .unwrap();
        assert_eq!(data.grid.solution(0, 2), Some('S'));
    }

    #[test]
    fn uncovered_cells_are_blocked() {
        let data = load(
            "catx\n...y",
            vec![word("cat", Orientation::Across, 0, 0)],
        ).unwrap();

        assert!(!data.grid.is_blocked(0, 2));
        assert!(data.grid.is_blocked(0, 3));
        assert!(data.grid.is_blocked(1, 3));
    }
}
