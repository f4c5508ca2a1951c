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

mod grid;
mod puzzle_data;
mod word_index;
mod navigation;
mod scoring;
mod puzzle;
mod answer_key;
mod render;

use std::{fs, process::ExitCode, ffi::OsString};
use clap::Parser;
use grid::Grid;
use puzzle::Puzzle;
use puzzle_data::Orientation;

#[derive(Parser)]
#[command(name = "check-puzzle")]
struct Cli {
    #[arg(value_name = "PUZZLE")]
    puzzle: OsString,
    /// Grid of letters to type in before checking. Use a dot or a
    /// space for cells to leave empty.
    #[arg(short, long, value_name = "FILE")]
    answers: Option<OsString>,
    /// Print the answer key as JSON instead of the grid
    #[arg(short = 'k', long)]
    answer_key: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn type_answers(puzzle: &mut Puzzle, answers: &Grid) {
    for (row, col) in answers.positions() {
        if let Some(letter) = answers.solution(row, col) {
            puzzle.type_char(row, col, &letter.to_string());
        }
    }
}

fn print_clues(puzzle: &Puzzle) {
    for (orientation, title) in [
        (Orientation::Across, "Across"),
        (Orientation::Down, "Down"),
    ] {
        let clues = puzzle.clue_list(orientation);

        if clues.is_empty() {
            continue;
        }

        println!("\n{}\n", title);

        for clue in clues.into_iter() {
            println!("{:>3}. {}", clue.number, clue.text);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let puzzle_string = match fs::read_to_string(&cli.puzzle) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", cli.puzzle.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    let mut puzzle = match puzzle_string.parse::<Puzzle>() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}: {}", cli.puzzle.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    if cli.answer_key {
        match answer_key::to_json(puzzle.grid()) {
            Ok(json) => {
                println!("{}", json);
                return ExitCode::SUCCESS;
            },
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            },
        }
    }

    let mut checked = false;

    if let Some(answers_filename) = cli.answers.as_ref() {
        let answers = match fs::read_to_string(answers_filename)
            .map_err(|e| e.to_string())
            .and_then(|s| s.parse::<Grid>().map_err(|e| e.to_string()))
        {
            Ok(a) => a,
            Err(e) => {
                eprintln!("{}: {}", answers_filename.to_string_lossy(), e);
                return ExitCode::FAILURE;
            },
        };

        if answers.width() != puzzle.width() ||
            answers.height() != puzzle.height()
        {
            log::warn!(
                "answers are {}x{} but the puzzle is {}x{}",
                answers.width(),
                answers.height(),
                puzzle.width(),
                puzzle.height(),
            );
        }

        type_answers(&mut puzzle, &answers);
        puzzle.check_answers();
        checked = true;
    }

    print!("{}", render::render_text(&puzzle));

    print_clues(&puzzle);

    if checked {
        println!("\n{}", puzzle.summary_text());
    }

    ExitCode::SUCCESS
}
