//! Static maze layouts
//!
//! A [`Layout`] is the starting picture of an episode: which cells are walls,
//! where the trash, hazards and exit sit, and where both robots begin. The
//! classic layout is the 6×6 Basurahan maze; custom layouts are read from a
//! small character grid:
//!
//! ```text
//! A.T...
//! .#....
//! ..M#..
//! .T.R..
//! .M..#.
//! ...T.E
//! ```
//!
//! `.` empty, `#` wall, `T` trash, `M` hazard (mine), `E` exit,
//! `A` robot start, `R` adversary start.

use serde::{Deserialize, Serialize};

use super::state::Position;
use crate::error::{Error, Result};

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Trash,
    Hazard,
    Exit,
}

impl Cell {
    fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | 'A' | 'R' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'T' => Some(Cell::Trash),
            'M' => Some(Cell::Hazard),
            'E' => Some(Cell::Exit),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Trash => 'T',
            Cell::Hazard => 'M',
            Cell::Exit => 'E',
        }
    }
}

/// Starting configuration of the maze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    width: usize,
    height: usize,
    /// Row-major cells
    cells: Vec<Cell>,
    agent_start: Position,
    adversary_start: Position,
}

impl Layout {
    /// The 6×6 Basurahan maze
    pub fn classic() -> Self {
        let (width, height) = (6, 6);
        let mut cells = vec![Cell::Empty; width * height];
        let mut place = |row: usize, col: usize, cell: Cell| cells[row * width + col] = cell;

        place(1, 1, Cell::Wall);
        place(2, 3, Cell::Wall);
        place(4, 4, Cell::Wall);

        place(0, 2, Cell::Trash);
        place(3, 1, Cell::Trash);
        place(5, 3, Cell::Trash);

        place(2, 2, Cell::Hazard);
        place(4, 1, Cell::Hazard);

        place(5, 5, Cell::Exit);

        Self {
            width,
            height,
            cells,
            agent_start: Position::new(0, 0),
            adversary_start: Position::new((width / 2) as i32, (height / 2) as i32),
        }
    }

    /// Parse a character grid into a validated layout
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let width = rows.first().map(|r| r.chars().count()).ok_or(Error::EmptyLayout)?;
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        let mut agents = Vec::new();
        let mut adversaries = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(Error::RaggedLayout {
                    row,
                    expected: width,
                    got,
                });
            }

            for (column, character) in line.chars().enumerate() {
                let cell = Cell::from_char(character).ok_or(Error::InvalidLayoutCharacter {
                    character,
                    row,
                    column,
                })?;
                let pos = Position::new(column as i32, row as i32);
                match character {
                    'A' => agents.push(pos),
                    'R' => adversaries.push(pos),
                    _ => {}
                }
                cells.push(cell);
            }
        }

        let agent_start = single(&agents, "robot start 'A'")?;
        let adversary_start = single(&adversaries, "adversary start 'R'")?;

        let layout = Self {
            width,
            height,
            cells,
            agent_start,
            adversary_start,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Check the layout can host a meaningful episode
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyLayout);
        }
        if self.count(Cell::Exit) == 0 {
            return Err(Error::MissingLayoutFeature { what: "exit 'E'" });
        }
        if self.count(Cell::Trash) == 0 {
            return Err(Error::MissingLayoutFeature { what: "trash 'T'" });
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn agent_start(&self) -> Position {
        self.agent_start
    }

    pub fn adversary_start(&self) -> Position {
        self.adversary_start
    }

    /// Number of cells holding the given content
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Render back to the character grid accepted by [`Layout::parse`]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x as i32, y as i32);
                let c = if pos == self.agent_start {
                    'A'
                } else if pos == self.adversary_start {
                    'R'
                } else {
                    self.cells[y * self.width + x].as_char()
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::classic()
    }
}

fn single(found: &[Position], what: &'static str) -> Result<Position> {
    match found {
        [pos] => Ok(*pos),
        _ => Err(Error::LayoutMarkerCount {
            what,
            found: found.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout() {
        let layout = Layout::classic();
        assert_eq!(layout.width(), 6);
        assert_eq!(layout.height(), 6);
        assert_eq!(layout.count(Cell::Wall), 3);
        assert_eq!(layout.count(Cell::Trash), 3);
        assert_eq!(layout.count(Cell::Hazard), 2);
        assert_eq!(layout.count(Cell::Exit), 1);
        assert_eq!(layout.agent_start(), Position::new(0, 0));
        assert_eq!(layout.adversary_start(), Position::new(3, 3));
        // (row 2, col 3) is a wall
        assert_eq!(layout.cells()[2 * 6 + 3], Cell::Wall);
    }

    #[test]
    fn test_parse_classic_text() {
        let text = Layout::classic().to_text();
        let parsed = Layout::parse(&text).unwrap();
        assert_eq!(parsed, Layout::classic());
    }

    #[test]
    fn test_parse_ignores_blank_lines_and_indentation() {
        let layout = Layout::parse("\n   A.T\n   .RE\n\n").unwrap();
        assert_eq!(layout.width(), 3);
        assert_eq!(layout.height(), 2);
        assert_eq!(layout.adversary_start(), Position::new(1, 1));
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = Layout::parse("A.T\n.RE.").unwrap_err();
        assert!(matches!(err, Error::RaggedLayout { row: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_characters() {
        let err = Layout::parse("A.T\n.?E\nR..").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLayoutCharacter {
                character: '?',
                row: 1,
                column: 1
            }
        ));
    }

    #[test]
    fn test_parse_requires_both_robots() {
        assert!(matches!(
            Layout::parse("..T\n.RE").unwrap_err(),
            Error::LayoutMarkerCount { found: 0, .. }
        ));
        assert!(matches!(
            Layout::parse("A.T\nARE").unwrap_err(),
            Error::LayoutMarkerCount { found: 2, .. }
        ));
    }

    #[test]
    fn test_parse_requires_exit_and_trash() {
        assert!(matches!(
            Layout::parse("A.T\n.R.").unwrap_err(),
            Error::MissingLayoutFeature { .. }
        ));
        assert!(matches!(
            Layout::parse("A..\n.RE").unwrap_err(),
            Error::MissingLayoutFeature { .. }
        ));
    }

    #[test]
    fn test_empty_layout() {
        assert!(matches!(Layout::parse("  \n").unwrap_err(), Error::EmptyLayout));
    }
}
