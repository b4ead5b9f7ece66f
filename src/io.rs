use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::board::GoBoard;
use crate::color::Color;
use crate::point::{board_points, Point, MAX_BOARD_SIZE};

// By convention 'I' is skipped because it can be confused with "1".
const COLUMN_NAMES: &[u8] = b"ABCDEFGHJKLMNOPQRST";

/// Parse failure marker for the [`FromStr`] form of coordinate parsing.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct InvalidPoint;

/// Parse a board point from a string such as `"D4"` or `"Q16"`, case-insensitive;
/// `"pass"` parses to [`Point::PASS`]. Malformed input yields [`Point::INVALID`]
/// instead of an error, callers must check before use.
pub fn parse_point(s: &str) -> Point {
    if s.eq_ignore_ascii_case("pass") {
        return Point::PASS;
    }
    if s.len() < 2 || s.len() > 3 || !s.is_ascii() {
        return Point::INVALID;
    }

    let col_char = s.as_bytes()[0].to_ascii_uppercase();
    let x = match COLUMN_NAMES.iter().position(|&c| c == col_char) {
        Some(x) => x as u8,
        None => return Point::INVALID,
    };

    let row: u32 = match s[1..].parse() {
        Ok(row) => row,
        Err(_) => return Point::INVALID,
    };
    if row == 0 || row > MAX_BOARD_SIZE as u32 {
        return Point::INVALID;
    }

    Point::from_xy(x, row as u8 - 1)
}

impl FromStr for Point {
    type Err = InvalidPoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p = parse_point(s);
        if p == Point::INVALID {
            Err(InvalidPoint)
        } else {
            Ok(p)
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if *self == Point::PASS {
            return write!(f, "pass");
        }
        match self.to_xy() {
            Some((x, y)) => write!(f, "{}{}", COLUMN_NAMES[x as usize] as char, y + 1),
            None => write!(f, "invalid"),
        }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({}, {})", self.index(), self)
    }
}

lazy_static! {
    static ref NAMED_POINTS: HashMap<String, Point> = {
        let mut map = HashMap::new();
        for p in board_points(MAX_BOARD_SIZE) {
            map.insert(p.to_string(), p);
        }
        map.insert("PASS".to_owned(), Point::PASS);
        map
    };
}

/// Look up a well-known point by name (`"D4"`, `"Q16"`, `"pass"`), resolved through the
/// same mapping as [`parse_point`] and memoized process-wide. Unknown names yield
/// [`Point::INVALID`].
pub fn named_point(name: &str) -> Point {
    NAMED_POINTS
        .get(&name.to_ascii_uppercase())
        .copied()
        .unwrap_or(Point::INVALID)
}

impl GoBoard {
    /// Build a 19x19 board by playing out a text diagram.
    ///
    /// `'X'` places a black stone, `'O'` a white stone and `'+'` explicitly skips a cell;
    /// the first character of the first line maps to A1, the second to B1, and each
    /// following line is the next row. Leading spaces are allowed for indentation but
    /// forbidden once stone characters have started on a line; any other character is a
    /// contract violation.
    ///
    /// ```
    /// use go_board::{named_point, Color, GoBoard};
    ///
    /// let board = GoBoard::from_diagram("++++X\n+++XO");
    /// assert_eq!(board.point_color(named_point("E1")), Color::Black);
    /// assert_eq!(board.point_color(named_point("E2")), Color::White);
    /// ```
    pub fn from_diagram(s: &str) -> GoBoard {
        let mut board = GoBoard::new(MAX_BOARD_SIZE);

        for (y, line) in s.lines().enumerate() {
            let mut x = 0u8;
            let mut stones_started = false;
            for c in line.chars() {
                match c {
                    ' ' => assert!(!stones_started, "indentation after stones in {:?}", line),
                    'X' => {
                        stones_started = true;
                        board.play(Point::from_xy(x, y as u8), Color::Black);
                        x += 1;
                    }
                    'O' => {
                        stones_started = true;
                        board.play(Point::from_xy(x, y as u8), Color::White);
                        x += 1;
                    }
                    '+' => x += 1,
                    _ => panic!("unexpected character {:?} in diagram line {:?}", c, line),
                }
            }
        }

        board
    }

    fn write_debug(&self, f: &mut Formatter) -> std::fmt::Result {
        let ko = match self.last_ko_point() {
            Some(ko) => ko.to_string(),
            None => "none".to_owned(),
        };
        write!(
            f,
            "GoBoard(size={}, stones_b={}, stones_w={}, ko={}, zobrist={:?})",
            self.size(),
            self.stone_count_of(Color::Black),
            self.stone_count_of(Color::White),
            ko,
            self.zobrist(),
        )
    }
}

impl Debug for GoBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_debug(f)
    }
}

impl Display for GoBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.write_debug(f)?;
        writeln!(f)?;

        let size = self.size();
        for y in (0..size).rev() {
            write!(f, "{:2} ", y + 1)?;
            for x in 0..size {
                write!(f, "{}", self.point_color(Point::from_xy(x, y)).char())?;
            }
            writeln!(f)?;
        }

        write!(f, "   ")?;
        for x in 0..size {
            write!(f, "{}", COLUMN_NAMES[x as usize] as char)?;
        }
        writeln!(f)?;

        Ok(())
    }
}
