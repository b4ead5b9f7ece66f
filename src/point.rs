use static_assertions::const_assert;

/// Largest supported board edge.
pub const MAX_BOARD_SIZE: u8 = 19;

/// Side of the virtual grid: the playable area plus one guard cell on each side.
pub const VIRTUAL_BOARD_SIZE: u16 = MAX_BOARD_SIZE as u16 + 2;

/// Total number of cells in the virtual grid.
pub const VIRTUAL_BOARD_POINTS: u16 = VIRTUAL_BOARD_SIZE * VIRTUAL_BOARD_SIZE;

// keep headroom between real indices and the sentinel values
const_assert!(VIRTUAL_BOARD_POINTS < u16::MAX - 8);

const NEIGHBOUR_OFFSETS: [i32; 4] = [
    -(VIRTUAL_BOARD_SIZE as i32), // down
    -1,                           // left
    1,                            // right
    VIRTUAL_BOARD_SIZE as i32,    // up
];

/// A point on the virtual board grid, stored as a flat index.
///
/// The playable area sits inside a guard ring, so the four orthogonal neighbours of any
/// in-board point are themselves valid indices. Two sentinel values exist outside the
/// grid: [`Point::PASS`] for the pass move and [`Point::INVALID`] for parse failures,
/// empty capture slots and "no ko point".
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Point(u16);

impl Point {
    /// Result of parsing malformed input; also used internally as an empty-slot marker.
    pub const INVALID: Point = Point(u16::MAX);

    /// The pass move, encoded one past the virtual grid so it never indexes board storage.
    pub const PASS: Point = Point(VIRTUAL_BOARD_POINTS);

    pub fn new(index: u16) -> Point {
        assert!(
            index < VIRTUAL_BOARD_POINTS,
            "point index {} outside the virtual grid",
            index
        );
        Point(index)
    }

    /// Build a point from 0-based board coordinates.
    pub fn from_xy(x: u8, y: u8) -> Point {
        assert!(
            x < MAX_BOARD_SIZE && y < MAX_BOARD_SIZE,
            "coordinates ({}, {}) too large, max={}",
            x,
            y,
            MAX_BOARD_SIZE,
        );
        Point((y as u16 + 1) * VIRTUAL_BOARD_SIZE + (x as u16 + 1))
    }

    /// 0-based board coordinates, `None` for sentinels and guard cells.
    pub fn to_xy(self) -> Option<(u8, u8)> {
        if self == Point::INVALID || self == Point::PASS {
            return None;
        }
        let x = self.0 % VIRTUAL_BOARD_SIZE;
        let y = self.0 / VIRTUAL_BOARD_SIZE;
        if x == 0 || x > MAX_BOARD_SIZE as u16 || y == 0 || y > MAX_BOARD_SIZE as u16 {
            None
        } else {
            Some((x as u8 - 1, y as u8 - 1))
        }
    }

    pub fn index(self) -> u16 {
        self.0
    }

    /// The four orthogonal neighbours in a fixed order (down, left, right, up).
    ///
    /// Only meaningful for points inside the playable area; the guard ring guarantees
    /// every result is a valid grid index.
    pub fn neighbours(self) -> impl Iterator<Item = Point> + Clone {
        let index = self.0 as i32;
        NEIGHBOUR_OFFSETS.iter().map(move |&d| Point((index + d) as u16))
    }
}

/// All in-board points of a `size`-wide board, row-major from A1.
pub fn board_points(size: u8) -> impl Iterator<Item = Point> {
    assert!(size <= MAX_BOARD_SIZE);
    (0..size).flat_map(move |y| (0..size).map(move |x| Point::from_xy(x, y)))
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn xy_roundtrip() {
        for p in board_points(MAX_BOARD_SIZE) {
            let (x, y) = p.to_xy().unwrap();
            assert_eq!(p, Point::from_xy(x, y));
        }

        assert_eq!(None, Point::PASS.to_xy());
        assert_eq!(None, Point::INVALID.to_xy());
        // guard corner
        assert_eq!(None, Point::new(0).to_xy());
    }

    #[test]
    fn board_point_count() {
        for &size in &[9u8, 13, 19] {
            let points = board_points(size).collect_vec();
            assert_eq!(size as usize * size as usize, points.len());
            assert!(points.iter().all_unique());
        }
    }

    #[test]
    fn neighbour_order() {
        let p = Point::from_xy(3, 3);
        let expected = vec![
            Point::from_xy(3, 2),
            Point::from_xy(2, 3),
            Point::from_xy(4, 3),
            Point::from_xy(3, 4),
        ];
        assert_eq!(expected, p.neighbours().collect_vec());
    }

    #[test]
    fn corner_neighbours_stay_in_grid() {
        for &(x, y) in &[(0u8, 0u8), (18, 0), (0, 18), (18, 18)] {
            for n in Point::from_xy(x, y).neighbours() {
                assert!(n.index() < VIRTUAL_BOARD_POINTS);
            }
        }
    }
}
