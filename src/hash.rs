use std::fmt::{Debug, Formatter};

use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro64StarStar;

use crate::color::Color;
use crate::point::{Point, VIRTUAL_BOARD_POINTS};

/// Incrementally maintained fingerprint of the stone layout.
///
/// Every color change at a point XORs the old value out and the new one in, so the hash
/// is a pure function of the final layout, independent of move order. Collisions in the
/// 64-bit space are accepted as statistically negligible.
#[derive(Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Zobrist(u64);

impl Debug for Zobrist {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print hex, full-width with leading 0x
        write!(f, "Zobrist({:#018x})", self.0)
    }
}

impl std::ops::BitXor for Zobrist {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Zobrist(self.0 ^ rhs.0)
    }
}

impl std::ops::BitXorAssign for Zobrist {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// zobrist values are already uniformly random, maps keyed by them can skip re-hashing
impl nohash_hasher::IsEnabled for Zobrist {}

const COLOR_COUNT: usize = 3;

fn color_row(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
        Color::Empty => 2,
        Color::Guard => unreachable!("guard cells are never hashed"),
    }
}

/// One independent random value per (virtual point, color) pair.
///
/// The table is read-only after construction and can be shared across any number of
/// boards and threads. Boards only hash-compare meaningfully when they share a table.
pub struct ZobristTable {
    values: Vec<[Zobrist; COLOR_COUNT]>,
}

impl ZobristTable {
    /// Fill a table from a deterministically seeded generator.
    pub fn new_seeded(seed: u64) -> ZobristTable {
        let mut rng = Xoroshiro64StarStar::seed_from_u64(seed);
        let values = (0..VIRTUAL_BOARD_POINTS)
            .map(|_| {
                let mut row = [Zobrist::default(); COLOR_COUNT];
                for value in row.iter_mut() {
                    *value = Zobrist(rng.gen());
                }
                row
            })
            .collect();
        ZobristTable { values }
    }

    pub fn value(&self, p: Point, color: Color) -> Zobrist {
        self.values[p.index() as usize][color_row(color)]
    }
}

impl Debug for ZobristTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZobristTable({} points)", self.values.len())
    }
}

lazy_static! {
    static ref DEFAULT_TABLE: ZobristTable = ZobristTable::new_seeded(0);
}

/// The process-wide table used by [`GoBoard::new`](crate::GoBoard::new).
///
/// Initialized on first use with a fixed seed, so hashes are reproducible across runs.
pub fn zobrist_table() -> &'static ZobristTable {
    &DEFAULT_TABLE
}
