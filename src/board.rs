use std::hash::{Hash, Hasher};

use itertools::Itertools;

use crate::chain::Chain;
use crate::color::Color;
use crate::hash::{zobrist_table, Zobrist, ZobristTable};
use crate::point::{board_points, Point, MAX_BOARD_SIZE, VIRTUAL_BOARD_POINTS};
use crate::stack_vec::StackVec4;

/// Per-point bookkeeping: the owning chain's canonical head and the next point in the
/// circular list threading all points of the same chain through the flat array.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Vertex {
    chain_head: Point,
    chain_next: Point,
    color: Color,
}

/// A Go board of a fixed size.
///
/// The playable area lives inside a virtual grid with a permanent guard ring, so
/// neighbour traversal needs no bounds checks. Every point belongs to a chain (stones to
/// their connected group, empty points to a singleton tracking their adjacent empties),
/// identified by its head point and threaded as a circular linked list.
///
/// The only mutating operation is [`play`](GoBoard::play); [`is_legal_move`](GoBoard::is_legal_move)
/// is the pure predicate gating it. Callers that skip the legality check and play an
/// illegal move violate the contract and get a panic, not an error value.
#[derive(Clone)]
pub struct GoBoard {
    size: u8,
    vertices: Vec<Vertex>,
    chains: Vec<Chain>,
    last_ko_point: Point,
    last_captures: StackVec4,
    zobrist: Zobrist,
    table: &'static ZobristTable,
}

impl GoBoard {
    /// Build an empty board hashing with the process-wide default table.
    pub fn new(size: u8) -> GoBoard {
        GoBoard::new_with_table(size, zobrist_table())
    }

    /// Build an empty board hashing with an explicitly provided table.
    pub fn new_with_table(size: u8, table: &'static ZobristTable) -> GoBoard {
        assert!(
            1 <= size && size <= MAX_BOARD_SIZE,
            "board size {} out of range 1..={}",
            size,
            MAX_BOARD_SIZE,
        );

        let vertices = (0..VIRTUAL_BOARD_POINTS)
            .map(|index| Vertex {
                chain_head: Point::new(index),
                chain_next: Point::new(index),
                color: Color::Guard,
            })
            .collect();
        let chains = vec![Chain::guard(); VIRTUAL_BOARD_POINTS as usize];

        let mut board = GoBoard {
            size,
            vertices,
            chains,
            last_ko_point: Point::INVALID,
            last_captures: StackVec4::new(),
            zobrist: Zobrist::default(),
            table,
        };

        for p in board_points(size) {
            board.vertex_mut(p).color = Color::Empty;
            board.chains[p.index() as usize].reset();
        }
        for p in board_points(size) {
            for n in p.neighbours() {
                if board.is_empty(n) {
                    board.chains[p.index() as usize].add_liberty(n);
                }
            }
        }

        board
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn area(&self) -> u16 {
        self.size as u16 * self.size as u16
    }

    pub fn point_color(&self, p: Point) -> Color {
        self.vertex(p).color
    }

    pub fn is_empty(&self, p: Point) -> bool {
        self.point_color(p) == Color::Empty
    }

    pub fn in_board_area(&self, p: Point) -> bool {
        match p.to_xy() {
            Some((x, y)) => x < self.size && y < self.size,
            None => false,
        }
    }

    /// Head of the chain containing `p`; each chain has exactly one head that uniquely
    /// identifies it. Heads may change over successive [`play`](GoBoard::play) calls.
    pub fn chain_head(&self, p: Point) -> Point {
        self.vertex(p).chain_head
    }

    /// Number of stones in the chain containing `p`.
    pub fn chain_size(&self, p: Point) -> u16 {
        self.chain(p).num_stones
    }

    /// The liberty count of the chain containing `p`: exact for 0 and 1, an upper bound
    /// on the number of distinct liberties otherwise.
    pub fn pseudo_liberty(&self, p: Point) -> u16 {
        let chain = self.chain(p);
        if chain.num_pseudo_liberties == 0 {
            0
        } else if chain.in_atari() {
            1
        } else {
            chain.num_pseudo_liberties
        }
    }

    pub fn in_atari(&self, p: Point) -> bool {
        self.chain(p).in_atari()
    }

    /// The sole liberty of the chain containing `p`, which must be in atari.
    pub fn single_liberty(&self, p: Point) -> Point {
        let head = self.chain_head(p);
        let liberty = self.chain(p).single_liberty();

        // check that the recovered coordinate really is a liberty of this chain
        assert!(self.in_board_area(liberty) && self.is_empty(liberty));
        assert!(
            liberty.neighbours().any(|n| self.chain_head(n) == head),
            "{} does not border the chain of {}",
            liberty,
            p,
        );

        liberty
    }

    /// The point where immediate recapture is forbidden, if the last move created a ko.
    pub fn last_ko_point(&self) -> Option<Point> {
        if self.last_ko_point == Point::INVALID {
            None
        } else {
            Some(self.last_ko_point)
        }
    }

    /// Former heads of the chains captured by the last stone placement.
    pub fn last_captures(&self) -> &StackVec4 {
        &self.last_captures
    }

    pub fn zobrist(&self) -> Zobrist {
        self.zobrist
    }

    pub fn stone_count(&self) -> u16 {
        board_points(self.size)
            .filter(|&p| self.point_color(p).is_stone())
            .count() as u16
    }

    pub fn stone_count_of(&self, color: Color) -> u16 {
        board_points(self.size).filter(|&p| self.point_color(p) == color).count() as u16
    }

    /// All points of the chain containing `p`, starting at `p` itself.
    pub fn chain_points(&self, p: Point) -> ChainPoints<'_> {
        ChainPoints {
            board: self,
            start: p,
            next: Some(p),
        }
    }

    /// Whether placing a `color` stone at `p` is legal: the point is empty, not the ko
    /// point, and the move is not suicide. Passing is always legal.
    pub fn is_legal_move(&self, p: Point, color: Color) -> bool {
        debug_assert!(color.is_stone());

        if p == Point::PASS {
            return true;
        }
        if !self.in_board_area(p) {
            return false;
        }
        if !self.is_empty(p) || p == self.last_ko_point {
            return false;
        }
        if self.chain(p).num_pseudo_liberties > 0 {
            return true;
        }

        // from here on the new stone would be completely surrounded by stones and border

        // connecting to a friendly chain that keeps a liberty afterwards is fine
        for n in p.neighbours() {
            if self.point_color(n) == color && !self.chain(n).in_atari() {
                return true;
            }
        }

        // capturing at least one enemy chain frees a liberty
        for n in p.neighbours() {
            if self.point_color(n) == color.opponent() && self.chain(n).in_atari() {
                return true;
            }
        }

        false
    }

    /// Apply a move. `p` must be [`Point::PASS`] or a currently-empty in-board point,
    /// and the move must not be suicide; both are contract violations otherwise, see
    /// [`is_legal_move`](GoBoard::is_legal_move).
    pub fn play(&mut self, p: Point, color: Color) {
        debug_assert!(color.is_stone());

        if p == Point::PASS {
            self.last_ko_point = Point::INVALID;
            return;
        }

        assert!(
            self.in_board_area(p) && self.is_empty(p),
            "playing {} on a non-empty point",
            p,
        );

        // ko detection needs to know, before any mutation, whether every neighbour was an
        // enemy stone or border
        let played_in_enemy_eye = p.neighbours().all(|n| {
            let nc = self.point_color(n);
            nc != color && nc != Color::Empty
        });

        self.join_chains_around(p, color);
        self.set_stone(p, color);
        self.remove_liberty_from_neighbouring_chains(p);
        let stones_captured = self.capture_dead_chains(p, color);

        if played_in_enemy_eye && stones_captured == 1 {
            self.last_ko_point = self.last_captures[0];
        } else {
            self.last_ko_point = Point::INVALID;
        }

        assert!(
            self.chain(p).num_pseudo_liberties > 0,
            "suicide: {:?} {} on\n{}",
            color,
            p,
            self,
        );
    }

    fn vertex(&self, p: Point) -> &Vertex {
        &self.vertices[p.index() as usize]
    }

    fn vertex_mut(&mut self, p: Point) -> &mut Vertex {
        &mut self.vertices[p.index() as usize]
    }

    fn chain(&self, p: Point) -> &Chain {
        &self.chains[self.chain_head(p).index() as usize]
    }

    fn chain_mut_at(&mut self, head: Point) -> &mut Chain {
        &mut self.chains[head.index() as usize]
    }

    fn set_stone(&mut self, p: Point, color: Color) {
        if color == Color::Empty {
            self.zobrist ^= self.table.value(p, self.point_color(p));
        } else {
            self.zobrist ^= self.table.value(p, color);
        }
        self.vertex_mut(p).color = color;
    }

    /// Connect the friendly chains around a newly placed stone into one and thread the
    /// stone itself into the surviving chain's list.
    fn join_chains_around(&mut self, p: Point, color: Color) {
        // find the biggest friendly chain; ties go to the first one encountered
        let mut largest_head = Point::INVALID;
        let mut largest_size = 0;
        for n in p.neighbours() {
            if self.point_color(n) == color {
                let chain = self.chain(n);
                if chain.num_stones > largest_size {
                    largest_size = chain.num_stones;
                    largest_head = self.chain_head(n);
                }
            }
        }

        if largest_size == 0 {
            self.init_new_chain(p);
            return;
        }

        for n in p.neighbours() {
            if self.point_color(n) == color {
                let n_head = self.chain_head(n);
                if n_head != largest_head {
                    let absorbed = *self.chain(n);
                    self.chain_mut_at(largest_head).merge(&absorbed);

                    // relabel every stone of the absorbed chain
                    let mut cur = n;
                    loop {
                        self.vertex_mut(cur).chain_head = largest_head;
                        cur = self.vertex(cur).chain_next;
                        if cur == n {
                            break;
                        }
                    }

                    // splice the two circular lists by swapping their next pointers
                    let largest_next = self.vertex(largest_head).chain_next;
                    let n_next = self.vertex(n).chain_next;
                    self.vertex_mut(largest_head).chain_next = n_next;
                    self.vertex_mut(n).chain_next = largest_next;
                }
            }
        }

        let head_next = self.vertex(largest_head).chain_next;
        self.vertex_mut(p).chain_next = head_next;
        self.vertex_mut(largest_head).chain_next = p;
        self.vertex_mut(p).chain_head = largest_head;
        self.chain_mut_at(largest_head).num_stones += 1;

        for n in p.neighbours() {
            if self.is_empty(n) {
                self.chain_mut_at(largest_head).add_liberty(n);
            }
        }
    }

    /// The played point is no longer empty: remove one liberty instance of it from every
    /// neighbouring chain, including the empty neighbours' singleton chains.
    fn remove_liberty_from_neighbouring_chains(&mut self, p: Point) {
        for n in p.neighbours() {
            let head = self.chain_head(n);
            self.chain_mut_at(head).remove_liberty(p);
        }
    }

    /// Remove every opposing chain left without liberties, recording the former heads.
    /// Returns the total number of stones taken off the board.
    fn capture_dead_chains(&mut self, p: Point, color: Color) -> u16 {
        let mut stones_captured = 0;
        self.last_captures.clear();

        for n in p.neighbours() {
            if self.point_color(n) == color.opponent() && self.chain(n).num_pseudo_liberties == 0 {
                let head = self.chain_head(n);
                self.last_captures.push(head);
                stones_captured += self.chains[head.index() as usize].num_stones;
                self.remove_chain(n);
            }
        }

        stones_captured
    }

    /// Clear every stone of the chain containing `p`, re-seeding each vacated point as a
    /// singleton empty chain and handing a liberty back to each surviving neighbour chain.
    fn remove_chain(&mut self, p: Point) {
        let removed_head = self.chain_head(p);

        let mut cur = p;
        loop {
            let next = self.vertex(cur).chain_next;

            self.set_stone(cur, Color::Empty);
            self.init_new_chain(cur);

            for n in cur.neighbours() {
                if self.chain_head(n) != removed_head || self.is_empty(n) {
                    let head = self.chain_head(n);
                    self.chain_mut_at(head).add_liberty(cur);
                }
            }

            cur = next;
            if cur == p {
                break;
            }
        }
    }

    /// Reset `p` to a singleton chain seeded with its currently-empty neighbours.
    fn init_new_chain(&mut self, p: Point) {
        self.vertex_mut(p).chain_head = p;
        self.vertex_mut(p).chain_next = p;

        let mut chain = Chain::new();
        chain.num_stones = 1;
        for n in p.neighbours() {
            if self.is_empty(n) {
                chain.add_liberty(n);
            }
        }
        self.chains[p.index() as usize] = chain;
    }

    /// Expensive cross-check of every board invariant, meant for tests.
    pub fn assert_valid(&self) {
        // the guard ring (and the unused part of the virtual grid) is untouchable
        for index in 0..VIRTUAL_BOARD_POINTS {
            let p = Point::new(index);
            if self.in_board_area(p) {
                continue;
            }
            assert_eq!(Color::Guard, self.point_color(p));
            let chain = &self.chains[p.index() as usize];
            assert!(chain.num_pseudo_liberties > 0);
            assert!(!chain.in_atari());
        }

        let mut expected_zobrist = Zobrist::default();
        let mut stones_total = 0usize;
        let mut stones_walked = 0usize;

        for p in board_points(self.size) {
            let color = self.point_color(p);
            match color {
                Color::Empty => {
                    // empty points are their own singleton chain tracking adjacent empties
                    assert_eq!(p, self.chain_head(p));
                    assert_eq!(p, self.vertex(p).chain_next);

                    let mut expected = Chain::new();
                    for n in p.neighbours() {
                        if self.is_empty(n) {
                            expected.add_liberty(n);
                        }
                    }
                    let slot = &self.chains[p.index() as usize];
                    assert_eq!(expected.num_pseudo_liberties, slot.num_pseudo_liberties);
                    assert_eq!(expected.liberty_vertex_sum, slot.liberty_vertex_sum);
                    assert_eq!(expected.liberty_vertex_sum_squared, slot.liberty_vertex_sum_squared);
                }
                Color::Black | Color::White => {
                    expected_zobrist ^= self.table.value(p, color);
                    stones_total += 1;

                    if self.chain_head(p) != p {
                        continue;
                    }

                    // canonical head: walk the circular list once and recompute the stats
                    let points = self.chain_points(p).collect_vec();
                    assert!(points.iter().all_unique());
                    stones_walked += points.len();

                    let mut expected = Chain::new();
                    expected.num_stones = points.len() as u16;
                    for &q in &points {
                        assert_eq!(color, self.point_color(q));
                        assert_eq!(p, self.chain_head(q));
                        for n in q.neighbours() {
                            if self.is_empty(n) {
                                expected.add_liberty(n);
                            }
                        }
                    }
                    assert_eq!(expected, self.chains[p.index() as usize]);
                }
                Color::Guard => unreachable!("guard cell inside the board area"),
            }
        }

        // every stone must be reachable from exactly one chain head
        assert_eq!(stones_total, stones_walked);
        assert_eq!(expected_zobrist, self.zobrist);

        if let Some(ko) = self.last_ko_point() {
            assert!(self.in_board_area(ko) && self.is_empty(ko));
        }
    }
}

/// Iterator over the points of one chain, following the circular list.
#[derive(Debug)]
pub struct ChainPoints<'a> {
    board: &'a GoBoard,
    start: Point,
    next: Option<Point>,
}

impl<'a> Iterator for ChainPoints<'a> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let curr = self.next?;
        let next = self.board.vertex(curr).chain_next;
        self.next = if next == self.start { None } else { Some(next) };
        Some(curr)
    }
}

impl Eq for GoBoard {}

impl PartialEq for GoBoard {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.zobrist == other.zobrist
            && self.last_ko_point == other.last_ko_point
            && board_points(self.size).all(|p| self.point_color(p) == other.point_color(p))
    }
}

impl Hash for GoBoard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.zobrist().hash(state);
    }
}
