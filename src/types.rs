//! Fundamental chess types shared across the engine: sides, piece kinds,
//! squares and the seed that fixes Zobrist/magic reproducibility.

use std::fmt;

/// Process-wide PRNG seed. Keeping this a constant (rather than sampling
/// `rand::thread_rng`) means Zobrist keys, magic numbers, and therefore
/// transposition-table layout are identical from run to run — required for
/// the reproducibility property in spec.md §5.
pub const RNG_SEED: u64 = 0x5EED_C0FF_EE15_B00Bu64;

/// Checkmate score magnitude (spec.md §4.I). A mate-in-`n` plies is
/// reported as `MATE - n`; `-MATE + n` from the losing side's view.
pub const MATE: i32 = 30_000;

/// Search depth/ply ceiling used to bound the "is this a mate score"
/// test in the transposition table's ply adjustment (spec.md §4.G) and
/// to size killer-move tables (spec.md §4.H).
pub const MAX_PLY: usize = 128;

/// Sentinel returned by search functions when the deadline has elapsed
/// mid-search (spec.md §4.I, §7); chosen outside the normal centipawn
/// score range so callers can distinguish it unambiguously.
pub const OUT_OF_TIME: i32 = i32::MIN + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[inline]
    #[must_use]
    pub const fn other(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[must_use]
    pub const fn from_index(idx: usize) -> Option<PieceKind> {
        match idx {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_char(self, side: Side) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, side))
    }

    /// Material value in centipawns, used for move ordering and SEE-ish
    /// defendedness checks (not for the tapered evaluator, which uses its
    /// own PeSTO tables).
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
        }
    }

    /// Game-phase weight contributed by one piece of this kind (spec.md
    /// §4.D): knight=1, bishop=1, rook=2, queen=4, pawn/king=0.
    #[inline]
    #[must_use]
    pub const fn phase_weight(self) -> i32 {
        match self {
            PieceKind::Pawn | PieceKind::King => 0,
            PieceKind::Knight | PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 4,
        }
    }
}

/// A board square, 0..=63. Index convention: `square = rank * 8 + file`,
/// with `file 0 = a-file` and `rank 0 = rank 1`. (spec.md §3 explicitly
/// permits any convention provided the FEN/UCI boundary stays bit-exact;
/// this is the conventional one and matches the teacher's `Square(rank,
/// file)` pair encoding.)
pub type Square = u8;

#[inline]
#[must_use]
pub const fn square_of(rank: u8, file: u8) -> Square {
    rank * 8 + file
}

#[inline]
#[must_use]
pub const fn rank_of(sq: Square) -> u8 {
    sq / 8
}

#[inline]
#[must_use]
pub const fn file_of(sq: Square) -> u8 {
    sq % 8
}

/// Render a square in algebraic notation, e.g. `28 -> "e4"`.
#[must_use]
pub fn square_to_algebraic(sq: Square) -> String {
    let file = (b'a' + file_of(sq)) as char;
    let rank = (b'1' + rank_of(sq)) as char;
    format!("{file}{rank}")
}

/// Parse algebraic notation into a square, e.g. `"e4" -> 28`.
#[must_use]
pub fn square_from_algebraic(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }
    Some(square_of(rank - b'1', file - b'a'))
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}
