//! Magic bitboards for sliding-piece (rook/bishop) attack generation.
//!
//! At startup, for every square and both slider kinds, a *magic number* is
//! found by sampling sparse random candidates and testing each against
//! every subset of the square's relevant-blocker mask (Carry-Rippler
//! enumeration): a candidate is valid iff no two distinct blocker subsets
//! that produce *different* attack sets map to the same table index. Once
//! found, `attacks = table[((occupancy & mask) * magic) >> (64 - bits)]`
//! is a single multiply, shift and array load.
//!
//! Grounded in the original engine's `magic.c` (blocker-mask construction
//! by ray-walking, `(occ & mask) * magic >> shift` indexing) and in the
//! teacher's `src/magic/magic.rs` lazy-table-building style, but this
//! module performs a genuine magic-number search rather than the
//! teacher's flattened perfect-hash table.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::types::{file_of, rank_of, Square, RNG_SEED};

/// Draws three words and ANDs them together, producing a sparse magic-
/// number candidate (few set bits -> fewer collisions to rule out).
fn sparse_u64(rng: &mut StdRng) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

const ROOK_BITS: [u8; 64] = compute_rook_relevant_bits();
const BISHOP_BITS: [u8; 64] = compute_bishop_relevant_bits();

const fn compute_rook_relevant_bits() -> [u8; 64] {
    let mut out = [0u8; 64];
    let mut sq = 0usize;
    while sq < 64 {
        out[sq] = rook_mask(sq as Square).count_ones() as u8;
        sq += 1;
    }
    out
}

const fn compute_bishop_relevant_bits() -> [u8; 64] {
    let mut out = [0u8; 64];
    let mut sq = 0usize;
    while sq < 64 {
        out[sq] = bishop_mask(sq as Square).count_ones() as u8;
        sq += 1;
    }
    out
}

/// Relevant blocker mask for a rook on `sq`: the four rays, excluding the
/// edge square each ray terminates on (an edge blocker can never hide a
/// square beyond it, so it's irrelevant to the index).
const fn rook_mask(sq: Square) -> u64 {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut mask = 0u64;

    let mut r = rank + 1;
    while r < 7 {
        mask |= 1u64 << (r * 8 + file);
        r += 1;
    }
    let mut r = rank - 1;
    while r > 0 {
        mask |= 1u64 << (r * 8 + file);
        r -= 1;
    }
    let mut f = file + 1;
    while f < 7 {
        mask |= 1u64 << (rank * 8 + f);
        f += 1;
    }
    let mut f = file - 1;
    while f > 0 {
        mask |= 1u64 << (rank * 8 + f);
        f -= 1;
    }
    mask
}

/// Relevant blocker mask for a bishop on `sq`: the four diagonal rays,
/// excluding the border ring.
const fn bishop_mask(sq: Square) -> u64 {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut mask = 0u64;

    let (mut r, mut f) = (rank + 1, file + 1);
    while r < 7 && f < 7 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f += 1;
    }
    let (mut r, mut f) = (rank + 1, file - 1);
    while r < 7 && f > 0 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f -= 1;
    }
    let (mut r, mut f) = (rank - 1, file + 1);
    while r > 0 && f < 7 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f += 1;
    }
    let (mut r, mut f) = (rank - 1, file - 1);
    while r > 0 && f > 0 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f -= 1;
    }
    mask
}

/// Compute the *true* attack set for a slider on `sq` given `occupancy`,
/// by walking each ray until (and including) the first blocker.
fn rook_attacks_on_the_fly(sq: Square, occupancy: u64) -> u64 {
    slide(sq, occupancy, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
}

fn bishop_attacks_on_the_fly(sq: Square, occupancy: u64) -> u64 {
    slide(sq, occupancy, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
}

fn slide(sq: Square, occupancy: u64, directions: &[(i32, i32)]) -> u64 {
    let rank = rank_of(sq) as i32;
    let file = file_of(sq) as i32;
    let mut attacks = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Enumerate every subset of `mask` via the Carry-Rippler trick.
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

const MAX_CANDIDATES: u32 = 1 << 24;

/// Search for a magic number for `sq` given its blocker `mask` and index
/// width `bits`. Returns the magic and the filled attack table (sized
/// `1 << bits`, but the caller pads it up to the fixed per-square capacity).
fn find_magic(
    sq: Square,
    mask: u64,
    bits: u8,
    on_the_fly: fn(Square, u64) -> u64,
    rng: &mut StdRng,
) -> (u64, Vec<u64>) {
    let subsets = subsets_of(mask);
    let attack_sets: Vec<u64> = subsets.iter().map(|&occ| on_the_fly(sq, occ)).collect();
    let table_size = 1usize << bits;

    for _ in 0..MAX_CANDIDATES {
        let magic = sparse_u64(rng);
        // A magic number with too few of its top bits set can't possibly
        // spread an n-bit mask over the full index space; skip early.
        if ((mask.wrapping_mul(magic)) >> 56).count_ones() < 6 {
            continue;
        }

        let mut table = vec![u64::MAX; table_size]; // MAX = "unfilled" sentinel
        let mut ok = true;
        for (i, &occ) in subsets.iter().enumerate() {
            let index = ((occ.wrapping_mul(magic)) >> (64 - bits)) as usize;
            let attacks = attack_sets[i];
            match table[index] {
                u64::MAX => table[index] = attacks,
                existing if existing == attacks => {}
                _ => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            for slot in &mut table {
                if *slot == u64::MAX {
                    *slot = 0;
                }
            }
            return (magic, table);
        }
    }
    panic!("magic number search exhausted {MAX_CANDIDATES} candidates for square {sq}");
}

pub struct MagicTables {
    pub rook_magic: [u64; 64],
    pub rook_mask: [u64; 64],
    pub rook_shift: [u8; 64],
    pub rook_attacks: Box<[[u64; 4096]; 64]>,
    pub bishop_magic: [u64; 64],
    pub bishop_mask: [u64; 64],
    pub bishop_shift: [u8; 64],
    pub bishop_attacks: Box<[[u64; 512]; 64]>,
}

fn build_tables() -> MagicTables {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);

    let mut rook_magic = [0u64; 64];
    let mut rook_mask = [0u64; 64];
    let mut rook_shift = [0u8; 64];
    let mut rook_attacks: Box<[[u64; 4096]; 64]> = Box::new([[0u64; 4096]; 64]);

    for sq in 0..64u8 {
        let mask = rook_mask_of(sq);
        let bits = ROOK_BITS[sq as usize];
        let (magic, table) = find_magic(sq, mask, bits, rook_attacks_on_the_fly, &mut rng);
        rook_mask[sq as usize] = mask;
        rook_magic[sq as usize] = magic;
        rook_shift[sq as usize] = 64 - bits;
        rook_attacks[sq as usize][..table.len()].copy_from_slice(&table);
    }

    let mut bishop_magic = [0u64; 64];
    let mut bishop_mask = [0u64; 64];
    let mut bishop_shift = [0u8; 64];
    let mut bishop_attacks: Box<[[u64; 512]; 64]> = Box::new([[0u64; 512]; 64]);

    for sq in 0..64u8 {
        let mask = bishop_mask_of(sq);
        let bits = BISHOP_BITS[sq as usize];
        let (magic, table) = find_magic(sq, mask, bits, bishop_attacks_on_the_fly, &mut rng);
        bishop_mask[sq as usize] = mask;
        bishop_magic[sq as usize] = magic;
        bishop_shift[sq as usize] = 64 - bits;
        bishop_attacks[sq as usize][..table.len()].copy_from_slice(&table);
    }

    MagicTables {
        rook_magic,
        rook_mask,
        rook_shift,
        rook_attacks,
        bishop_magic,
        bishop_mask,
        bishop_shift,
        bishop_attacks,
    }
}

fn rook_mask_of(sq: Square) -> u64 {
    rook_mask(sq)
}
fn bishop_mask_of(sq: Square) -> u64 {
    bishop_mask(sq)
}

pub(crate) static MAGICS: Lazy<MagicTables> = Lazy::new(build_tables);

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: crate::bitboard::Bitboard) -> crate::bitboard::Bitboard {
    let t = &*MAGICS;
    let idx = sq as usize;
    let blockers = occupancy.0 & t.rook_mask[idx];
    let index = ((blockers.wrapping_mul(t.rook_magic[idx])) >> t.rook_shift[idx]) as usize;
    crate::bitboard::Bitboard(t.rook_attacks[idx][index])
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: crate::bitboard::Bitboard) -> crate::bitboard::Bitboard {
    let t = &*MAGICS;
    let idx = sq as usize;
    let blockers = occupancy.0 & t.bishop_mask[idx];
    let index = ((blockers.wrapping_mul(t.bishop_magic[idx])) >> t.bishop_shift[idx]) as usize;
    crate::bitboard::Bitboard(t.bishop_attacks[idx][index])
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: crate::bitboard::Bitboard) -> crate::bitboard::Bitboard {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_mask_has_at_most_12_bits() {
        for sq in 0..64u8 {
            assert!(rook_mask(sq).count_ones() <= 12);
        }
    }

    #[test]
    fn bishop_mask_has_at_most_9_bits() {
        for sq in 0..64u8 {
            assert!(bishop_mask(sq).count_ones() <= 9);
        }
    }

    #[test]
    fn magic_rook_attacks_match_on_the_fly_for_random_occupancies() {
        let mut rng = StdRng::seed_from_u64(7);
        for sq in 0..64u8 {
            let mask = rook_mask(sq);
            for occ in subsets_of(mask).into_iter().take(20) {
                let want = rook_attacks_on_the_fly(sq, occ);
                let got = rook_attacks(sq, crate::bitboard::Bitboard(occ)).0;
                assert_eq!(got, want, "sq={sq} occ={occ:#x}");
            }
            let _ = rng.next_u64();
        }
    }

    #[test]
    fn magic_bishop_attacks_match_on_the_fly_for_random_occupancies() {
        for sq in 0..64u8 {
            let mask = bishop_mask(sq);
            for occ in subsets_of(mask).into_iter().take(20) {
                let want = bishop_attacks_on_the_fly(sq, occ);
                let got = bishop_attacks(sq, crate::bitboard::Bitboard(occ)).0;
                assert_eq!(got, want, "sq={sq} occ={occ:#x}");
            }
        }
    }

    #[test]
    fn rook_on_empty_board_attacks_full_rank_and_file() {
        // Rook on e4 (square 28).
        let attacks = rook_attacks(28, crate::bitboard::Bitboard(0)).0;
        let expected_rank = 0xFFu64 << 24;
        let expected_file = 0x0101_0101_0101_0101u64 << 4;
        let expected = (expected_rank | expected_file) & !(1u64 << 28);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn queen_attacks_are_union_of_rook_and_bishop() {
        for sq in [0u8, 27, 63] {
            let occ = crate::bitboard::Bitboard(0x0000_FFFF_0000_0000u64);
            assert_eq!(
                queen_attacks(sq, occ).0,
                rook_attacks(sq, occ).0 | bishop_attacks(sq, occ).0
            );
        }
    }
}
