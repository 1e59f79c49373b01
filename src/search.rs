//! Iterative deepening, negamax alpha-beta with quiescence, null-move
//! pruning, late-move reduction, check extension, futility pruning, and
//! principal-variation extraction (spec.md §4.I).

use std::time::Instant;

use crate::eval;
use crate::movegen::{self, MoveList, Stage, STAGE_ORDER};
use crate::moves::{make_move, null_move, Move};
use crate::ordering::{self, CounterMoves, Killers};
use crate::position::Position;
use crate::tt::{Bound, TranspositionTable, TtEntry};
use crate::types::{PieceKind, Side, MATE, MAX_PLY, OUT_OF_TIME};

/// Named tunables (spec.md §1.3 / §9): the delta-pruning margin matches a
/// queen's value but is explicitly not tuned, so it's exposed here rather
/// than buried in `quiescence`.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    pub tt_capacity: usize,
    pub delta_margin: i32,
    pub futility_margin: i32,
    pub max_depth: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            tt_capacity: 1 << 20,
            delta_margin: 900,
            futility_margin: 50,
            max_depth: 64,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u8,
    pub pv: Vec<Move>,
    pub nodes: u64,
}

/// Mate scores at or beyond this magnitude are "found a forced mate";
/// the threshold matches the one used for transposition-table ply
/// adjustment (spec.md §4.G).
const MATE_THRESHOLD: i32 = MATE - MAX_PLY as i32;

#[cfg(feature = "logging")]
fn log_depth_complete(depth: u8, score: i32, nodes: u64, pv: &[Move]) {
    log::debug!("depth {depth} score {score} nodes {nodes} pv {pv:?}");
}
#[cfg(not(feature = "logging"))]
fn log_depth_complete(_depth: u8, _score: i32, _nodes: u64, _pv: &[Move]) {}

#[cfg(feature = "logging")]
fn log_tt_cutoff(depth: u8, ply: u32) {
    log::trace!("tt cutoff at depth {depth} ply {ply}");
}
#[cfg(not(feature = "logging"))]
fn log_tt_cutoff(_depth: u8, _ply: u32) {}

struct Search {
    config: SearchConfig,
    tt: TranspositionTable,
    killers: Killers,
    counters: CounterMoves,
    deadline: Instant,
    nodes: u64,
}

#[inline]
fn negate_unless_timeout(score: i32) -> i32 {
    if score == OUT_OF_TIME {
        OUT_OF_TIME
    } else {
        -score
    }
}

fn has_non_pawn_material(pos: &Position, side: Side) -> bool {
    !pos.pieces(side, PieceKind::Knight).is_empty()
        || !pos.pieces(side, PieceKind::Bishop).is_empty()
        || !pos.pieces(side, PieceKind::Rook).is_empty()
        || !pos.pieces(side, PieceKind::Queen).is_empty()
}

impl Search {
    fn deadline_exceeded(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// `alpha_beta(is_pv, pos, alpha, beta, depth, ply, prev_move)`
    /// (spec.md §4.I). The spec's `attack_mask` parameter — a
    /// precomputed "is the side to move in check" signal threaded down
    /// to avoid recomputing it — is folded into the `in_check` local
    /// computed once at entry and reused for the extension/futility
    /// tests below.
    fn alpha_beta(
        &mut self,
        is_pv: bool,
        pos: Position,
        alpha: i32,
        beta: i32,
        depth: u8,
        ply: u32,
        prev_move: Move,
    ) -> i32 {
        if self.deadline_exceeded() {
            return OUT_OF_TIME;
        }
        if depth == 0 {
            return self.quiescence(pos, alpha, beta, ply);
        }
        self.nodes += 1;

        let mut alpha = alpha;
        let mut beta = beta;
        let side = pos.side_to_move;
        let in_check = movegen::in_check(&pos, side);

        if !is_pv && !in_check && depth >= 3 && has_non_pawn_material(&pos, side) {
            let reduced_depth = depth.saturating_sub(3);
            let null_pos = null_move(pos);
            let raw = self.alpha_beta(false, null_pos, -beta, -beta + 1, reduced_depth, ply + 1, Move::NONE);
            let score = negate_unless_timeout(raw);
            if score == OUT_OF_TIME {
                return OUT_OF_TIME;
            }
            if score >= beta {
                self.tt.store(
                    pos.zobrist_hash,
                    TtEntry {
                        bound: Bound::Lower,
                        score: beta,
                        depth,
                        best_move: Move::NONE,
                    },
                    ply,
                );
                return beta;
            }
        }

        if let Some(entry) = self.tt.probe(pos.zobrist_hash, ply) {
            if entry.depth as u32 >= depth as u32 {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    log_tt_cutoff(depth, ply);
                    return entry.score;
                }
            }
        }

        let original_alpha = alpha;
        let mut best_score = -MATE - 1;
        let mut best_move = Move::NONE;
        let mut legal_move_count = 0usize;
        let mut move_index = 0usize;

        for stage in STAGE_ORDER {
            let mut list = MoveList::new();
            movegen::generate(&pos, stage, &mut list);
            ordering::sort_moves(&pos, stage, &mut list, ply as usize, &self.killers, &self.counters, prev_move);

            let mut cursor = 0usize;
            while let Some(m) = movegen::select_move(list.as_mut_slice(), cursor) {
                cursor += 1;

                let skip_unscored_capture =
                    matches!(stage, Stage::Captures | Stage::LosingCaptures) && m.ordering_value() == 0;
                if skip_unscored_capture {
                    continue;
                }

                let next_pos = make_move(pos, m);
                if !movegen::is_legal(&next_pos) {
                    continue;
                }
                legal_move_count += 1;
                move_index += 1;

                let gives_check = movegen::in_check(&next_pos, next_pos.side_to_move);
                let destination_attacked =
                    movegen::attackers(&next_pos, next_pos.side_to_move).contains(m.to());
                let extension: u8 = u8::from(gives_check && !destination_attacked);

                let mut child_depth = depth - 1 + extension;
                if depth == 2 && extension == 0 && !in_check {
                    let static_eval = eval::evaluate(&pos);
                    if static_eval + self.config.futility_margin < alpha {
                        child_depth = child_depth.saturating_sub(1);
                    }
                }

                let is_reducible_stage = matches!(stage, Stage::Quiets | Stage::LosingCaptures);
                let score = if is_reducible_stage
                    && depth >= 2
                    && extension == 0
                    && !in_check
                    && move_index > 3
                {
                    let r = (((depth as f64 - 1.0).sqrt().floor()) as u32)
                        + (((move_index as f64 - 1.0).sqrt().floor()) as u32);
                    let r = if is_pv { r / 2 } else { r };
                    let reduced_depth = child_depth.saturating_sub(r as u8);

                    let raw = self.alpha_beta(false, next_pos, -(alpha + 1), -alpha, reduced_depth, ply + 1, m);
                    let reduced_score = negate_unless_timeout(raw);
                    if reduced_score == OUT_OF_TIME {
                        return OUT_OF_TIME;
                    }
                    if reduced_score > alpha {
                        let raw =
                            self.alpha_beta(is_pv, next_pos, -beta, -alpha, child_depth, ply + 1, m);
                        negate_unless_timeout(raw)
                    } else {
                        reduced_score
                    }
                } else {
                    let raw = self.alpha_beta(is_pv, next_pos, -beta, -alpha, child_depth, ply + 1, m);
                    negate_unless_timeout(raw)
                };
                if score == OUT_OF_TIME {
                    return OUT_OF_TIME;
                }

                if score > best_score {
                    best_score = score;
                    best_move = m;
                }
                if score > alpha {
                    alpha = score;
                }
                if alpha >= beta {
                    if stage == Stage::Quiets {
                        self.killers.record(ply as usize, m);
                        self.counters.record(prev_move, m);
                    }
                    self.tt.store(
                        pos.zobrist_hash,
                        TtEntry {
                            bound: Bound::Lower,
                            score,
                            depth,
                            best_move: m,
                        },
                        ply,
                    );
                    return beta;
                }
            }
        }

        if legal_move_count == 0 {
            return if in_check { -MATE + ply as i32 } else { 0 };
        }

        if alpha > original_alpha {
            self.tt.store(
                pos.zobrist_hash,
                TtEntry {
                    bound: Bound::Exact,
                    score: best_score,
                    depth,
                    best_move,
                },
                ply,
            );
        } else {
            self.tt.store(
                pos.zobrist_hash,
                TtEntry {
                    bound: Bound::Upper,
                    score: best_score,
                    depth,
                    best_move: Move::NONE,
                },
                ply,
            );
        }
        best_score
    }

    /// `quiescence(pos, alpha, beta, ply)` (spec.md §4.I): stand-pat,
    /// delta pruning, captures-only extension past the main horizon.
    fn quiescence(&mut self, pos: Position, alpha: i32, beta: i32, ply: u32) -> i32 {
        if self.deadline_exceeded() {
            return OUT_OF_TIME;
        }
        self.nodes += 1;

        let mut alpha = alpha;
        let stand_pat = eval::evaluate(&pos);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat < alpha - self.config.delta_margin {
            return alpha;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut best = stand_pat;
        let mut list = MoveList::new();
        movegen::generate(&pos, Stage::Captures, &mut list);
        ordering::sort_moves(&pos, Stage::Captures, &mut list, ply as usize, &self.killers, &self.counters, Move::NONE);

        let mut cursor = 0usize;
        while let Some(m) = movegen::select_move(list.as_mut_slice(), cursor) {
            cursor += 1;
            let next_pos = make_move(pos, m);
            if !movegen::is_legal(&next_pos) {
                continue;
            }
            let raw = self.quiescence(next_pos, -beta, -alpha, ply + 1);
            let score = negate_unless_timeout(raw);
            if score == OUT_OF_TIME {
                return OUT_OF_TIME;
            }
            if score >= beta {
                return beta;
            }
            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
        }
        best
    }

    /// Walk the transposition table along best-moves from the root,
    /// stopping at a missing entry, a zero (none) move, or `max_depth`
    /// plies (spec.md §4.I, §9 — a zero move encoding is "no move" and
    /// must not be walked into).
    fn extract_pv(&self, root: Position, max_depth: u8) -> Vec<Move> {
        let mut pv = Vec::new();
        let mut pos = root;
        for _ in 0..max_depth {
            let Some(entry) = self.tt.probe(pos.zobrist_hash, 0) else {
                break;
            };
            if entry.best_move.is_none() {
                break;
            }
            pv.push(entry.best_move);
            pos = make_move(pos, entry.best_move);
        }
        pv
    }
}

/// Run iterative deepening from `root` until `deadline` elapses or
/// `config.max_depth` completes, returning the deepest completed
/// depth's principal variation (spec.md §4.I). If the very first depth
/// is interrupted, `best_move` is `Move::NONE` — the front-end must not
/// play a move drawn from an incomplete depth (spec.md §5).
#[must_use]
pub fn search(root: Position, config: SearchConfig, deadline: Instant) -> SearchResult {
    search_with_progress(root, config, deadline, |_| {})
}

/// Same as [`search`], but `on_depth` is called with each depth's result
/// as soon as it completes — the hook the UCI front-end uses to emit
/// `info depth D score cp S pv ...` lines (spec.md §6) without the core
/// itself knowing about the UCI protocol.
pub fn search_with_progress(
    root: Position,
    config: SearchConfig,
    deadline: Instant,
    mut on_depth: impl FnMut(&SearchResult),
) -> SearchResult {
    let mut engine = Search {
        tt: TranspositionTable::new(config.tt_capacity),
        killers: Killers::new(),
        counters: CounterMoves::new(),
        config,
        deadline,
        nodes: 0,
    };

    let mut result = SearchResult {
        best_move: Move::NONE,
        score: 0,
        depth: 0,
        pv: Vec::new(),
        nodes: 0,
    };

    for depth in 1..=config.max_depth {
        let score = engine.alpha_beta(true, root, -MATE, MATE, depth, 0, Move::NONE);
        if score == OUT_OF_TIME {
            break;
        }
        let pv = engine.extract_pv(root, depth);
        let best_move = pv.first().copied().unwrap_or(Move::NONE);
        log_depth_complete(depth, score, engine.nodes, &pv);
        result = SearchResult {
            best_move,
            score,
            depth,
            pv,
            nodes: engine.nodes,
        };
        on_depth(&result);
        if score.abs() >= MATE_THRESHOLD && depth as u32 + 2 >= (MATE - score.abs()) as u32 {
            break;
        }
    }

    result
}
