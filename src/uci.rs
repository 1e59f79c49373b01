//! Universal Chess Interface front-end (spec.md §6). Kept thin and
//! synchronous: one search runs to completion (or deadline) per `go`
//! command before the loop reads its next line. This is deliberately
//! out of the core's scope — it only exercises the protocol contract
//! the core promises (spec.md §1, §6).

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use crate::error::MoveParseError;
use crate::fen::parse_fen;
use crate::movegen::{self, MoveList, Stage, STAGE_ORDER};
use crate::moves::make_move;
use crate::position::Position;
use crate::search::{self, SearchConfig, SearchResult};
use crate::types::square_from_algebraic;

/// Parse and resolve a UCI move string against the pseudo-legal, legal
/// moves available in `pos` (spec.md §6: "four or five ASCII characters
/// ... promotion piece one of qrbn"; spec.md §7: malformed moves "surface
/// as recognizable error values, not exceptions in control flow").
fn parse_uci_move(pos: &Position, text: &str) -> Result<crate::moves::Move, MoveParseError> {
    if text.len() != 4 && text.len() != 5 {
        return Err(MoveParseError::WrongLength(text.to_string()));
    }
    let (from_str, rest) = text.split_at(2);
    let (to_str, promo_str) = rest.split_at(2);
    if square_from_algebraic(from_str).is_none() {
        return Err(MoveParseError::BadSquare(from_str.to_string()));
    }
    if square_from_algebraic(to_str).is_none() {
        return Err(MoveParseError::BadSquare(to_str.to_string()));
    }
    if let Some(c) = promo_str.chars().next() {
        if !matches!(c, 'q' | 'r' | 'b' | 'n') {
            return Err(MoveParseError::BadPromotionPiece(c));
        }
    }

    for stage in STAGE_ORDER {
        let mut list = MoveList::new();
        movegen::generate(pos, stage, &mut list);
        for &m in list.as_slice() {
            if m.to_string() == text {
                let after = make_move(*pos, m);
                if movegen::is_legal(&after) {
                    return Ok(m);
                }
            }
        }
    }
    Err(MoveParseError::NotPseudoLegal(text.to_string()))
}

fn apply_position_command(pos: &mut Position, parts: &[&str]) {
    let mut i = 1;
    if parts.get(i) == Some(&"startpos") {
        *pos = Position::start();
        i += 1;
    } else if parts.get(i) == Some(&"fen") {
        if parts.len() < i + 7 {
            eprintln!("malformed fen in position command");
            return;
        }
        let fen = parts[i + 1..i + 7].join(" ");
        match parse_fen(&fen) {
            Ok(p) => *pos = p,
            Err(err) => {
                eprintln!("malformed fen: {err}");
                return;
            }
        }
        i += 7;
    }

    if parts.get(i) == Some(&"moves") {
        i += 1;
        while i < parts.len() {
            match parse_uci_move(pos, parts[i]) {
                Ok(m) => *pos = make_move(*pos, m),
                Err(err) => eprintln!("invalid move {}: {err}", parts[i]),
            }
            i += 1;
        }
    }
}

/// Compute a per-move time budget from `go`'s clock fields the way the
/// teacher's front-end does: remaining time divided by an assumed
/// horizon, plus a quarter of the increment, minus a small safety
/// margin (spec.md §5: "the deadline is a wall-clock absolute time
/// computed from the requested per-move budget minus a safety margin").
fn compute_movetime(
    side_to_move: crate::types::Side,
    wtime_ms: Option<u64>,
    btime_ms: Option<u64>,
    winc_ms: u64,
    binc_ms: u64,
    movestogo: Option<u64>,
) -> Option<Duration> {
    let (time_ms, inc_ms) = match side_to_move {
        crate::types::Side::White => (wtime_ms, winc_ms),
        crate::types::Side::Black => (btime_ms, binc_ms),
    };
    let time_ms = time_ms?;
    let horizon = movestogo.unwrap_or(30).max(1);
    let mut alloc = time_ms / horizon;
    alloc = alloc.saturating_sub(50);
    alloc = alloc.saturating_add(inc_ms / 4);
    Some(Duration::from_millis(alloc.max(1)))
}

fn format_info_line(result: &SearchResult) -> String {
    let pv = result
        .pv
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "info depth {} score cp {} nodes {} pv {}",
        result.depth, result.score, result.nodes, pv
    )
}

pub fn run_uci_loop() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut pos = Position::start();
    let config = SearchConfig::default();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                println!("id name chess_engine");
                println!("id author chess_engine contributors");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => pos = Position::start(),
            "position" => apply_position_command(&mut pos, &parts),
            "go" => {
                let mut wtime_ms = None;
                let mut btime_ms = None;
                let mut winc_ms = 0u64;
                let mut binc_ms = 0u64;
                let mut movestogo = None;
                let mut movetime = None;
                let mut depth_limit = None;

                let mut i = 1;
                while i < parts.len() {
                    match parts[i] {
                        "wtime" => {
                            wtime_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                            i += 2;
                        }
                        "btime" => {
                            btime_ms = parts.get(i + 1).and_then(|s| s.parse().ok());
                            i += 2;
                        }
                        "winc" => {
                            winc_ms = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                            i += 2;
                        }
                        "binc" => {
                            binc_ms = parts.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(0);
                            i += 2;
                        }
                        "movestogo" => {
                            movestogo = parts.get(i + 1).and_then(|s| s.parse().ok());
                            i += 2;
                        }
                        "movetime" => {
                            movetime = parts
                                .get(i + 1)
                                .and_then(|s| s.parse().ok())
                                .map(Duration::from_millis);
                            i += 2;
                        }
                        "depth" => {
                            depth_limit = parts.get(i + 1).and_then(|s| s.parse().ok());
                            i += 2;
                        }
                        _ => i += 1,
                    }
                }

                let budget = movetime
                    .or_else(|| compute_movetime(pos.side_to_move, wtime_ms, btime_ms, winc_ms, binc_ms, movestogo))
                    .unwrap_or(Duration::from_secs(5));
                let deadline = Instant::now() + budget;
                let mut run_config = config;
                if let Some(d) = depth_limit {
                    run_config.max_depth = d;
                }

                let result = search::search_with_progress(pos, run_config, deadline, |r| {
                    println!("{}", format_info_line(r));
                });

                if result.best_move.is_none() {
                    println!("bestmove 0000");
                } else {
                    println!("bestmove {}", result.best_move);
                }
            }
            "stop" => {}
            "quit" => break,
            _ => {}
        }

        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legal_uci_move_at_startpos() {
        let pos = Position::start();
        let m = parse_uci_move(&pos, "e2e4").expect("e2e4 is legal at startpos");
        assert_eq!(m.to_string(), "e2e4");
    }

    #[test]
    fn rejects_move_not_available_in_position() {
        let pos = Position::start();
        assert_eq!(
            parse_uci_move(&pos, "e2e5"),
            Err(crate::error::MoveParseError::NotPseudoLegal("e2e5".to_string()))
        );
    }

    #[test]
    fn rejects_wrong_length_move_string() {
        let pos = Position::start();
        assert_eq!(
            parse_uci_move(&pos, "e2"),
            Err(crate::error::MoveParseError::WrongLength("e2".to_string()))
        );
    }

    #[test]
    fn rejects_bad_square_in_move_string() {
        let pos = Position::start();
        assert_eq!(
            parse_uci_move(&pos, "z9e4"),
            Err(crate::error::MoveParseError::BadSquare("z9".to_string()))
        );
    }

    #[test]
    fn rejects_bad_promotion_piece() {
        let pos = Position::start();
        assert_eq!(
            parse_uci_move(&pos, "e7e8x"),
            Err(crate::error::MoveParseError::BadPromotionPiece('x'))
        );
    }

    #[test]
    fn position_command_applies_moves_in_sequence() {
        let mut pos = Position::start();
        apply_position_command(&mut pos, &["position", "startpos", "moves", "e2e4", "e7e5"]);
        assert_eq!(pos.side_to_move, crate::types::Side::White);
    }

    #[test]
    fn position_command_accepts_fen() {
        let mut pos = Position::start();
        let parts = [
            "position", "fen", "8/8/8/8/8/8/8/k6K", "w", "-", "-", "0", "1",
        ];
        apply_position_command(&mut pos, &parts);
        assert_eq!(pos.side_to_move, crate::types::Side::White);
    }

    #[test]
    fn movetime_budget_accounts_for_increment_and_margin() {
        let budget = compute_movetime(crate::types::Side::White, Some(60_000), Some(60_000), 1000, 0, Some(30));
        assert_eq!(budget, Some(Duration::from_millis(60_000 / 30 - 50 + 250)));
    }
}
