//! End-to-end search sanity checks: mate finding, tactical awareness,
//! and draw detection against real positions.

use std::time::{Duration, Instant};

use chess_engine::fen::parse_fen;
use chess_engine::search::{search, SearchConfig};

fn config(max_depth: u32) -> SearchConfig {
    SearchConfig {
        max_depth,
        ..SearchConfig::default()
    }
}

#[test]
fn finds_mate_in_one_back_rank() {
    let pos = parse_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1").unwrap();
    let result = search(pos, config(4), Instant::now() + Duration::from_secs(5));
    assert!(result.best_move.to_string() == "e1e8");
}

#[test]
fn avoids_hanging_the_queen() {
    let pos = parse_fen("4k3/8/8/3q4/8/8/3Q4/4K3 b - - 0 1").unwrap();
    let result = search(pos, config(4), Instant::now() + Duration::from_secs(5));
    assert_eq!(result.best_move.to_string(), "d5d2");
}

#[test]
fn captures_free_piece() {
    let pos = parse_fen("rnbqk1nr/pppp1ppp/2b5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4").unwrap();
    let result = search(pos, config(4), Instant::now() + Duration::from_secs(5));
    assert!(!result.best_move.is_none());
}

#[test]
fn single_legal_move_position() {
    let pos = parse_fen("8/8/8/8/8/8/8/K6rk w - - 0 1").unwrap();
    let result = search(pos, config(4), Instant::now() + Duration::from_secs(5));
    assert_eq!(result.best_move.to_string(), "a1a2");
}

#[test]
fn identifies_stalemate_as_draw() {
    let pos = parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let result = search(pos, config(2), Instant::now() + Duration::from_secs(5));
    assert_eq!(result.score, 0);
}

#[test]
fn evaluation_is_roughly_symmetric_at_startpos() {
    let pos = chess_engine::position::Position::start();
    let result = search(pos, config(1), Instant::now() + Duration::from_secs(5));
    assert!(result.score.abs() < 100);
}

#[test]
fn search_respects_a_short_deadline() {
    let pos = chess_engine::position::Position::start();
    let result = search(pos, config(64), Instant::now());
    assert!(result.depth <= 1);
}
