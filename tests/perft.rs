//! Move-count (perft) validation: the generator's pseudo-legal output,
//! filtered through `movegen::is_legal`, must reproduce known node
//! counts at each depth for a handful of well-known positions.

use chess_engine::fen::parse_fen;
use chess_engine::movegen::{self, MoveList, STAGE_ORDER};
use chess_engine::moves::make_move;
use chess_engine::position::Position;

fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for stage in STAGE_ORDER {
        let mut list = MoveList::new();
        movegen::generate(pos, stage, &mut list);
        for &m in list.as_slice() {
            let after = make_move(*pos, m);
            if movegen::is_legal(&after) {
                nodes += perft(&after, depth - 1);
            }
        }
    }
    nodes
}

struct Case {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    expected: u64,
}

const CASES: &[Case] = &[
    Case {
        name: "startpos depth 4",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depth: 4,
        expected: 197_281,
    },
    Case {
        name: "startpos depth 5",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depth: 5,
        expected: 4_865_609,
    },
    Case {
        name: "kiwipete depth 4",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depth: 4,
        expected: 4_085_603,
    },
    Case {
        name: "position 4 depth 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        depth: 4,
        expected: 422_333,
    },
    Case {
        name: "position 3 depth 4",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 4,
        expected: 43_238,
    },
];

#[test]
fn perft_matches_known_node_counts() {
    for case in CASES {
        let pos = parse_fen(case.fen).unwrap();
        let nodes = perft(&pos, case.depth);
        assert_eq!(nodes, case.expected, "perft mismatch for {}", case.name);
    }
}
