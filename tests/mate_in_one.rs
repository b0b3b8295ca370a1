use chess_engine::board::{find_best_move, Board, SearchState};
use chess_engine::sync::StopFlag;
use chess_engine::uci::{format_uci_move, parse_position_command};

struct Problem {
    fen: &'static str,
    mating_move: &'static str,
}

const MATE_IN_ONE: &[Problem] = &[
    // Back-rank mate, king boxed in by its own pawns: Ra8#.
    Problem { fen: "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", mating_move: "a1a8" },
    // Same pattern with colors reversed and a rook instead: ...Ra1#.
    Problem { fen: "r6k/8/8/8/8/8/5PPP/6K1 b - - 0 1", mating_move: "a8a1" },
    // Queen delivers the same back-rank pattern: Qd8#.
    Problem { fen: "6k1/5ppp/8/8/8/8/8/3Q3K w - - 0 1", mating_move: "d1d8" },
];

#[test]
fn mate_in_one_move_is_checkmate() {
    for problem in MATE_IN_ONE {
        let mut parts: Vec<String> = vec!["position".to_string(), "fen".to_string()];
        parts.extend(problem.fen.split_whitespace().map(str::to_string));
        parts.push("moves".to_string());
        parts.push(problem.mating_move.to_string());

        let parts_ref: Vec<&str> = parts.iter().map(String::as_str).collect();
        let mut board = Board::new();
        parse_position_command(&mut board, &parts_ref);

        assert!(
            board.is_checkmate(),
            "expected checkmate after {} on fen: {}",
            problem.mating_move,
            problem.fen,
        );
    }
}

#[test]
fn search_finds_the_mating_move() {
    for problem in MATE_IN_ONE {
        let mut board = Board::from_fen(problem.fen);
        let mut state = SearchState::new(1);
        let stop = StopFlag::new();
        let result = find_best_move(&mut board, &mut state, 3, &stop, |_| {});

        let best = result.best_move.expect("search found no move");
        assert_eq!(
            format_uci_move(&best),
            problem.mating_move,
            "search chose a different move on fen: {}",
            problem.fen,
        );
        assert_eq!(result.mate_in(), Some(1), "search didn't report mate-in-1 on fen: {}", problem.fen);
    }
}
