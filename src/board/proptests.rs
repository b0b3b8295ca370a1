//! Property-based tests exercising make/unmake, FEN round-trips, and SEE
//! against randomly-played legal games.

use super::{Board, Color, Piece};
use proptest::prelude::*;
use rand::prelude::*;

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=20usize
}

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn play_random_moves(board: &mut Board, rng: &mut StdRng, count: usize) {
    for _ in 0..count {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..moves.len());
        let mv = moves.as_slice()[idx];
        board.make_move(&mv);
    }
}

proptest! {
    /// make_move followed by unmake_move restores hash and FEN exactly.
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);

        let initial_hash = board.hash();
        let initial_fen = board.to_fen();

        let mut history = Vec::new();
        for _ in 0..num_moves {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..moves.len());
            let mv = moves.as_slice()[idx];
            let info = board.make_move(&mv);
            history.push((mv, info));
        }

        while let Some((mv, info)) = history.pop() {
            board.unmake_move(&mv, info);
        }

        prop_assert_eq!(board.hash(), initial_hash);
        prop_assert_eq!(board.to_fen(), initial_fen);
    }

    /// The incrementally-maintained hash never drifts from a from-scratch
    /// recomputation over the course of a random game.
    #[test]
    fn prop_hash_matches_recalculation(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..moves.len());
            let mv = moves.as_slice()[idx];
            board.make_move(&mv);
            prop_assert_eq!(board.hash(), board.calculate_initial_hash());
        }
    }

    /// FEN round-trip preserves side to move and hash after a random game.
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_moves(&mut board, &mut rng, num_moves);

        let fen = board.to_fen();
        let restored = Board::from_fen(&fen);

        prop_assert_eq!(board.hash(), restored.hash());
        prop_assert_eq!(board.white_to_move(), restored.white_to_move());
    }

    /// Every move the generator calls legal leaves the mover's own king safe.
    #[test]
    fn prop_legal_moves_never_self_check(seed in seed_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..10 {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }

            let mover = board.current_color();
            for mv in moves.iter() {
                let info = board.make_move(mv);
                prop_assert!(!board.is_in_check(mover), "legal move left king in check: {:?}", mv);
                board.unmake_move(mv, info);
            }

            let idx = rng.gen_range(0..moves.len());
            let mv = moves.as_slice()[idx];
            board.make_move(&mv);
        }
    }

    /// SEE on an undefended capture equals the captured piece's value exactly.
    #[test]
    fn prop_see_undefended_equals_victim_value(_seed in seed_strategy()) {
        let mut board = Board::from_fen("8/8/8/3p4/4N3/8/8/8 w - - 0 1");
        for mv in board.generate_moves().iter() {
            if mv.captured_piece == Some(Piece::Pawn) {
                prop_assert_eq!(board.see(mv.from, mv.to), 100);
            }
        }
    }

    /// SEE never awards more than the value of the piece actually sitting on
    /// the target square.
    #[test]
    fn prop_see_bounded_by_victim_value(seed in seed_strategy(), num_moves in 0..15usize) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_moves(&mut board, &mut rng, num_moves);

        for mv in board.generate_moves().iter() {
            if let Some((_, victim)) = board.piece_at(mv.to) {
                let victim_value = match victim {
                    Piece::Pawn => 100,
                    Piece::Knight => 320,
                    Piece::Bishop => 330,
                    Piece::Rook => 500,
                    Piece::Queen => 900,
                    Piece::King => 20000,
                };
                prop_assert!(
                    board.see(mv.from, mv.to) <= victim_value,
                    "SEE exceeded victim value for {:?}", mv
                );
            }
        }
    }

    /// Evaluation stays within a sane bound - never blows up to a mate-score
    /// magnitude from ordinary material/positional terms.
    #[test]
    fn prop_eval_bounded(seed in seed_strategy(), num_moves in 0..30usize) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_moves(&mut board, &mut rng, num_moves);

        prop_assert!(board.evaluate().abs() < 10_000, "evaluation magnitude looks unreasonable");
    }

    /// Material tallied directly off `piece_at` is always non-negative per side.
    #[test]
    fn prop_material_non_negative(seed in seed_strategy(), num_moves in 0..30usize) {
        use super::Square;

        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        play_random_moves(&mut board, &mut rng, num_moves);

        let mut white_material = 0i32;
        let mut black_material = 0i32;
        for idx in 0..64 {
            if let Some((color, piece)) = board.piece_at(Square(idx / 8, idx % 8)) {
                let value = match piece {
                    Piece::Pawn => 100,
                    Piece::Knight => 320,
                    Piece::Bishop => 330,
                    Piece::Rook => 500,
                    Piece::Queen => 900,
                    Piece::King => 0,
                };
                match color {
                    Color::White => white_material += value,
                    Color::Black => black_material += value,
                }
            }
        }

        prop_assert!(white_material >= 0);
        prop_assert!(black_material >= 0);
    }
}
