use std::time::Duration;

use chess_engine::board::{find_best_move, find_best_move_with_time, Board, SearchState};
use chess_engine::sync::StopFlag;

#[test]
fn engine_depth_search_returns_move() {
    let mut board = Board::new();
    let mut state = SearchState::new(1);
    let stop = StopFlag::new();
    let result = find_best_move(&mut board, &mut state, 1, &stop, |_| {});
    assert!(result.best_move.is_some());
}

#[test]
fn engine_time_limited_search_returns_move_within_time() {
    let mut board = Board::new();
    let mut state = SearchState::new(1);
    let stop = StopFlag::new();
    let result =
        find_best_move_with_time(&mut board, &mut state, 64, Duration::from_millis(50), &stop, |_| {});
    assert!(result.best_move.is_some());
    assert!(result.time <= Duration::from_secs(5));
}
