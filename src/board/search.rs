//! Iterative-deepening negamax search: alpha-beta with PVS, quiescence,
//! a transposition table, null-move pruning, late move reductions,
//! futility pruning, and killer/history move ordering.

use std::time::{Duration, Instant};

use super::tt::TranspositionTable;
use super::{Board, Move, MoveList, Piece};
use crate::sync::StopFlag;

/// Mate scores are encoded as `MATE_SCORE - ply` so that shallower mates
/// sort ahead of deeper ones.
pub const MATE_SCORE: i32 = 100_000;

/// Scores within this much of `MATE_SCORE` are treated as "mate window" and
/// bypass aspiration windows (the margin leaves room for the deepest ply we
/// search plus a few check extensions).
const MATE_WINDOW: i32 = 512;

/// Default transposition table size used when the UCI `Hash` option hasn't
/// been set yet, or when a `setoption` value fails to parse.
pub const DEFAULT_TT_MB: usize = 16;

const ASPIRATION_WINDOW: i32 = 50;
const ASPIRATION_MAX_MARGIN: i32 = 800;

fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 20000,
    }
}

fn mvv_lva_score(victim: Option<Piece>, attacker: Option<Piece>) -> i32 {
    match (victim, attacker) {
        (Some(v), Some(a)) => piece_value(v) * 10 - piece_value(a),
        (Some(v), None) => piece_value(v) * 10,
        (None, _) => 0,
    }
}

/// SPSA-tunable search constants, exposed to the UCI adapter as `setoption`
/// spins so they can be retuned without a rebuild.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub rfp_margin: i32,
    pub null_reduction: u32,
    pub futility_margin: i32,
    pub iir_min_depth: u32,
    pub lmr_min_depth: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            rfp_margin: 100,
            null_reduction: 2,
            futility_margin: 100,
            iir_min_depth: 4,
            lmr_min_depth: 3,
        }
    }
}

const HISTORY_PIECES: usize = 6;
const HISTORY_SQUARES: usize = 64;
const HISTORY_SIZE: usize = HISTORY_PIECES * HISTORY_SQUARES * HISTORY_SQUARES;
const MAX_KILLER_PLY: usize = 128;

/// Killer and history move-ordering tables, reused across a whole game so
/// history scores keep accumulating signal between searches.
struct OrderingTables {
    killers: Vec<[Option<Move>; 2]>,
    history: Vec<i32>,
}

impl OrderingTables {
    fn new() -> Self {
        OrderingTables {
            killers: vec![[None, None]; MAX_KILLER_PLY],
            history: vec![0; HISTORY_SIZE],
        }
    }

    fn clear(&mut self) {
        for slot in &mut self.killers {
            *slot = [None, None];
        }
        self.history.iter_mut().for_each(|h| *h = 0);
    }

    fn record_killer(&mut self, ply: usize, m: Move) {
        let Some(slot) = self.killers.get_mut(ply) else { return };
        if slot[0] != Some(m) {
            slot[1] = slot[0];
            slot[0] = Some(m);
        }
    }

    fn is_killer(&self, ply: usize, m: Move) -> Option<usize> {
        let slot = self.killers.get(ply)?;
        if slot[0] == Some(m) {
            Some(0)
        } else if slot[1] == Some(m) {
            Some(1)
        } else {
            None
        }
    }

    fn history_index(piece: Piece, from_sq: usize, to_sq: usize) -> usize {
        piece.index() * HISTORY_SQUARES * HISTORY_SQUARES + from_sq * HISTORY_SQUARES + to_sq
    }

    fn record_history(&mut self, piece: Piece, from_sq: usize, to_sq: usize, bonus: i32) {
        let idx = Self::history_index(piece, from_sq, to_sq);
        self.history[idx] = self.history[idx].saturating_add(bonus);
    }

    fn history_score(&self, piece: Piece, from_sq: usize, to_sq: usize) -> i32 {
        self.history[Self::history_index(piece, from_sq, to_sq)]
    }
}

/// Owns every piece of mutable search state that must survive across an
/// iterative-deepening run (and, for the TT and history tables, across
/// successive searches within the same game).
pub struct SearchState {
    tt: TranspositionTable,
    ordering: OrderingTables,
    params: SearchParams,
    nodes: u64,
    qnodes: u64,
    seldepth: u32,
    fail_high: u64,
    fail_low: u64,
    re_searches: u64,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            ordering: OrderingTables::new(),
            params: SearchParams::default(),
            nodes: 0,
            qnodes: 0,
            seldepth: 0,
            fail_high: 0,
            fail_low: 0,
            re_searches: 0,
        }
    }

    pub fn params_mut(&mut self) -> &mut SearchParams {
        &mut self.params
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Replace the transposition table with a freshly sized one, e.g. in
    /// response to a `setoption name Hash value N` command.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Reset per-game state (TT contents, killers, history) for `ucinewgame`.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.ordering.clear();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }

    #[must_use]
    pub fn tt_probes(&self) -> u64 {
        self.tt.probes()
    }

    #[must_use]
    pub fn tt_hits(&self) -> u64 {
        self.tt.hits()
    }

    fn reset_counters(&mut self) {
        self.nodes = 0;
        self.qnodes = 0;
        self.seldepth = 0;
        self.fail_high = 0;
        self.fail_low = 0;
        self.re_searches = 0;
    }
}

/// Caller-specified bounds for one `search` invocation.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    pub max_depth: u32,
    /// Soft budget: once elapsed time exceeds this, no new iteration starts.
    pub soft_time: Option<Duration>,
    pub node_limit: Option<u64>,
}

impl SearchLimits {
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchLimits { max_depth, soft_time: None, node_limit: None }
    }

    #[must_use]
    pub fn with_soft_time(max_depth: u32, soft_time: Duration) -> Self {
        SearchLimits { max_depth, soft_time: Some(soft_time), node_limit: None }
    }

    #[must_use]
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }
}

/// A snapshot of one completed iterative-deepening depth, recorded in
/// [`SearchResult::iters`] so a caller can see how the search progressed
/// rather than only the final depth's numbers.
#[derive(Clone, Debug)]
pub struct IterationInfo {
    pub depth: u32,
    pub time_ms: u64,
    pub nodes: u64,
    pub qnodes: u64,
    pub fail_high: u64,
    pub fail_low: u64,
}

/// One completed (or time-truncated) search result, shaped for UCI `info`
/// and `bestmove` reporting.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u32,
    pub seldepth: u32,
    pub nodes: u64,
    pub qnodes: u64,
    pub time: Duration,
    pub pv: Vec<Move>,
    pub hashfull: u32,
    pub tt_hits: u64,
    pub tt_probes: u64,
    pub tt_hits_exact: u64,
    pub tt_hits_lower: u64,
    pub tt_hits_upper: u64,
    pub tt_stores: u64,
    pub tt_replacements: u64,
    pub tt_size: u64,
    pub fail_high: u64,
    pub fail_low: u64,
    pub re_searches: u64,
    pub iters: Vec<IterationInfo>,
}

impl SearchResult {
    /// `Some(n)` full moves to deliver/receive mate, signed from the
    /// searching side's perspective; `None` for a non-mate score.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        if self.score.abs() < MATE_SCORE - MATE_WINDOW {
            return None;
        }
        let plies_to_mate = MATE_SCORE - self.score.abs();
        let full_moves = (plies_to_mate + 1) / 2;
        Some(if self.score > 0 { full_moves } else { -full_moves })
    }
}

/// Search with only a depth bound - used for fixed-depth `go depth N`.
pub fn find_best_move(
    board: &mut Board,
    state: &mut SearchState,
    max_depth: u32,
    stop: &StopFlag,
    on_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    search(board, state, SearchLimits::depth(max_depth), stop, on_iteration)
}

/// Search under a soft wall-clock budget, relying on `stop` (typically
/// backed by a `timer::DeadlineTimer`) to enforce the hard cutoff.
pub fn find_best_move_with_time(
    board: &mut Board,
    state: &mut SearchState,
    max_depth: u32,
    soft_time: Duration,
    stop: &StopFlag,
    on_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    search(board, state, SearchLimits::with_soft_time(max_depth, soft_time), stop, on_iteration)
}

/// Drive iterative deepening from depth 1 to `limits.max_depth`, widening
/// aspiration windows around the previous iteration's score.
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    limits: SearchLimits,
    stop: &StopFlag,
    on_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    search_excluding(board, state, limits, stop, &[], on_iteration)
}

/// Run `count` independent root searches, excluding each prior line's best
/// move from the root move list of the next - the MultiPV root-split
/// described for the UCI adapter. All lines share the transposition table.
pub fn search_multipv(
    board: &mut Board,
    state: &mut SearchState,
    limits: SearchLimits,
    stop: &StopFlag,
    count: usize,
) -> Vec<SearchResult> {
    let mut excluded = Vec::new();
    let mut lines = Vec::with_capacity(count);
    for _ in 0..count {
        if stop.is_stopped() {
            break;
        }
        let result = search_excluding(board, state, limits, stop, &excluded, |_| {});
        let Some(best) = result.best_move else { break };
        excluded.push(best);
        lines.push(result);
    }
    lines
}

/// Drive iterative deepening, excluding `excluded` from the root move list -
/// used by [`search_multipv`] to find successive distinct best lines.
fn search_excluding(
    board: &mut Board,
    state: &mut SearchState,
    limits: SearchLimits,
    stop: &StopFlag,
    excluded: &[Move],
    mut on_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    state.reset_counters();
    let start = Instant::now();

    let mut root_moves = board.generate_moves();
    if !excluded.is_empty() {
        let kept: Vec<Move> = root_moves.iter().filter(|m| !excluded.contains(m)).copied().collect();
        root_moves = MoveList::new();
        for m in kept {
            root_moves.push(m);
        }
    }
    let mut result = SearchResult {
        best_move: root_moves.first(),
        score: 0,
        depth: 0,
        seldepth: 0,
        nodes: 0,
        qnodes: 0,
        time: Duration::ZERO,
        pv: Vec::new(),
        hashfull: 0,
        tt_hits: 0,
        tt_probes: 0,
        tt_hits_exact: 0,
        tt_hits_lower: 0,
        tt_hits_upper: 0,
        tt_stores: 0,
        tt_replacements: 0,
        tt_size: 0,
        fail_high: 0,
        fail_low: 0,
        re_searches: 0,
        iters: Vec::new(),
    };

    if root_moves.is_empty() || stop.is_stopped() {
        return result;
    }

    let mut prev_score: Option<i32> = None;
    let mut iters: Vec<IterationInfo> = Vec::new();

    for depth in 1..=limits.max_depth {
        if stop.is_stopped() {
            break;
        }
        if let Some(soft) = limits.soft_time {
            if depth > 1 && start.elapsed() >= soft {
                break;
            }
        }
        if let Some(node_limit) = limits.node_limit {
            if depth > 1 && state.nodes >= node_limit {
                break;
            }
        }

        state.tt.new_generation();

        let window = match prev_score {
            Some(ps) if depth > 2 && ps.abs() < MATE_SCORE - MATE_WINDOW => None,
            _ => Some((-MATE_SCORE * 2, MATE_SCORE * 2)),
        };

        let fail_high_before = state.fail_high;
        let fail_low_before = state.fail_low;

        let Some((score, completed)) =
            run_root_iteration(board, state, depth, &mut root_moves, stop, window, prev_score)
        else {
            break;
        };

        if !completed {
            break;
        }

        prev_score = Some(score);
        let best_move = root_moves.first();

        iters.push(IterationInfo {
            depth,
            time_ms: start.elapsed().as_millis() as u64,
            nodes: state.nodes,
            qnodes: state.qnodes,
            fail_high: state.fail_high - fail_high_before,
            fail_low: state.fail_low - fail_low_before,
        });

        result = SearchResult {
            best_move,
            score,
            depth,
            seldepth: state.seldepth,
            nodes: state.nodes,
            qnodes: state.qnodes,
            time: start.elapsed(),
            pv: build_pv(board, state, depth),
            hashfull: state.tt.hashfull_per_mille(),
            tt_hits: state.tt_hits(),
            tt_probes: state.tt.probes(),
            tt_hits_exact: state.tt.hits_exact(),
            tt_hits_lower: state.tt.hits_lower(),
            tt_hits_upper: state.tt.hits_upper(),
            tt_stores: state.tt.stores(),
            tt_replacements: state.tt.replacements(),
            tt_size: state.tt.size(),
            fail_high: state.fail_high,
            fail_low: state.fail_low,
            re_searches: state.re_searches,
            iters: iters.clone(),
        };
        on_iteration(&result);

        if score.abs() >= MATE_SCORE - MATE_WINDOW {
            break;
        }
    }

    result
}

/// Run one iterative-deepening iteration at `depth`, first trying an
/// aspiration window (if `prev_score` is usable) before falling back to a
/// full window. Returns `(score, completed)`, or `None` if the stop flag
/// was already set before any work happened.
fn run_root_iteration(
    board: &mut Board,
    state: &mut SearchState,
    depth: u32,
    root_moves: &mut MoveList,
    stop: &StopFlag,
    full_window: Option<(i32, i32)>,
    prev_score: Option<i32>,
) -> Option<(i32, bool)> {
    if let Some(window) = full_window {
        return Some(run_root_search(board, state, depth, root_moves, stop, window));
    }

    let ps = prev_score.expect("aspiration window requires a previous score");
    let mut margin = ASPIRATION_WINDOW;
    loop {
        if stop.is_stopped() {
            return None;
        }
        let alpha = ps.saturating_sub(margin);
        let beta = ps.saturating_add(margin);
        let (score, completed) = run_root_search(board, state, depth, root_moves, stop, (alpha, beta));
        if !completed {
            return Some((score, false));
        }
        if score > alpha && score < beta {
            return Some((score, true));
        }
        if score <= alpha {
            state.fail_low += 1;
        } else {
            state.fail_high += 1;
        }
        if margin >= ASPIRATION_MAX_MARGIN {
            let (score, completed) =
                run_root_search(board, state, depth, root_moves, stop, (-MATE_SCORE * 2, MATE_SCORE * 2));
            return Some((score, completed));
        }
        margin = margin.saturating_mul(2);
    }
}

/// Search every root move at `depth - 1` under `window`, keeping the best
/// scoring move at the front of `root_moves` for next iteration's ordering.
/// Returns `(best_score, completed)`; `completed` is false if the stop flag
/// interrupted the scan before every move had been tried.
fn run_root_search(
    board: &mut Board,
    state: &mut SearchState,
    depth: u32,
    root_moves: &mut MoveList,
    stop: &StopFlag,
    (mut alpha, beta): (i32, i32),
) -> (i32, bool) {
    order_moves(state, board, root_moves.as_mut_slice(), 0, None);

    let mut best_score = -MATE_SCORE * 2;
    let mut best_index = 0;
    let mut completed = true;

    for i in 0..root_moves.len() {
        if stop.is_stopped() {
            completed = false;
            break;
        }
        let m = root_moves.get(i).expect("index within bounds");
        let info = board.make_move(&m);
        let score = if i == 0 {
            -negamax(board, state, depth - 1, -beta, -alpha, 1, stop)
        } else {
            let probe = -negamax(board, state, depth - 1, -alpha - 1, -alpha, 1, stop);
            if probe > alpha && probe < beta {
                state.re_searches += 1;
                -negamax(board, state, depth - 1, -beta, -alpha, 1, stop)
            } else {
                probe
            }
        };
        board.unmake_move(&m, info);

        if score > best_score {
            best_score = score;
            best_index = i;
        }
        alpha = alpha.max(best_score);
    }

    if best_index != 0 {
        let moves = root_moves.as_mut_slice();
        moves.swap(0, best_index);
    }

    (best_score, completed)
}

/// Negamax with alpha-beta pruning, PVS re-searches, null-move pruning,
/// futility pruning, late move reductions, and check extensions.
fn negamax(
    board: &mut Board,
    state: &mut SearchState,
    mut depth: u32,
    mut alpha: i32,
    beta: i32,
    ply: u32,
    stop: &StopFlag,
) -> i32 {
    state.nodes += 1;
    state.seldepth = state.seldepth.max(ply);

    if stop.is_stopped() {
        return board.evaluate();
    }
    if board.is_draw() {
        return 0;
    }

    let in_check = board.is_in_check(board.current_color());
    if in_check && depth > 0 {
        depth += 1;
    }

    let original_alpha = alpha;
    let hash = board.hash();

    let (tt_score, tt_move) = state.tt.probe(hash, depth, alpha, beta);
    if let Some(score) = tt_score {
        return score;
    }

    if depth == 0 {
        return quiesce(board, state, alpha, beta, ply, stop);
    }

    // Null-move pruning: skip our turn and see if the opponent still can't
    // beat beta. Guarded against zugzwang by requiring non-pawn material.
    if depth >= 3 && !in_check && beta < MATE_SCORE - 1024 && has_non_pawn_material(board) {
        let r = state.params().null_reduction;
        let null_info = board.make_null_move();
        let null_score = -negamax(board, state, depth.saturating_sub(1 + r), -beta, -beta + 1, ply + 1, stop);
        board.unmake_null_move(null_info);
        if null_score >= beta {
            return beta;
        }
    }

    let mut moves = board.generate_moves();
    if moves.is_empty() {
        return if in_check { -(MATE_SCORE - ply as i32) } else { 0 };
    }

    order_moves(state, board, moves.as_mut_slice(), ply as usize, tt_move);

    let stand_pat = if depth == 1 && !in_check { Some(board.evaluate()) } else { None };

    let mut best_score = -MATE_SCORE * 2;
    let mut best_move: Option<Move> = None;

    for (i, m) in moves.iter().enumerate() {
        if stop.is_stopped() {
            break;
        }

        let is_quiet = m.captured_piece.is_none() && m.promotion.is_none();

        // Capture SEE gate: at shallow depth, skip captures that lose material.
        if !is_quiet && depth <= 2 && !board.see_ge(m.from, m.to, 0) {
            continue;
        }

        // Futility pruning: drop hopeless quiet moves one ply from a leaf.
        if let Some(sp) = stand_pat {
            if is_quiet && depth == 1 && sp + state.params().futility_margin <= alpha {
                continue;
            }
        }

        let attacker = board.piece_at(m.from).map(|(_, p)| p);
        let info = board.make_move(m);

        let mut score;
        if i == 0 {
            score = -negamax(board, state, depth - 1, -beta, -alpha, ply + 1, stop);
        } else {
            let mut reduced_depth = depth - 1;
            let mut did_lmr = false;
            if is_quiet && depth >= state.params().lmr_min_depth && i >= 4 {
                let reduction = (1 + i as u32 / 6).min(depth.saturating_sub(2));
                if reduction > 0 {
                    reduced_depth = depth - 1 - reduction;
                    did_lmr = true;
                }
            }

            score = -negamax(board, state, reduced_depth, -alpha - 1, -alpha, ply + 1, stop);
            if did_lmr && score > alpha {
                state.re_searches += 1;
                score = -negamax(board, state, depth - 1, -alpha - 1, -alpha, ply + 1, stop);
            }
            if score > alpha && score < beta {
                state.re_searches += 1;
                score = -negamax(board, state, depth - 1, -beta, -alpha, ply + 1, stop);
            }
        }

        board.unmake_move(m, info);

        if score > best_score {
            best_score = score;
            best_move = Some(*m);
        }
        alpha = alpha.max(best_score);

        if alpha >= beta {
            if is_quiet {
                state.ordering.record_killer(ply as usize, *m);
                if let Some(piece) = attacker {
                    state.ordering.record_history(piece, m.from.index().as_usize(), m.to.index().as_usize(), (depth * depth) as i32);
                }
            }
            break;
        }
    }

    if !stop.is_stopped() {
        state.tt.store(hash, depth, best_score, original_alpha, beta, best_move);
    }

    best_score
}

/// Capture-only (or, in check, fully legal) search to the point of a quiet
/// position, so the static evaluation at the search frontier never judges
/// a position mid-exchange.
fn quiesce(board: &mut Board, state: &mut SearchState, mut alpha: i32, beta: i32, ply: u32, stop: &StopFlag) -> i32 {
    state.nodes += 1;
    state.qnodes += 1;
    state.seldepth = state.seldepth.max(ply);

    if board.is_draw() {
        return 0;
    }
    if stop.is_stopped() {
        return board.evaluate();
    }

    let in_check = board.is_in_check(board.current_color());
    let mut moves = if in_check { board.generate_moves() } else { board.generate_tactical_moves() };

    let stand_pat = board.evaluate();
    if !in_check {
        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);
    }

    moves.as_mut_slice().sort_by_key(|m| {
        let attacker = board.piece_at(m.from).map(|(_, p)| p);
        -mvv_lva_score(m.captured_piece, attacker)
    });

    let mut best_score = if in_check { -MATE_SCORE * 2 } else { stand_pat };

    for m in moves.iter() {
        if stop.is_stopped() {
            break;
        }
        if !in_check && m.captured_piece.is_some() && !board.see_ge(m.from, m.to, 0) {
            continue;
        }

        let info = board.make_move(m);
        let score = -quiesce(board, state, -beta, -alpha, ply + 1, stop);
        board.unmake_move(m, info);

        best_score = best_score.max(score);
        alpha = alpha.max(best_score);
        if alpha >= beta {
            break;
        }
    }

    if in_check && moves.is_empty() {
        return -(MATE_SCORE - ply as i32);
    }

    best_score
}

fn has_non_pawn_material(board: &Board) -> bool {
    let color = board.current_color();
    [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
        .iter()
        .any(|&p| !board.pieces_of(color, p).is_empty())
}

/// Assign ordering scores (TT move, captures by MVV-LVA, killers, history)
/// and sort `moves` in place, highest priority first.
fn order_moves(state: &SearchState, board: &Board, moves: &mut [Move], ply: usize, tt_move: Option<Move>) {
    moves.sort_by_key(|m| {
        if Some(*m) == tt_move {
            return i32::MIN;
        }
        let mut score = 0;
        if let Some(victim) = m.captured_piece {
            let attacker = board.piece_at(m.from).map(|(_, p)| p);
            score += mvv_lva_score(Some(victim), attacker) * 100;
        } else if let Some(slot) = state.ordering.is_killer(ply, *m) {
            score += 50_000 - (slot as i32) * 1000;
        } else if let Some(piece) = board.piece_at(m.from).map(|(_, p)| p) {
            score += state.ordering.history_score(piece, m.from.index().as_usize(), m.to.index().as_usize());
        }
        -score
    });
}

/// Follow TT best-move entries forward from the current position to build
/// a principal variation, replaying moves on a scratch clone of the board.
fn build_pv(board: &Board, state: &SearchState, max_len: u32) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut scratch = board.clone();
    for _ in 0..max_len {
        let Some(entry) = state.tt.probe_raw(scratch.hash()) else { break };
        let Some(mv) = entry.best_move() else { break };
        if scratch.generate_moves().iter().all(|m| *m != mv) {
            break;
        }
        let info = scratch.make_move(&mv);
        pv.push(mv);
        let _ = info; // scratch board is discarded, no need to unmake
    }
    pv
}
