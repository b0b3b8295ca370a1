//! The UCI command loop and its background search worker.
//!
//! `run_uci_loop` owns the position and blocks on stdin; each `go` hands a
//! cloned board and the shared search state off to a worker thread so the
//! main loop stays free to answer `stop`/`isready` while a search runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::Mutex;

use crate::board::{
    search, search_multipv, Board, SearchLimits, SearchResult, SearchState, DEFAULT_TT_MB,
};
use crate::engine::time::{compute_time_limits, TimeConfig};
use crate::sync::StopFlag;
use crate::timer::spawn_deadline_timer;

use super::command::{parse_go_params, parse_uci_command, GoParams, UciCommand};
use super::options::{parse_setoption, UciOptionAction, UciOptions};
use super::print::print_perft_info;
use super::report::{print_bestmove, print_ready};
use super::{format_uci_move, parse_position_command};
use crate::{log_debug, log_warn};

/// Everything the UCI loop needs to survive across `go`/`stop` pairs.
struct EngineState {
    board: Board,
    search_state: Arc<Mutex<SearchState>>,
    options: UciOptions,
    stop: StopFlag,
    generation: Arc<AtomicU64>,
    latest_result: Arc<Mutex<Option<SearchResult>>>,
    worker: Option<JoinHandle<()>>,
}

impl EngineState {
    fn new() -> Self {
        EngineState {
            board: Board::new(),
            search_state: Arc::new(Mutex::new(SearchState::new(DEFAULT_TT_MB))),
            options: UciOptions::new(DEFAULT_TT_MB),
            stop: StopFlag::new(),
            generation: Arc::new(AtomicU64::new(0)),
            latest_result: Arc::new(Mutex::new(None)),
            worker: None,
        }
    }

    /// Stop and detach whatever worker is currently running, without waiting
    /// for it to finish - the new search supersedes it and the old worker
    /// will notice the generation bump and suppress its own output.
    fn supersede_running_search(&mut self) {
        self.stop.stop();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.worker = None;
    }

    fn go(&mut self, params: GoParams) {
        self.supersede_running_search();
        log_debug!("starting search: {:?}", params);

        if let Some(depth) = params.mate {
            // "mate in N" is reported as a depth bound in plies; double it to
            // give the search room to prove the mate, not just find a hint of it.
            return self.go_depth(depth * 2);
        }
        if let Some(depth) = params.depth {
            return self.go_depth(depth);
        }

        if params.infinite || params.ponder {
            self.spawn_worker(SearchLimits::depth(64));
            return;
        }

        let config = TimeConfig {
            move_overhead_ms: self.options.move_overhead_ms,
            ..TimeConfig::default()
        };
        let time_left_ms = if self.board.white_to_move() { params.wtime } else { params.btime };
        let increment_ms = if self.board.white_to_move() { params.winc } else { params.binc };

        let have_clock = params.movetime.is_some() || time_left_ms.is_some();

        let mut limits = if !have_clock {
            // No clock info and no depth/mate/infinite - analyze for a
            // bounded default so the engine doesn't run forever unprompted.
            SearchLimits::with_soft_time(64, std::time::Duration::from_secs(5))
        } else {
            let time_limits = compute_time_limits(
                std::time::Duration::from_millis(time_left_ms.unwrap_or(0)),
                std::time::Duration::from_millis(increment_ms.unwrap_or(0)),
                params.movetime.map(std::time::Duration::from_millis),
                params.movestogo,
                &config,
            );
            SearchLimits::with_soft_time(64, time_limits.soft)
        };
        if let Some(nodes) = params.nodes {
            limits = limits.with_node_limit(nodes);
        }

        if have_clock {
            let time_limits = compute_time_limits(
                std::time::Duration::from_millis(time_left_ms.unwrap_or(0)),
                std::time::Duration::from_millis(increment_ms.unwrap_or(0)),
                params.movetime.map(std::time::Duration::from_millis),
                params.movestogo,
                &config,
            );
            spawn_deadline_timer(Instant::now() + time_limits.hard, self.stop.clone());
        }

        self.spawn_worker(limits);
    }

    fn go_depth(&mut self, depth: u32) {
        self.spawn_worker(SearchLimits::depth(depth));
    }

    fn spawn_worker(&mut self, limits: SearchLimits) {
        self.stop.reset();
        *self.latest_result.lock() = None;

        let mut board = self.board.clone();
        let search_state = Arc::clone(&self.search_state);
        let stop = self.stop.clone();
        let my_generation = self.generation.load(Ordering::SeqCst);
        let generation = Arc::clone(&self.generation);
        let latest_result = Arc::clone(&self.latest_result);
        let multi_pv = self.options.multi_pv;

        let handle = thread::spawn(move || {
            let mut state = search_state.lock();

            if multi_pv <= 1 {
                let result = search(&mut board, &mut state, limits, &stop, |r| {
                    *latest_result.lock() = Some(r.clone());
                    if generation.load(Ordering::SeqCst) == my_generation {
                        print_info_line(r, 1);
                    }
                });
                *latest_result.lock() = Some(result.clone());
                if generation.load(Ordering::SeqCst) == my_generation {
                    print_bestmove(result.best_move);
                }
            } else {
                let lines =
                    search_multipv(&mut board, &mut state, limits, &stop, multi_pv as usize);
                if let Some(last) = lines.last() {
                    *latest_result.lock() = Some(last.clone());
                }
                if generation.load(Ordering::SeqCst) == my_generation {
                    for (i, r) in lines.iter().enumerate() {
                        print_info_line(r, (i + 1) as u32);
                    }
                    print_bestmove(lines.first().and_then(|r| r.best_move));
                }
            }
        });

        self.worker = Some(handle);
    }

    fn stop_search(&mut self) {
        log_debug!("search stopped by gui");
        self.stop.stop();
        self.generation.fetch_add(1, Ordering::SeqCst);
        let best = self.latest_result.lock().as_ref().and_then(|r| r.best_move);
        print_bestmove(best);
        self.worker = None;
    }
}

/// Format one iteration's [`SearchResult`] as a UCI `info` line.
fn print_info_line(result: &SearchResult, multipv_index: u32) {
    let nps = if result.time.as_secs_f64() > 0.0 {
        (result.nodes as f64 / result.time.as_secs_f64()) as u64
    } else {
        0
    };
    let score = match result.mate_in() {
        Some(m) => format!("mate {m}"),
        None => format!("cp {}", result.score),
    };
    let pv = result.pv.iter().map(format_uci_move).collect::<Vec<_>>().join(" ");
    println!(
        "info depth {} seldepth {} time {} nodes {} nps {} tthits {} hashfull {} multipv {} score {} pv {}",
        result.depth,
        result.seldepth,
        result.time.as_millis(),
        result.nodes,
        nps,
        result.tt_hits,
        result.hashfull,
        multipv_index,
        score,
        pv,
    );
}

/// Run the UCI command loop to completion (until `quit` or end of input).
pub fn run_uci_loop() {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let mut engine = EngineState::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(command) = parse_uci_command(&line) else { continue };

        match command {
            UciCommand::Uci => {
                engine.options.print(engine.search_state.lock().params());
            }
            UciCommand::IsReady => print_ready(),
            UciCommand::UciNewGame => {
                engine.supersede_running_search();
                engine.board = Board::new();
                engine.search_state.lock().new_game();
            }
            UciCommand::Position(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                parse_position_command(&mut engine.board, &refs);
            }
            UciCommand::Go(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                let params = parse_go_params(&refs);
                engine.go(params);
            }
            UciCommand::Perft(depth) => {
                let mut scratch = engine.board.clone();
                let start = Instant::now();
                let nodes = scratch.perft(depth);
                print_perft_info(depth, nodes, start.elapsed());
            }
            UciCommand::SetOption(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Some((name, value)) = parse_setoption(&refs) {
                    let mut state = engine.search_state.lock();
                    let action = engine.options.apply_setoption(&name, value.as_deref(), &mut state);
                    drop(state);
                    match action {
                        Some(UciOptionAction::ReinitHash(mb)) => {
                            log_debug!("resizing transposition table to {} MB", mb);
                            engine.search_state.lock().resize_tt(mb);
                        }
                        Some(UciOptionAction::SetThreads(_)) => {
                            // Single-threaded search for now; the option is accepted
                            // for GUI compatibility but has no effect yet.
                        }
                        None => {}
                    }
                }
            }
            UciCommand::Debug(_) => {}
            UciCommand::Stop => engine.stop_search(),
            UciCommand::PonderHit => {
                // Ponder searches run under the same stop flag as a normal
                // search and are not otherwise distinguished, so there is
                // nothing to convert here.
            }
            UciCommand::Quit => {
                engine.supersede_running_search();
                break;
            }
            UciCommand::Unknown(line) => {
                log_warn!("unrecognized uci command: {}", line);
                eprintln!("info string unknown command: {line}");
            }
        }
    }
}
