//! Engine-level orchestration that sits above `board`: time management and
//! (via `uci`) the asynchronous search worker.

pub mod time;
