//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve position evaluations,
//! enabling significant search tree pruning. Fixed-size, power-of-two
//! bucketed (4-way set-associative) rather than a `HashMap`, so lookups
//! and stores stay O(1) without a resize/rehash path.

use std::mem;

use super::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    /// Score is the exact value.
    Exact,
    /// Score is at least this value (the search failed high against beta).
    LowerBound,
    /// Score is at most this value (the search failed low against alpha).
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TTEntry {
    hash: u64,
    depth: u32,
    score: i32,
    bound_type: BoundType,
    best_move: Option<Move>,
    generation: u16,
}

impl TTEntry {
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

const BUCKET_SIZE: usize = 4;
type Bucket = [Option<TTEntry>; BUCKET_SIZE];

pub struct TranspositionTable {
    table: Vec<Bucket>,
    mask: usize,
    occupied: usize,
    generation: u16,
    stores: u64,
    replacements: u64,
    probes: u64,
    hits: u64,
    hits_exact: u64,
    hits_lower: u64,
    hits_upper: u64,
}

impl TranspositionTable {
    /// `size_mb`: desired size in megabytes. Rounds down to the nearest
    /// power-of-two bucket count.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<Bucket>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size;
        num_entries = num_entries.next_power_of_two() / 2;
        if num_entries == 0 {
            num_entries = 1024;
        }

        TranspositionTable {
            table: vec![[None, None, None, None]; num_entries],
            mask: num_entries - 1,
            occupied: 0,
            generation: 0,
            stores: 0,
            replacements: 0,
            probes: 0,
            hits: 0,
            hits_exact: 0,
            hits_lower: 0,
            hits_upper: 0,
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Probe for a usable score at `hash` against the requested `depth` and
    /// window, per the bound-type rules; also returns the stored best move
    /// for ordering even on a miss-by-depth.
    pub(crate) fn probe(
        &mut self,
        hash: u64,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> (Option<i32>, Option<Move>) {
        self.probes += 1;
        let Some(entry) = self.probe_raw(hash) else {
            return (None, None);
        };
        let best_move = entry.best_move;
        if entry.depth < depth {
            return (None, best_move);
        }
        let score = match entry.bound_type {
            BoundType::Exact => Some(entry.score),
            BoundType::LowerBound if entry.score >= beta => Some(entry.score),
            BoundType::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        };
        if score.is_some() {
            self.hits += 1;
            match entry.bound_type {
                BoundType::Exact => self.hits_exact += 1,
                BoundType::LowerBound => self.hits_lower += 1,
                BoundType::UpperBound => self.hits_upper += 1,
            }
        }
        (score, best_move)
    }

    pub(crate) fn probe_raw(&self, hash: u64) -> Option<&TTEntry> {
        let index = self.index(hash);
        self.table[index].iter().flatten().find(|e| e.hash == hash)
    }

    /// Store a result computed with window `[alpha_orig, beta)`, deriving
    /// the bound type from where `score` landed relative to that window.
    pub(crate) fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        alpha_orig: i32,
        beta: i32,
        best_move: Option<Move>,
    ) {
        let bound_type = if score <= alpha_orig {
            BoundType::UpperBound
        } else if score >= beta {
            BoundType::LowerBound
        } else {
            BoundType::Exact
        };
        self.store_raw(hash, depth, score, bound_type, best_move);
    }

    fn store_raw(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) {
        self.stores += 1;
        let generation = self.generation;
        let index = self.index(hash);
        let bucket = &mut self.table[index];

        for slot in bucket.iter_mut() {
            if let Some(existing) = slot {
                if existing.hash == hash {
                    *slot = Some(TTEntry { hash, depth, score, bound_type, best_move, generation });
                    self.replacements += 1;
                    return;
                }
            }
        }

        for slot in bucket.iter_mut() {
            if slot.is_none() {
                *slot = Some(TTEntry { hash, depth, score, bound_type, best_move, generation });
                self.occupied += 1;
                return;
            }
        }

        let mut replace_idx = 0;
        let mut worst_priority = i32::MAX;
        for (idx, slot) in bucket.iter().enumerate() {
            if let Some(entry) = slot {
                let age = generation.wrapping_sub(entry.generation);
                let priority = (entry.depth as i32).saturating_mul(2) - age as i32;
                if idx == 0 || priority < worst_priority {
                    replace_idx = idx;
                    worst_priority = priority;
                }
            }
        }

        bucket[replace_idx] = Some(TTEntry { hash, depth, score, bound_type, best_move, generation });
        self.replacements += 1;
    }

    /// Bump the generation counter between iterative-deepening iterations so
    /// newer entries are preferred over older ones on replacement.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.table {
            *bucket = [None, None, None, None];
        }
        self.occupied = 0;
        self.generation = 0;
        self.stores = 0;
        self.replacements = 0;
        self.probes = 0;
        self.hits = 0;
        self.hits_exact = 0;
        self.hits_lower = 0;
        self.hits_upper = 0;
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let total_slots = self.table.len().saturating_mul(BUCKET_SIZE);
        if total_slots == 0 {
            return 0;
        }
        ((self.occupied as u64 * 1000) / total_slots as u64) as u32
    }

    #[must_use]
    pub fn probes(&self) -> u64 {
        self.probes
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub fn stores(&self) -> u64 {
        self.stores
    }

    #[must_use]
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    #[must_use]
    pub fn hits_exact(&self) -> u64 {
        self.hits_exact
    }

    #[must_use]
    pub fn hits_lower(&self) -> u64 {
        self.hits_lower
    }

    #[must_use]
    pub fn hits_upper(&self) -> u64 {
        self.hits_upper
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.occupied as u64
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(16)
    }
}
