//! Track geometry: where each color enters, turns in and finishes.
//!
//! Everything here is a pure function of `Color` and `PiecePosition`; the
//! rules consult it, nothing in it holds state.

pub mod geometry;

pub use geometry::{
    advance, is_safe, position_at, progress, start_cell, steps_to_finish, turn_in_cell,
    DEFAULT_SAFE_CELLS, ENTRY_ROLL, FINISH_PROGRESS, HOME_STRETCH_LEN, TRACK_LEN,
    TURN_IN_PROGRESS,
};
