//! Fixed table dimensions and default settings.

/// Number of seats at a table. Seat indices are `0..SEATS`.
pub const SEATS: usize = 10;

/// Cards in a standard deck.
pub const DECK_LEN: usize = 52;

/// Community cards dealt over flop, turn and river.
pub const COMMUNITY_CARDS: usize = 5;

/// Hole cards dealt to each seat.
pub const HOLE_CARDS: usize = 2;

/// The epoch counter wraps at this modulus so it always fits one wire byte.
pub const EPOCH_MODULUS: u8 = 255;

/// Default big blind posted at the start of every hand.
pub const DEFAULT_BIG_BLIND: u32 = 50;

/// Default stack granted to a player whose bank account is brand new.
pub const DEFAULT_STARTING_STACK: u32 = 5000;

/// Seconds a table lingers in Ready before cards are dealt.
pub const DEFAULT_READY_TIMEOUT_SECS: i64 = 10;

/// Seconds the acting seat gets before being folded out.
pub const DEFAULT_ACTION_TIMEOUT_SECS: i64 = 90;

/// Seconds between streets once every live stack is all in.
pub const DEFAULT_HEADS_UP_TIMEOUT_SECS: i64 = 5;

/// Seconds the winner display lingers before the table goes idle.
pub const DEFAULT_WINNER_TIMEOUT_SECS: i64 = 15;
