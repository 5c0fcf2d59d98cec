//! A deterministic No-Limit Texas Hold'em table engine built as a
//! replicated state machine.
//!
//! The whole table fits in one [`GameSnapshot`]. Each tick, the current
//! table owner feeds the last snapshot plus sampled [`TableInputs`] through
//! [`calculate_transition`]; when something observable changed it gets a new
//! snapshot back, encodes it with [`wire`] into a 208-character frame of
//! 7-bit characters, and publishes it. Observers decode frames into their
//! own snapshot and render from that. No other state exists, so ownership
//! of the table can migrate to any host holding a recent frame.
//!
//! The transition function is pure: identical snapshot and inputs always
//! produce the identical result, on every host. Time enters only through
//! `TableInputs::now_millis` and shuffling only through an optional
//! pre-shuffled deck, so complete hands replay deterministically.
//!
//! ```
//! use holdem_engine::{SeatInput, Table, TableConfig, TableInputs};
//!
//! let mut table = Table::new(TableConfig::default());
//! let mut inputs = TableInputs::default();
//! inputs.seats[0] = SeatInput::ready_with(5000);
//! inputs.seats[1] = SeatInput::ready_with(5000);
//!
//! // Uninitialized tables wake up idle, then ready up for the deal.
//! assert!(table.tick(&inputs));
//! let frame = table.encode_frame();
//! assert_eq!(frame.chars().count(), 208);
//! ```

pub mod game;
pub mod table;
pub mod wire;

pub use game::{
    calculate_transition,
    constants::{DECK_LEN, SEATS},
    entities::{
        BettingRound, Card, Chips, Deck, GameSnapshot, Seat, SeatAction, SeatIndex, SeatInput,
        SeatProposal, SeatState, Suit, TableConfig, TableInputs, TableState,
    },
    eval::{HandValue, best_hand, evaluate_hand, hand_label},
    showdown::{divide_pot, rank_players},
};
pub use table::Table;
pub use wire::{FRAME_LEN, RECORD_LEN, WireError};
