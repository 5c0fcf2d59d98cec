//! The replicated wire format.
//!
//! A snapshot serializes to a fixed 182-byte record, then packs into a
//! 208-character frame of 7-bit characters (7 bytes per 8 characters) that
//! survives transports restricted to ASCII strings. Multi-byte integers are
//! big endian. The record's layout never varies, so observers can decode any
//! frame without negotiation:
//!
//! ```text
//! epoch, table state, betting round, heads up, won by fold,
//! dealer seat, acting seat                                   7 bytes
//! community cards                                            5 bytes
//! big blind, minimum raise, current bet                      3 x 4 bytes
//! |last transition millis|, sign byte                        4 + 1 bytes
//! per seat: state, hole cards, stack + 1,
//!           pot contribution, round contribution             10 x 15 bytes
//! zero padding                                               3 bytes
//! ```
//!
//! Stacks ride the wire offset by one so a zeroed buffer cannot be mistaken
//! for a live record. Malformed frames decode to an error and must be
//! discarded; the caller keeps its previous snapshot.

use log::warn;
use thiserror::Error;

use crate::game::constants::{COMMUNITY_CARDS, DECK_LEN, SEATS};
use crate::game::entities::{
    BettingRound, Card, GameSnapshot, Seat, SeatState, TableState,
};

/// Serialized record size in bytes, 179 used plus 3 padding.
pub const RECORD_LEN: usize = 182;

/// Packed frame size in characters.
pub const FRAME_LEN: usize = RECORD_LEN / 7 * 8;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum WireError {
    #[error("frame is {0} characters, expected {FRAME_LEN}")]
    FrameLength(usize),
    #[error("frame character {0:?} is not 7-bit")]
    FrameCharacter(char),
    #[error("unknown {field} discriminant {value}")]
    Discriminant { field: &'static str, value: u8 },
    #[error("seat index {0} out of range")]
    SeatIndex(u8),
    #[error("card byte {0} out of range")]
    CardByte(u8),
}

/// Encodes a snapshot into a wire frame.
pub fn encode(snapshot: &GameSnapshot) -> String {
    pack_frame(&encode_record(snapshot))
}

/// Decodes a wire frame back into a snapshot.
pub fn decode(frame: &str) -> Result<GameSnapshot, WireError> {
    decode_record(&unpack_frame(frame)?)
}

fn seat_byte(index: usize) -> u8 {
    if index >= SEATS {
        warn!("seat index {index} out of range, clamping");
        return (SEATS - 1) as u8;
    }
    index as u8
}

pub fn encode_record(snapshot: &GameSnapshot) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    let mut n = 0;
    let mut put = |bytes: &[u8]| {
        buf[n..n + bytes.len()].copy_from_slice(bytes);
        n += bytes.len();
    };

    put(&[
        snapshot.epoch,
        snapshot.table_state as u8,
        snapshot.betting_round as u8,
        u8::from(snapshot.heads_up),
        u8::from(snapshot.won_by_fold),
        seat_byte(snapshot.dealer_seat),
        seat_byte(snapshot.acting_seat),
    ]);
    for card in snapshot.community {
        put(&[card.0]);
    }
    put(&snapshot.big_blind.to_be_bytes());
    put(&snapshot.minimum_raise.to_be_bytes());
    put(&snapshot.current_bet.to_be_bytes());

    // Tick timestamps may be negative depending on the host's clock origin,
    // so the magnitude and sign travel separately.
    let millis = snapshot.last_transition_millis;
    let magnitude = u32::try_from(millis.unsigned_abs()).unwrap_or_else(|_| {
        warn!("transition time {millis} overflows the wire, clamping");
        u32::MAX
    });
    put(&magnitude.to_be_bytes());
    put(&[u8::from(millis >= 0)]);

    for seat in &snapshot.seats {
        put(&[seat.state as u8, seat.hole[0].0, seat.hole[1].0]);
        // +1 keeps zero free as the empty-buffer marker.
        let stack = seat.stack.checked_add(1).unwrap_or_else(|| {
            warn!("stack {} overflows the wire, clamping", seat.stack);
            u32::MAX
        });
        put(&stack.to_be_bytes());
        put(&seat.pot_contribution.to_be_bytes());
        put(&seat.round_contribution.to_be_bytes());
    }
    // remaining bytes stay zero padding
    buf
}

struct RecordReader<'a> {
    buf: &'a [u8; RECORD_LEN],
    n: usize,
}

impl RecordReader<'_> {
    fn byte(&mut self) -> u8 {
        let b = self.buf[self.n];
        self.n += 1;
        b
    }

    fn word(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        for slot in &mut bytes {
            *slot = self.byte();
        }
        u32::from_be_bytes(bytes)
    }
}

pub fn decode_record(buf: &[u8; RECORD_LEN]) -> Result<GameSnapshot, WireError> {
    let mut r = RecordReader { buf, n: 0 };
    let seat_index = |b: u8| {
        if usize::from(b) < SEATS {
            Ok(usize::from(b))
        } else {
            Err(WireError::SeatIndex(b))
        }
    };
    let card = |b: u8| {
        if usize::from(b) < DECK_LEN {
            Ok(Card(b))
        } else {
            Err(WireError::CardByte(b))
        }
    };

    let mut snapshot = GameSnapshot::default();
    snapshot.epoch = r.byte();
    let table_state = r.byte();
    snapshot.table_state = TableState::from_byte(table_state).ok_or(WireError::Discriminant {
        field: "table state",
        value: table_state,
    })?;
    let betting_round = r.byte();
    snapshot.betting_round =
        BettingRound::from_byte(betting_round).ok_or(WireError::Discriminant {
            field: "betting round",
            value: betting_round,
        })?;
    snapshot.heads_up = r.byte() > 0;
    snapshot.won_by_fold = r.byte() > 0;
    snapshot.dealer_seat = seat_index(r.byte())?;
    snapshot.acting_seat = seat_index(r.byte())?;
    for i in 0..COMMUNITY_CARDS {
        snapshot.community[i] = card(r.byte())?;
    }
    snapshot.big_blind = r.word();
    snapshot.minimum_raise = r.word();
    snapshot.current_bet = r.word();

    let magnitude = i64::from(r.word());
    let positive = r.byte() > 0;
    snapshot.last_transition_millis = if positive { magnitude } else { -magnitude };

    for i in 0..SEATS {
        let state = r.byte();
        let hole = [card(r.byte())?, card(r.byte())?];
        snapshot.seats[i] = Seat {
            state: SeatState::from_byte(state).ok_or(WireError::Discriminant {
                field: "seat state",
                value: state,
            })?,
            hole,
            stack: r.word().saturating_sub(1),
            pot_contribution: r.word(),
            round_contribution: r.word(),
        };
    }
    Ok(snapshot)
}

/// Packs the record into 7-bit characters, 7 bytes to 8 characters.
pub fn pack_frame(buf: &[u8; RECORD_LEN]) -> String {
    let mut frame = String::with_capacity(FRAME_LEN);
    for chunk in buf.chunks_exact(7) {
        let mut pack: u64 = 0;
        for &b in chunk {
            pack = (pack << 8) | u64::from(b);
        }
        for shift in [49, 42, 35, 28, 21, 14, 7, 0] {
            frame.push(char::from(((pack >> shift) & 127) as u8));
        }
    }
    frame
}

/// Unpacks a frame back into the record, rejecting anything that is not
/// exactly [`FRAME_LEN`] 7-bit characters.
pub fn unpack_frame(frame: &str) -> Result<[u8; RECORD_LEN], WireError> {
    let chars: Vec<char> = frame.chars().collect();
    if chars.len() != FRAME_LEN {
        return Err(WireError::FrameLength(chars.len()));
    }

    let mut buf = [0u8; RECORD_LEN];
    for (i, group) in chars.chunks_exact(8).enumerate() {
        let mut pack: u64 = 0;
        for &c in group {
            let bits = u64::from(c);
            if bits > 127 {
                return Err(WireError::FrameCharacter(c));
            }
            pack = (pack << 7) | bits;
        }
        for (j, shift) in [48, 40, 32, 24, 16, 8, 0].into_iter().enumerate() {
            buf[i * 7 + j] = ((pack >> shift) & 255) as u8;
        }
    }
    Ok(buf)
}
