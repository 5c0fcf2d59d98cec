//! Property-based tests for the wire codec: every encodable snapshot must
//! survive the frame round trip, and no input may make decoding panic.

use holdem_engine::{
    BettingRound, Card, FRAME_LEN, GameSnapshot, Seat, SeatState, TableState, wire,
};
use proptest::prelude::*;

fn card_strategy() -> impl Strategy<Value = Card> {
    (0u8..52).prop_map(Card)
}

fn table_state_strategy() -> impl Strategy<Value = TableState> {
    prop::sample::select(vec![
        TableState::Uninitialized,
        TableState::Idle,
        TableState::Ready,
        TableState::Playing,
        TableState::Winner,
    ])
}

fn betting_round_strategy() -> impl Strategy<Value = BettingRound> {
    (0u8..6).prop_map(|b| BettingRound::from_byte(b).unwrap_or_default())
}

fn seat_strategy() -> impl Strategy<Value = Seat> {
    (
        (0u8..4).prop_map(|b| SeatState::from_byte(b).unwrap_or_default()),
        prop::array::uniform2(card_strategy()),
        // u32::MAX itself clamps through the stack's wire offset
        0u32..u32::MAX,
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|(state, hole, stack, pot, round)| Seat {
            state,
            hole,
            stack,
            pot_contribution: pot,
            round_contribution: round,
        })
}

fn snapshot_strategy() -> impl Strategy<Value = GameSnapshot> {
    (
        (
            any::<u8>(),
            table_state_strategy(),
            betting_round_strategy(),
            any::<bool>(),
            any::<bool>(),
            0usize..10,
            0usize..10,
        ),
        prop::array::uniform5(card_strategy()),
        (any::<u32>(), any::<u32>(), any::<u32>()),
        // the magnitude rides the wire as one unsigned word
        -i64::from(u32::MAX)..=i64::from(u32::MAX),
        prop::array::uniform10(seat_strategy()),
    )
        .prop_map(
            |(
                (epoch, table_state, betting_round, heads_up, won_by_fold, dealer, acting),
                community,
                (big_blind, minimum_raise, current_bet),
                last_transition_millis,
                seats,
            )| GameSnapshot {
                epoch,
                table_state,
                betting_round,
                heads_up,
                won_by_fold,
                dealer_seat: dealer,
                acting_seat: acting,
                community,
                big_blind,
                minimum_raise,
                current_bet,
                last_transition_millis,
                seats,
            },
        )
}

proptest! {
    #[test]
    fn every_snapshot_survives_the_frame(snapshot in snapshot_strategy()) {
        let frame = wire::encode(&snapshot);
        prop_assert_eq!(frame.chars().count(), FRAME_LEN);
        prop_assert!(frame.chars().all(|c| (c as u32) < 128));
        prop_assert_eq!(wire::decode(&frame), Ok(snapshot));
    }

    #[test]
    fn encoding_is_deterministic(snapshot in snapshot_strategy()) {
        prop_assert_eq!(wire::encode(&snapshot), wire::encode(&snapshot));
    }

    #[test]
    fn distinct_snapshots_never_collide(
        a in snapshot_strategy(),
        b in snapshot_strategy(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(wire::encode(&a), wire::encode(&b));
    }

    #[test]
    fn arbitrary_strings_never_panic_the_decoder(frame in any::<String>()) {
        // almost always a length error; either way it must return
        let _ = wire::decode(&frame);
    }

    #[test]
    fn well_sized_noise_never_panics_the_decoder(
        chars in prop::collection::vec(0u8..128, FRAME_LEN),
    ) {
        let frame: String = chars.into_iter().map(char::from).collect();
        let _ = wire::decode(&frame);
    }

    #[test]
    fn record_decoding_tolerates_any_bytes(
        bytes in prop::collection::vec(any::<u8>(), 182),
    ) {
        let mut record = [0u8; 182];
        record.copy_from_slice(&bytes);
        let _ = wire::decode_record(&record);
    }
}
