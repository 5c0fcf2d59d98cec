//! The per-tick transition function.
//!
//! The table is a replicated state machine with a single writer: whoever
//! owns the table samples its inputs, runs [`calculate_transition`] against
//! the last published snapshot, and publishes the result when something
//! changed. Observers never tick; they only decode published frames.
//!
//! Two layers run each tick. The table layer walks the lifecycle
//! (uninitialized, idle, ready, playing, winner) on player presence and
//! timeouts. While the table is playing, the round layer resolves the acting
//! seat's proposal and advances the betting streets.

use log::{debug, info};

use super::constants::{EPOCH_MODULUS, SEATS};
use super::entities::{
    BettingRound, Deck, GameSnapshot, Seat, SeatAction, SeatIndex, SeatState, TableConfig,
    TableInputs, TableState,
};
use super::eval::{HandValue, best_hand};
use super::showdown::{divide_pot, rank_players};

/// Computes the snapshot to publish this tick, or `None` when nothing
/// observable changed. The input snapshot is never mutated; hosts holding
/// the previous snapshot keep it intact when the result is discarded.
pub fn calculate_transition(
    snapshot: &GameSnapshot,
    config: &TableConfig,
    inputs: &TableInputs,
) -> Option<GameSnapshot> {
    let mut next = snapshot.clone();
    let mut changed = false;

    let new_table_state = next_table_state(&next, config, inputs);
    if new_table_state != next.table_state {
        debug!("table {} to {}", next.table_state, new_table_state);
        next.last_transition_millis = inputs.now_millis;
        changed = true;

        if next.table_state == TableState::Ready && new_table_state == TableState::Playing {
            begin_hand(&mut next, config, inputs);
        }
        if new_table_state == TableState::Winner {
            settle(&mut next);
        }
    }
    next.table_state = new_table_state;

    match next.table_state {
        TableState::Playing => {
            if advance_round(&mut next, config, inputs) {
                next.last_transition_millis = inputs.now_millis;
                changed = true;
            }
        }
        // Stacks were just credited; leave them alone until the winner
        // display ends and they flow back through the bank.
        TableState::Winner => {}
        _ => {
            for (i, seat_input) in inputs.seats.iter().enumerate() {
                let target = if seat_input.seated {
                    seat_input.bank_balance.unwrap_or(config.starting_stack)
                } else {
                    0
                };
                if next.seats[i].stack != target {
                    debug!("seat {i} stack {} reconciled to {target}", next.seats[i].stack);
                    next.seats[i].stack = target;
                    changed = true;
                }
            }
        }
    }

    if changed {
        next.epoch = snapshot.epoch.wrapping_add(1) % EPOCH_MODULUS;
        next.big_blind = config.big_blind;
        Some(next)
    } else {
        None
    }
}

/// The table lifecycle step, with no side effects on the snapshot.
fn next_table_state(
    snapshot: &GameSnapshot,
    config: &TableConfig,
    inputs: &TableInputs,
) -> TableState {
    let mut seated = 0;
    let mut ready_and_stacked = 0;
    for (i, seat_input) in inputs.seats.iter().enumerate() {
        if seat_input.seated {
            seated += 1;
            if seat_input.ready && snapshot.seats[i].stack >= config.big_blind {
                ready_and_stacked += 1;
            }
        }
    }

    let elapsed_secs = (inputs.now_millis - snapshot.last_transition_millis) / 1000;
    match snapshot.table_state {
        TableState::Uninitialized => TableState::Idle,
        TableState::Idle => {
            if ready_and_stacked > 1 {
                info!("{ready_and_stacked} players ready and stacked");
                TableState::Ready
            } else {
                TableState::Idle
            }
        }
        TableState::Ready => {
            if ready_and_stacked < 2 {
                TableState::Idle
            } else if elapsed_secs > config.ready_timeout_secs {
                TableState::Playing
            } else {
                TableState::Ready
            }
        }
        TableState::Playing => {
            if seated < 1 {
                info!("all players left mid hand");
                TableState::Idle
            } else if snapshot.betting_round > BettingRound::River || snapshot.won_by_fold {
                TableState::Winner
            } else {
                TableState::Playing
            }
        }
        TableState::Winner => {
            if elapsed_secs > config.winner_timeout_secs {
                TableState::Idle
            } else {
                TableState::Winner
            }
        }
    }
}

/// First eligible seat after `start`, wrapping; `start` itself when no other
/// seat qualifies.
fn next_eligible_seat(start: SeatIndex, eligible: &[bool; SEATS]) -> SeatIndex {
    let mut i = (start + 1) % SEATS;
    while i != start {
        if eligible[i] {
            return i;
        }
        i = (i + 1) % SEATS;
    }
    start
}

/// Ready-to-Playing edge: seats the hand, rotates the button, posts blinds
/// and deals the whole board up front.
fn begin_hand(next: &mut GameSnapshot, config: &TableConfig, inputs: &TableInputs) {
    let mut eligible = [false; SEATS];
    for i in 0..SEATS {
        let seat_input = &inputs.seats[i];
        let seat = &mut next.seats[i];
        if seat_input.seated && seat_input.ready && seat.stack >= config.big_blind {
            seat.state = SeatState::Pending;
            eligible[i] = true;
        } else {
            seat.state = SeatState::Dead;
        }
        seat.round_contribution = 0;
        seat.pot_contribution = 0;
    }

    let dealer = next_eligible_seat(next.dealer_seat, &eligible);
    let mut small_blind = next_eligible_seat(dealer, &eligible);
    let mut big_blind = next_eligible_seat(small_blind, &eligible);
    // Two-handed, the dealer posts the small blind and acts first preflop.
    let acting = if big_blind == dealer {
        big_blind = small_blind;
        small_blind = dealer;
        dealer
    } else {
        next_eligible_seat(big_blind, &eligible)
    };
    info!("dealing: button {dealer}, blinds {small_blind}/{big_blind}, action on {acting}");

    next.seats[small_blind].round_contribution = config.big_blind / 2;
    next.seats[small_blind].stack -= config.big_blind / 2;
    next.seats[big_blind].round_contribution = config.big_blind;
    next.seats[big_blind].stack -= config.big_blind;
    next.seats[acting].state = SeatState::Acting;
    next.dealer_seat = dealer;
    next.acting_seat = acting;

    // Every seat gets hole cards so the deck positions are fixed; dead
    // seats simply never show theirs.
    let mut deck = match inputs.deck {
        Some(cards) => Deck::from(cards),
        None => Deck::shuffled(),
    };
    for seat in next.seats.iter_mut() {
        let first = deck.deal();
        let second = deck.deal();
        seat.hole = if second > first {
            [second, first]
        } else {
            [first, second]
        };
    }
    deck.burn();
    let flop = [deck.deal(), deck.deal(), deck.deal()];
    deck.burn();
    let turn = deck.deal();
    deck.burn();
    let river = deck.deal();
    next.community = [flop[0], flop[1], flop[2], turn, river];

    next.betting_round = BettingRound::Preflop;
    next.current_bet = config.big_blind;
    next.minimum_raise = config.big_blind;
    next.heads_up = false;
    next.won_by_fold = false;
}

fn hand_values(snapshot: &GameSnapshot) -> [HandValue; SEATS] {
    let mut values = [0; SEATS];
    for (i, seat) in snapshot.seats.iter().enumerate() {
        if seat.is_alive() {
            values[i] = best_hand(seat.hole, &snapshot.community);
        }
    }
    values
}

/// Winner edge: pays the pot out to stacks and empties it.
fn settle(next: &mut GameSnapshot) {
    if next.won_by_fold {
        let total = next.seats.iter().map(|s| s.pot_contribution).sum::<u32>();
        if let Some(survivor) = next.seats.iter().position(Seat::is_alive) {
            info!("seat {survivor} wins {total} uncontested");
            next.seats[survivor].stack += total;
        }
    } else {
        let values = hand_values(next);
        let ranks = rank_players(&values);
        let mut contributions = [0; SEATS];
        for (i, seat) in next.seats.iter().enumerate() {
            contributions[i] = seat.pot_contribution;
        }
        let winnings = divide_pot(&contributions, &ranks);
        for (i, &won) in winnings.iter().enumerate() {
            if won > 0 {
                info!("seat {i} wins {won} at showdown");
            }
            next.seats[i].stack += won;
        }
    }
    for seat in next.seats.iter_mut() {
        seat.pot_contribution = 0;
        seat.round_contribution = 0;
    }
}

/// The round layer. Resolves the acting seat's proposal, then either moves
/// the action or closes the street. Returns whether the snapshot changed.
fn advance_round(next: &mut GameSnapshot, config: &TableConfig, inputs: &TableInputs) -> bool {
    let elapsed_secs = (inputs.now_millis - next.last_transition_millis) / 1000;

    // Every live stack all in: nothing to decide, streets advance on a
    // timer so spectators can watch the board run out.
    if next.heads_up {
        if elapsed_secs < config.heads_up_timeout_secs {
            return false;
        }
        next.betting_round = next.betting_round.next();
        debug!("run-out timer, now at {}", next.betting_round);
        next.acting_seat = 0;
        next.current_bet = 0;
        next.minimum_raise = 0;
        return true;
    }

    let acting = next.acting_seat;
    let proposal = &inputs.proposal;
    let folded = proposal.committed && proposal.action == SeatAction::Fold;
    let timed_out = elapsed_secs > config.action_timeout_secs;
    let walked_away = !inputs.seats[acting].seated;

    if folded || timed_out || walked_away {
        debug!("seat {acting} is out (folded {folded}, timeout {timed_out})");
        next.seats[acting].state = SeatState::Dead;
    } else if let (true, SeatAction::Bet(bet)) = (proposal.committed, proposal.action) {
        let seat = &next.seats[acting];
        let valid = bet <= seat.stack
            && (seat.round_contribution + bet == next.current_bet
                || bet == seat.stack
                || seat.round_contribution + bet >= next.current_bet + next.minimum_raise);
        if !valid {
            debug!("seat {acting} proposed invalid bet {bet}");
            return false;
        }

        let seat = &mut next.seats[acting];
        seat.stack -= bet;
        seat.round_contribution += bet;
        let street_total = seat.round_contribution;
        // A raise is measured by the street total, so completing the big
        // blind does not count as one.
        if street_total > next.current_bet {
            next.minimum_raise = street_total - next.current_bet;
            next.current_bet = street_total;
            info!("seat {acting} raises to {street_total}");
            // Everyone who already matched owes a decision again.
            for (i, other) in next.seats.iter_mut().enumerate() {
                if i != acting && other.state == SeatState::Committed && other.stack > 0 {
                    other.state = SeatState::Pending;
                }
            }
        } else {
            debug!("seat {acting} puts in {bet}");
        }
        next.seats[acting].state = SeatState::Committed;
    } else {
        // Still waiting on a committed proposal.
        return false;
    }

    let mut next_actor = (acting + 1) % SEATS;
    while next_actor != acting && next.seats[next_actor].state != SeatState::Pending {
        next_actor = (next_actor + 1) % SEATS;
    }
    let alive = next.alive_seats();

    if next_actor != acting && alive >= 2 {
        next.seats[next_actor].state = SeatState::Acting;
        next.acting_seat = next_actor;
        debug!("action on seat {next_actor}");
        return true;
    }

    // Street closed: rake the street bets into the pot and reopen anyone
    // who can still bet on a later street.
    let round = next.betting_round;
    let mut pending = 0;
    for seat in next.seats.iter_mut() {
        seat.pot_contribution += seat.round_contribution;
        seat.round_contribution = 0;
        if round < BettingRound::River && seat.state == SeatState::Committed && seat.stack > 0 {
            seat.state = SeatState::Pending;
            pending += 1;
        }
    }
    debug!("{round} closed, {pending} pending, {alive} alive");

    next.acting_seat = 0;
    next.current_bet = 0;
    next.minimum_raise = config.big_blind;
    if round == BettingRound::River {
        next.betting_round = BettingRound::Showdown;
        next.heads_up = false;
        next.won_by_fold = false;
    } else if pending > 1 {
        // Next street opens on the first pending seat at or after the
        // button.
        let mut opener = next.dealer_seat;
        while next.seats[opener].state != SeatState::Pending {
            opener = (opener + 1) % SEATS;
        }
        next.seats[opener].state = SeatState::Acting;
        next.betting_round = round.next();
        next.acting_seat = opener;
    } else if alive == 1 {
        // Keep the street; the winner edge sweeps the pot next tick.
        next.won_by_fold = true;
    } else {
        // Everyone left is all in; lock the seats and run the board out.
        for seat in next.seats.iter_mut() {
            if seat.state == SeatState::Pending {
                seat.state = SeatState::Committed;
            }
        }
        next.betting_round = round.next();
        next.heads_up = true;
    }
    true
}
