use std::{fmt, str::FromStr};

use rand::{rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    COMMUNITY_CARDS, DECK_LEN, DEFAULT_ACTION_TIMEOUT_SECS, DEFAULT_BIG_BLIND,
    DEFAULT_HEADS_UP_TIMEOUT_SECS, DEFAULT_READY_TIMEOUT_SECS, DEFAULT_STARTING_STACK,
    DEFAULT_WINNER_TIMEOUT_SECS, HOLE_CARDS, SEATS,
};

/// Chip amounts. Stacks, bets and pots never go negative.
pub type Chips = u32;

/// Index into the fixed seat array.
pub type SeatIndex = usize;

/// Rank glyphs indexed by `rank - 2`.
const RANK_GLYPHS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Diamond,
    Heart,
    Club,
    Spade,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Club => "♣",
            Suit::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// A card encoded as a single byte in `0..52`.
///
/// `card % 13` is the rank offset (deuce through ace) and `card / 13` is the
/// suit, diamonds first, spades last. The whole deck is `Card(0)..Card(51)`.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Card(pub u8);

impl Card {
    /// Rank in `2..=14`, where 11 is jack and 14 is ace.
    pub fn rank(self) -> u8 {
        self.0 % 13 + 2
    }

    pub fn suit(self) -> Suit {
        match self.0 / 13 {
            0 => Suit::Diamond,
            1 => Suit::Heart,
            2 => Suit::Club,
            _ => Suit::Spade,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", RANK_GLYPHS[(self.0 % 13) as usize], self.suit())
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("not a card: {0:?}")]
pub struct ParseCardError(String);

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses compact card names like `AS`, `TD` or `10D`, `2H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardError(s.to_string());
        let (rank_part, suit_part) = s.split_at(s.len().checked_sub(1).ok_or_else(err)?);
        let rank = match rank_part {
            "T" | "10" => 8,
            "J" => 9,
            "Q" => 10,
            "K" => 11,
            "A" => 12,
            d => {
                let n: u8 = d.parse().map_err(|_| err())?;
                if !(2..=9).contains(&n) {
                    return Err(err());
                }
                n - 2
            }
        };
        let suit = match suit_part {
            "D" => 0,
            "H" => 1,
            "C" => 2,
            "S" => 3,
            _ => return Err(err()),
        };
        Ok(Card(suit * 13 + rank))
    }
}

/// A deck of 52 cards dealt from the top. Decks never ride the wire or any
/// other serialized surface; only the dealt cards in the snapshot do.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: [Card; DECK_LEN],
    next: usize,
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = [Card(0); DECK_LEN];
        for (i, card) in cards.iter_mut().enumerate() {
            *card = Card(i as u8);
        }
        Self { cards, next: 0 }
    }
}

impl From<[Card; DECK_LEN]> for Deck {
    fn from(cards: [Card; DECK_LEN]) -> Self {
        Self { cards, next: 0 }
    }
}

impl Deck {
    pub fn shuffled() -> Self {
        let mut deck = Self::default();
        deck.shuffle();
        deck
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rng());
        self.next = 0;
    }

    /// Deals the next card. Wraps around rather than running dry; a hand
    /// consumes at most 28 cards so the wrap is never reached in play.
    pub fn deal(&mut self) -> Card {
        let card = self.cards[self.next % DECK_LEN];
        self.next += 1;
        card
    }

    /// Discards the next card face down.
    pub fn burn(&mut self) {
        self.next += 1;
    }
}

/// Table lifecycle. Discriminants are fixed by the wire format; 4 is unused.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[repr(u8)]
pub enum TableState {
    #[default]
    Uninitialized = 0,
    Idle = 1,
    Ready = 2,
    Playing = 3,
    Winner = 5,
}

impl TableState {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Uninitialized),
            1 => Some(Self::Idle),
            2 => Some(Self::Ready),
            3 => Some(Self::Playing),
            5 => Some(Self::Winner),
            _ => None,
        }
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            TableState::Uninitialized => "uninitialized",
            TableState::Idle => "idle",
            TableState::Ready => "ready",
            TableState::Playing => "playing",
            TableState::Winner => "winner",
        };
        write!(f, "{repr}")
    }
}

/// Betting streets in play order. `Showdown` marks a hand awaiting payout.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[repr(u8)]
pub enum BettingRound {
    #[default]
    NotPlaying = 0,
    Preflop = 1,
    Flop = 2,
    Turn = 3,
    River = 4,
    Showdown = 5,
}

impl BettingRound {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::NotPlaying),
            1 => Some(Self::Preflop),
            2 => Some(Self::Flop),
            3 => Some(Self::Turn),
            4 => Some(Self::River),
            5 => Some(Self::Showdown),
            _ => None,
        }
    }

    /// The street after this one, saturating at showdown.
    pub fn next(self) -> Self {
        match self {
            Self::NotPlaying => Self::Preflop,
            Self::Preflop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River | Self::Showdown => Self::Showdown,
        }
    }

    /// Community cards visible on this street.
    pub fn visible_community_cards(self) -> usize {
        match self {
            Self::NotPlaying | Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River | Self::Showdown => COMMUNITY_CARDS,
        }
    }
}

impl fmt::Display for BettingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            BettingRound::NotPlaying => "not playing",
            BettingRound::Preflop => "preflop",
            BettingRound::Flop => "flop",
            BettingRound::Turn => "turn",
            BettingRound::River => "river",
            BettingRound::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// Where a seat stands within the current hand.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[repr(u8)]
pub enum SeatState {
    /// Folded, absent, or never in the hand. Dead seats stay dead until the
    /// next hand is dealt.
    #[default]
    Dead = 0,
    /// Still owes a decision this street.
    Pending = 1,
    /// The one seat whose action the table is waiting on.
    Acting = 2,
    /// Matched the current bet for this street.
    Committed = 3,
}

impl SeatState {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Dead),
            1 => Some(Self::Pending),
            2 => Some(Self::Acting),
            3 => Some(Self::Committed),
            _ => None,
        }
    }
}

impl fmt::Display for SeatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            SeatState::Dead => "dead",
            SeatState::Pending => "pending",
            SeatState::Acting => "acting",
            SeatState::Committed => "committed",
        };
        write!(f, "{repr}")
    }
}

/// Per-seat replicated state.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seat {
    pub state: SeatState,
    /// Hole cards, sorted high card first. Meaningless while Dead outside a
    /// hand; every seat receives cards when a hand is dealt.
    pub hole: [Card; HOLE_CARDS],
    /// Chips behind, in front of nothing.
    pub stack: Chips,
    /// Chips committed to the pot in completed streets of this hand.
    pub pot_contribution: Chips,
    /// Chips bet so far on the current street.
    pub round_contribution: Chips,
}

impl Seat {
    /// A dead seat is out of the hand; everyone else can still win it.
    pub fn is_alive(&self) -> bool {
        self.state != SeatState::Dead
    }
}

/// The complete replicated table state. One of these is authored by the
/// current table owner each tick and replicated to every observer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Change counter, wrapping modulo 255. Observers use it to detect
    /// re-published identical frames.
    pub epoch: u8,
    pub table_state: TableState,
    pub betting_round: BettingRound,
    /// Every live stack is all in; streets advance on a timer.
    pub heads_up: bool,
    /// The hand ended with one seat left; no showdown is needed.
    pub won_by_fold: bool,
    pub dealer_seat: SeatIndex,
    pub acting_seat: SeatIndex,
    /// Flop, turn and river, fully dealt up front and revealed per street.
    pub community: [Card; COMMUNITY_CARDS],
    pub big_blind: Chips,
    pub minimum_raise: Chips,
    pub current_bet: Chips,
    /// Wall-clock milliseconds of the last published transition.
    pub last_transition_millis: i64,
    pub seats: [Seat; SEATS],
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            epoch: 0,
            table_state: TableState::Uninitialized,
            betting_round: BettingRound::NotPlaying,
            heads_up: false,
            won_by_fold: false,
            dealer_seat: 0,
            acting_seat: 0,
            community: [Card(0); COMMUNITY_CARDS],
            big_blind: 0,
            minimum_raise: 0,
            current_bet: 0,
            last_transition_millis: 0,
            seats: [Seat::default(); SEATS],
        }
    }
}

impl GameSnapshot {
    /// Chips currently in the pot, not counting live street bets.
    pub fn pot(&self) -> Chips {
        self.seats.iter().map(|s| s.pot_contribution).sum()
    }

    pub fn alive_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_alive()).count()
    }
}

/// Table parameters, fixed for the lifetime of a table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableConfig {
    pub big_blind: Chips,
    /// Stack granted to a seated player with no bank balance on record.
    pub starting_stack: Chips,
    pub ready_timeout_secs: i64,
    pub action_timeout_secs: i64,
    pub heads_up_timeout_secs: i64,
    pub winner_timeout_secs: i64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            big_blind: DEFAULT_BIG_BLIND,
            starting_stack: DEFAULT_STARTING_STACK,
            ready_timeout_secs: DEFAULT_READY_TIMEOUT_SECS,
            action_timeout_secs: DEFAULT_ACTION_TIMEOUT_SECS,
            heads_up_timeout_secs: DEFAULT_HEADS_UP_TIMEOUT_SECS,
            winner_timeout_secs: DEFAULT_WINNER_TIMEOUT_SECS,
        }
    }
}

/// What the acting seat wants to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeatAction {
    Fold,
    /// Additional chips pushed in. `Bet(0)` is a check when nothing is owed.
    Bet(Chips),
}

impl Default for SeatAction {
    fn default() -> Self {
        Self::Bet(0)
    }
}

impl fmt::Display for SeatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatAction::Fold => write!(f, "fold"),
            SeatAction::Bet(0) => write!(f, "check"),
            SeatAction::Bet(amount) => write!(f, "bet {amount}"),
        }
    }
}

/// The acting seat's proposal as sampled by the host this tick. An
/// uncommitted proposal is still being edited and is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeatProposal {
    pub action: SeatAction,
    pub committed: bool,
}

impl SeatProposal {
    pub fn fold() -> Self {
        Self {
            action: SeatAction::Fold,
            committed: true,
        }
    }

    pub fn bet(amount: Chips) -> Self {
        Self {
            action: SeatAction::Bet(amount),
            committed: true,
        }
    }
}

/// Per-seat host inputs sampled once per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeatInput {
    /// A player is physically in the seat.
    pub seated: bool,
    /// The player has toggled ready for the next hand.
    pub ready: bool,
    /// Bank balance to reconcile the stack against between hands. `None`
    /// means no account yet; such a player is staked the starting stack.
    pub bank_balance: Option<Chips>,
}

impl SeatInput {
    pub fn ready_with(balance: Chips) -> Self {
        Self {
            seated: true,
            ready: true,
            bank_balance: Some(balance),
        }
    }
}

/// Everything outside the snapshot that a tick may read.
#[derive(Clone, Debug, Default)]
pub struct TableInputs {
    pub now_millis: i64,
    pub seats: [SeatInput; SEATS],
    /// Proposal from whichever seat the snapshot says is acting.
    pub proposal: SeatProposal,
    /// Pre-shuffled deck for the next deal. `None` shuffles a fresh one.
    pub deck: Option<[Card; DECK_LEN]>,
}
