//! Five-card hand evaluation.
//!
//! A hand scores as a single `u64` whose bit layout makes plain integer
//! comparison agree with poker hand ordering. From the most significant
//! populated bit down:
//!
//! ```text
//! bit 38  straight flush
//! bit 37  wheel straight flush
//! bit 36  four of a kind
//! bit 35  full house
//! bit 34  flush
//! bit 33  straight
//! bit 32  wheel
//! 28..=31 three-of-a-kind rank
//! 24..=27 high pair rank
//! 20..=23 low pair rank
//! 0..=19  five kicker ranks, highest in the top nibble
//! ```
//!
//! The kicker nibbles always carry the full sorted hand, so equal categories
//! tie-break correctly and exact ties compare equal.

use super::constants::{COMMUNITY_CARDS, HOLE_CARDS};
use super::entities::Card;

/// Comparable score for a five-card hand. Zero is reserved for "no hand" and
/// ranks below every real hand.
pub type HandValue = u64;

const WHEEL_BIT: u64 = 1 << 32;
const STRAIGHT_BIT: u64 = 1 << 33;
const FLUSH_BIT: u64 = 1 << 34;
const FULL_HOUSE_BIT: u64 = 1 << 35;
const QUADS_BIT: u64 = 1 << 36;
const WHEEL_FLUSH_BIT: u64 = 1 << 37;
const STRAIGHT_FLUSH_BIT: u64 = 1 << 38;

/// Scores exactly five cards.
pub fn evaluate_hand(cards: [Card; 5]) -> HandValue {
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());

    let mut r = cards.map(Card::rank);
    // Five elements, insertion sort is plenty.
    for i in 1..r.len() {
        let mut j = i;
        while j > 0 && r[j - 1] > r[j] {
            r.swap(j - 1, j);
            j -= 1;
        }
    }

    let runs_up_to_five = r[1] == r[0] + 1 && r[2] == r[1] + 1 && r[3] == r[2] + 1;
    let straight = runs_up_to_five && r[4] == r[3] + 1;
    // A-2-3-4-5, the ace sorted to the top.
    let wheel = runs_up_to_five && !straight && r[0] == 2 && r[4] == 14;

    // Repeated ranks sit adjacent after the sort. Walk the four gaps and
    // track what each equality extends: a pair into trips, trips into quads,
    // or a second pair alongside the first.
    let mut pair0: u64 = 0;
    let mut pair1: u64 = 0;
    let mut triple: u64 = 0;
    if !straight {
        let (r0, r1, r2, r3, r4) = (
            u64::from(r[0]),
            u64::from(r[1]),
            u64::from(r[2]),
            u64::from(r[3]),
            u64::from(r[4]),
        );
        if r1 == r0 {
            pair0 = r1;
        }
        if r2 == r1 {
            if pair0 == r1 {
                triple = r2;
                pair0 = 0;
            } else {
                pair0 = r2;
            }
        }
        if r3 == r2 {
            if triple == r2 {
                pair0 = r3;
                pair1 = r3;
            } else if pair0 == r2 {
                triple = r3;
                pair0 = 0;
            } else if pair0 == r1 {
                pair1 = r3;
            } else {
                pair0 = r3;
            }
        }
        if r4 == r3 {
            if triple == r3 {
                pair0 = r4;
                pair1 = r4;
            } else if pair1 == r3 {
                triple = r4;
                pair1 = 0;
            } else if pair0 == r3 {
                triple = r4;
                pair0 = 0;
            } else if pair0 == r2 || pair0 == r1 || triple == r2 {
                pair1 = r4;
            } else {
                pair0 = r4;
            }
        }
    }

    let quads = pair0 > 0 && pair0 == pair1;
    let full_house = !quads && triple > 0 && (pair0 > 0 || pair1 > 0);

    let mut value: HandValue = 0;
    if straight && flush {
        value |= STRAIGHT_FLUSH_BIT;
    }
    if wheel && flush {
        value |= WHEEL_FLUSH_BIT;
    }
    if quads {
        value |= QUADS_BIT;
    }
    if full_house {
        value |= FULL_HOUSE_BIT;
    }
    if flush {
        value |= FLUSH_BIT;
    }
    if straight {
        value |= STRAIGHT_BIT;
    }
    if wheel {
        value |= WHEEL_BIT;
    }
    value |= triple << 28;
    value |= pair1 << 24;
    value |= pair0 << 20;
    for (i, &rank) in r.iter().enumerate() {
        value |= u64::from(rank) << (4 * i);
    }
    value
}

/// Best five-card score over two hole cards plus whatever community cards
/// have been revealed. Returns 0 until five cards are available.
pub fn best_hand(hole: [Card; HOLE_CARDS], community: &[Card]) -> HandValue {
    let mut cards = [Card(0); HOLE_CARDS + COMMUNITY_CARDS];
    cards[..HOLE_CARDS].copy_from_slice(&hole);
    cards[HOLE_CARDS..HOLE_CARDS + community.len()].copy_from_slice(community);
    let n = HOLE_CARDS + community.len();
    if n < 5 {
        return 0;
    }

    let mut best = 0;
    for a in 0..n - 4 {
        for b in a + 1..n - 3 {
            for c in b + 1..n - 2 {
                for d in c + 1..n - 1 {
                    for e in d + 1..n {
                        let hand = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        best = best.max(evaluate_hand(hand));
                    }
                }
            }
        }
    }
    best
}

/// Human-readable class of a scored hand, e.g. `Full House (10/3)`.
pub fn hand_label(value: HandValue) -> String {
    const GLYPHS: [&str; 13] = [
        "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
    ];
    let nibble = |shift: u32| ((value >> shift) & 0xf) as usize;
    let glyph = |shift: u32| *GLYPHS.get(nibble(shift).wrapping_sub(2)).unwrap_or(&"?");

    if value & STRAIGHT_FLUSH_BIT != 0 {
        if nibble(16) == 14 {
            "Royal Flush".to_string()
        } else {
            "Straight Flush".to_string()
        }
    } else if value & WHEEL_FLUSH_BIT != 0 {
        "Straight Flush (Wheel)".to_string()
    } else if value & QUADS_BIT != 0 {
        format!("Four of a Kind ({})", glyph(20))
    } else if value & FULL_HOUSE_BIT != 0 {
        let pair_shift = if nibble(20) > 0 { 20 } else { 24 };
        format!("Full House ({}/{})", glyph(28), glyph(pair_shift))
    } else if value & FLUSH_BIT != 0 {
        "Flush".to_string()
    } else if value & STRAIGHT_BIT != 0 {
        "Straight".to_string()
    } else if value & WHEEL_BIT != 0 {
        "Straight (Wheel)".to_string()
    } else if nibble(28) > 0 {
        format!("Three of a Kind ({})", glyph(28))
    } else if nibble(24) > 0 {
        format!("Two Pairs ({}/{})", glyph(24), glyph(20))
    } else if nibble(20) > 0 {
        format!("Pair ({})", glyph(20))
    } else {
        format!("High Card ({})", glyph(16))
    }
}
