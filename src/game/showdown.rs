//! Showdown ranking and pot distribution.

use log::debug;

use super::constants::SEATS;
use super::entities::Chips;
use super::eval::HandValue;

/// Dense competitive ranks from per-seat hand values: rank 0 is the best
/// hand, ties share a rank, and every distinct value below bumps the rank by
/// exactly one. Seats out of the hand carry value 0 and land in the worst
/// rank together.
pub fn rank_players(values: &[HandValue; SEATS]) -> [usize; SEATS] {
    let mut sorted = *values;
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut ranks = [0; SEATS];
    for (seat, &value) in values.iter().enumerate() {
        let mut rank = 0;
        let mut previous = sorted[0];
        for &candidate in &sorted {
            if candidate != previous {
                rank += 1;
                previous = candidate;
            }
            if candidate == value {
                break;
            }
        }
        ranks[seat] = rank;
    }
    ranks
}

/// Splits the pot among the ranked seats, honoring side pots.
///
/// Ranks are taken best first. Within a rank, each seat can win at most what
/// it covered: the sum over all seats of `min(their contribution, its own)`.
/// That winnable amount splits evenly across the rank; odd chips and any
/// slice the shorter stacks could not cover go to the rank's largest
/// contributor, the seat furthest from the dealer on ties. Whatever a rank
/// leaves unclaimed falls through to the next rank.
///
/// The returned winnings always sum to the total contributions.
pub fn divide_pot(contributions: &[Chips; SEATS], ranks: &[usize; SEATS]) -> [Chips; SEATS] {
    let mut winnings = [0u64; SEATS];
    let mut remaining: u64 = contributions.iter().map(|&c| u64::from(c)).sum();

    for rank in 0..SEATS {
        if remaining == 0 {
            break;
        }
        let mut at_rank: Vec<usize> = (0..SEATS).filter(|&s| ranks[s] == rank).collect();
        if at_rank.is_empty() {
            continue;
        }
        // Stable sort, so contribution ties keep seat order and the last
        // element is the highest-indexed largest contributor.
        at_rank.sort_by_key(|&s| contributions[s]);
        let Some(&tallest) = at_rank.last() else {
            continue;
        };

        // Chips this rank can reach at all, bounded by its largest stake.
        let cap = u64::from(contributions[tallest]);
        let mut rank_pot: u64 = contributions
            .iter()
            .map(|&c| u64::from(c).min(cap))
            .sum::<u64>()
            .min(remaining);
        remaining -= rank_pot;

        let shares = at_rank.len() as u64;
        for &seat in &at_rank {
            let own = u64::from(contributions[seat]);
            let winnable: u64 = contributions.iter().map(|&c| u64::from(c).min(own)).sum();
            let share = (winnable / shares).min(rank_pot);
            rank_pot -= share;
            winnings[seat] += share;
        }
        // Remainder chips stay with the deepest stake.
        winnings[tallest] += rank_pot;
        debug!("rank {rank} paid across seats {at_rank:?}");
    }

    winnings.map(|w| w.min(u64::from(Chips::MAX)) as Chips)
}
