//! Fair-share distribution of a shared capacity.
//!
//! Members of a shift-sharing group compete for the same usable days. The
//! capacity is split by iterative water-filling: every round gives each
//! still-hungry member an equal share, members whose demand is met drop out,
//! and what they did not need is redistributed in the next round.
//!
//! Even shares are whole multiples of [`ALLOCATION_UNIT`], but each member's
//! demand is an exact ceiling: a member who needs 4.555 days and has room for
//! them gets 4.555. When the capacity left over is smaller than one unit per
//! hungry member, it is handed out one unit at a time in ascending member-id
//! order, so results never depend on input order.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The smallest amount of capacity handed to one member (0.01 day).
pub const ALLOCATION_UNIT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One member's claim on the shared capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairShareClaim {
    /// The claiming member.
    pub member_id: String,
    /// The most the member can use. Negative demands count as zero.
    pub demand: Decimal,
}

/// The outcome of a water-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairShareAllocation {
    /// Allocation per claim, in the same order as the input claims.
    pub allocations: Vec<Decimal>,
    /// Capacity left unclaimed.
    pub remainder: Decimal,
    /// Number of even-share rounds performed.
    pub rounds: u32,
}

/// Rounds down to a whole number of allocation units.
pub fn floor_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Distributes `capacity` across `claims` by water-filling.
///
/// Guarantees:
/// - no member receives more than their (non-negative) demand;
/// - the allocations never sum to more than `capacity`;
/// - capacity is only left over when every demand is met.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::{FairShareClaim, water_fill};
/// use rust_decimal::Decimal;
///
/// let claims = vec![
///     FairShareClaim { member_id: "a".to_string(), demand: Decimal::from(2) },
///     FairShareClaim { member_id: "b".to_string(), demand: Decimal::from(20) },
///     FairShareClaim { member_id: "c".to_string(), demand: Decimal::from(20) },
/// ];
///
/// // 12 days: "a" needs only 2, the other 10 are split between "b" and "c"
/// let result = water_fill(Decimal::from(12), &claims);
/// assert_eq!(result.allocations, vec![Decimal::from(2), Decimal::from(5), Decimal::from(5)]);
/// assert_eq!(result.remainder, Decimal::ZERO);
/// ```
pub fn water_fill(capacity: Decimal, claims: &[FairShareClaim]) -> FairShareAllocation {
    let demands: Vec<Decimal> = claims.iter().map(|c| c.demand.max(Decimal::ZERO)).collect();
    let mut allocations = vec![Decimal::ZERO; claims.len()];
    let mut available = capacity.max(Decimal::ZERO);
    let mut rounds = 0;

    let mut order: Vec<usize> = (0..claims.len()).collect();
    order.sort_by(|a, b| claims[*a].member_id.cmp(&claims[*b].member_id));

    let hungry = |allocations: &[Decimal]| -> Vec<usize> {
        order
            .iter()
            .copied()
            .filter(|i| allocations[*i] < demands[*i])
            .collect()
    };

    // Each even-share round either satisfies a member or leaves less than one
    // unit per hungry member, so n + 1 rounds always suffice.
    let max_rounds = claims.len() as u32 + 1;
    while rounds < max_rounds {
        let waiting = hungry(&allocations);
        if waiting.is_empty() || available <= Decimal::ZERO {
            break;
        }

        let share = floor_to_unit(available / Decimal::from(waiting.len()));
        if share.is_zero() {
            break;
        }

        for i in waiting {
            let give = share.min(demands[i] - allocations[i]);
            allocations[i] += give;
            available -= give;
        }
        rounds += 1;
    }

    // Leftovers: at most one unit per member per pass, lowest IDs first. Every
    // pass either exhausts the capacity or satisfies a member.
    for _ in 0..claims.len() {
        let waiting = hungry(&allocations);
        if waiting.is_empty() || available <= Decimal::ZERO {
            break;
        }
        for i in waiting {
            if available <= Decimal::ZERO {
                break;
            }
            let give = ALLOCATION_UNIT
                .min(demands[i] - allocations[i])
                .min(available);
            allocations[i] += give;
            available -= give;
        }
    }

    FairShareAllocation {
        allocations,
        remainder: available,
        rounds,
    }
}
