// Release-amount sizing and next-period computation
// Pure functions of their inputs, no side effects

use crate::time::Period;

use super::VestingRecord;

/// Amount to release for one interval: `floor(total * percentage / 100)`,
/// capped to the remaining locked quantity.
///
/// Truncation never over-releases, and the cap makes the final release zero
/// the remainder exactly even when the percentage does not divide the total.
pub fn release_amount(record: &VestingRecord) -> u64 {
    // 128-bit intermediate: the multiply cannot overflow
    let entitled =
        (record.total_amount as u128 * record.release_percentage as u128) / 100;
    entitled.min(record.remaining() as u128) as u64
}

/// Period at/after which the release following `current` becomes eligible.
pub fn next_period(current: Period, record: &VestingRecord) -> Period {
    current.saturating_add(record.release_interval)
}
