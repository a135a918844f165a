// Vesting schedule state
// The record is the sole persisted aggregate of a contract instance, created
// once and mutated only by release/recovery

pub mod calculator;
mod control;
mod status;

pub use control::ContractControlState;
pub use status::ExecutionStatus;

use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    serializer::{Reader, ReaderError, Serializer, Writer},
    time::Period,
};

/// The persisted vesting schedule.
///
/// `amount_claimed` only ever grows and never exceeds `total_amount`; the
/// schedule is complete exactly when the two are equal. `next_release_period`
/// is non-decreasing while the schedule is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingRecord {
    /// Recipient of every release.
    pub beneficiary: AccountId,
    /// The fungible asset being vested.
    pub token: AccountId,
    /// Total quantity locked at creation, fixed afterwards.
    pub total_amount: u64,
    /// Quantity already released to the beneficiary.
    pub amount_claimed: u64,
    /// Periods to wait before the first release is eligible.
    pub lock_period: u64,
    /// Periods between successive releases.
    pub release_interval: u64,
    /// Fraction of `total_amount` released per interval, in (0, 100].
    pub release_percentage: u64,
    /// Absolute period at/after which the next release may execute.
    pub next_release_period: Period,
}

impl VestingRecord {
    /// Quantity still locked in the contract.
    pub fn remaining(&self) -> u64 {
        self.total_amount.saturating_sub(self.amount_claimed)
    }

    pub fn is_complete(&self) -> bool {
        self.amount_claimed >= self.total_amount
    }
}

impl Serializer for VestingRecord {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            beneficiary: AccountId::read(reader)?,
            token: AccountId::read(reader)?,
            total_amount: u64::read(reader)?,
            amount_claimed: u64::read(reader)?,
            lock_period: u64::read(reader)?,
            release_interval: u64::read(reader)?,
            release_percentage: u64::read(reader)?,
            next_release_period: Period::read(reader)?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        self.beneficiary.write(writer);
        self.token.write(writer);
        self.total_amount.write(writer);
        self.amount_claimed.write(writer);
        self.lock_period.write(writer);
        self.release_interval.write(writer);
        self.release_percentage.write(writer);
        self.next_release_period.write(writer);
    }

    fn size(&self) -> usize {
        self.beneficiary.size()
            + self.token.size()
            + self.total_amount.size()
            + self.amount_claimed.size()
            + self.lock_period.size()
            + self.release_interval.size()
            + self.release_percentage.size()
            + self.next_release_period.size()
    }
}
