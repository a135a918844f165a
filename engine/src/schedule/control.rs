// ContractControlState - process-wide flags persisted alongside the record
// Carries the owner, the pause flag, the release lock and the bookkeeping
// consulted by failure recovery

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    error::VestingError,
    provider::CallHandle,
    serializer::{Reader, ReaderError, Serializer, Writer},
    time::Period,
};

use super::ExecutionStatus;

/// Control state of one contract instance, created at deployment and
/// persisted for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractControlState {
    /// Authorizes pause/resume/stop/ownership-transfer and recovery.
    pub owner: AccountId,
    /// While set, no release may execute.
    pub paused: bool,
    /// Held for the duration of one release/recovery.
    /// Must be durable before any external token call: a reentrant call
    /// through the token contract reads it back from storage.
    pub release_lock: bool,
    /// Outcome of the most recent release execution.
    pub last_execution_status: ExecutionStatus,
    /// Period at which the last failed execution ran.
    pub last_failed_period: Option<Period>,
    /// The currently-armed self-invocation, at most one at a time.
    pub pending_call_handle: Option<CallHandle>,
}

impl ContractControlState {
    pub fn new(owner: AccountId) -> Self {
        ContractControlState {
            owner,
            paused: false,
            release_lock: false,
            last_execution_status: ExecutionStatus::default(),
            last_failed_period: None,
            pending_call_handle: None,
        }
    }

    /// Take the release lock, refusing when it is already held.
    pub fn acquire_release_lock(&mut self) -> Result<(), VestingError> {
        if self.release_lock {
            return Err(VestingError::ConcurrentRelease);
        }
        self.release_lock = true;
        trace!("release lock acquired");
        Ok(())
    }

    /// Clear the release lock. Idempotent: every exit path of a release
    /// calls this, including failure paths.
    pub fn release_release_lock(&mut self) {
        if self.release_lock {
            trace!("release lock cleared");
        }
        self.release_lock = false;
    }

    pub fn mark_success(&mut self) {
        self.last_execution_status = ExecutionStatus::Success;
        self.last_failed_period = None;
    }

    pub fn mark_failed(&mut self, period: Period) {
        self.last_execution_status = ExecutionStatus::Failed;
        self.last_failed_period = Some(period);
    }
}

impl Serializer for ContractControlState {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            owner: AccountId::read(reader)?,
            paused: bool::read(reader)?,
            release_lock: bool::read(reader)?,
            last_execution_status: ExecutionStatus::read(reader)?,
            last_failed_period: Option::read(reader)?,
            pending_call_handle: Option::read(reader)?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        self.owner.write(writer);
        self.paused.write(writer);
        self.release_lock.write(writer);
        self.last_execution_status.write(writer);
        self.last_failed_period.write(writer);
        self.pending_call_handle.write(writer);
    }

    fn size(&self) -> usize {
        self.owner.size()
            + self.paused.size()
            + self.release_lock.size()
            + self.last_execution_status.size()
            + self.last_failed_period.size()
            + self.pending_call_handle.size()
    }
}
