// Vesting contract state machine
//
// Every entry point runs to completion as one unit of work: it loads the
// persisted state through the storage provider, transitions it, and writes
// it back. The deferred-call provider re-arms the next self-invocation on
// each successful release, so the schedule drives itself to completion
// without external polling.

pub mod access;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    config::{
        CONTRACT_CONTROL_KEY, MAX_RELEASE_PERCENTAGE, RELEASE_COIN_BUDGET, RELEASE_ENTRYPOINT,
        RELEASE_GAS_BUDGET, SLOT_SEARCH_WINDOW, VESTING_RECORD_KEY,
    },
    context::CallContext,
    error::VestingError,
    provider::{CallHandle, DeferredCallProvider, StorageProvider, TokenProvider},
    schedule::{calculator, ContractControlState, ExecutionStatus, VestingRecord},
    serializer::Serializer,
    time::Period,
};

/// Outcome of a release attempt.
///
/// Skips are defined idle transitions, not errors: the self-invocation is
/// delivered at-least-once and may race other integrations, so a stale or
/// early call must leave the record untouched and return quietly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Skipped(SkipReason),
    Released { amount: u64, completed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No vesting schedule exists yet.
    NoSchedule,
    /// The call cited a beneficiary other than the stored one.
    BeneficiaryMismatch,
    /// The current period is before the next release period.
    NotDue,
    /// The contract is paused.
    Paused,
    /// Everything has been claimed already.
    Completed,
}

/// Owner and pause flag, as exposed by `get_contract_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub owner: AccountId,
    pub paused: bool,
}

/// The vesting contract instance, generic over its host providers.
pub struct VestingContract<S, T, D> {
    storage: S,
    token: T,
    deferred: D,
}

impl<S, T, D> VestingContract<S, T, D>
where
    S: StorageProvider + Send + Sync,
    T: TokenProvider + Send + Sync,
    D: DeferredCallProvider + Send + Sync,
{
    pub fn new(storage: S, token: T, deferred: D) -> Self {
        VestingContract {
            storage,
            token,
            deferred,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn deferred(&self) -> &D {
        &self.deferred
    }

    pub fn deferred_mut(&mut self) -> &mut D {
        &mut self.deferred
    }

    // ── Persisted state access ──────────────────────────────────────────

    async fn load_control(&self) -> Result<ContractControlState, VestingError> {
        let bytes = self
            .storage
            .get(CONTRACT_CONTROL_KEY)
            .await?
            .ok_or(VestingError::NotInitialized)?;
        Ok(ContractControlState::from_bytes(&bytes)?)
    }

    async fn store_control(&mut self, control: &ContractControlState) -> Result<(), VestingError> {
        self.storage
            .set(CONTRACT_CONTROL_KEY, control.to_bytes())
            .await?;
        Ok(())
    }

    async fn load_record(&self) -> Result<Option<VestingRecord>, VestingError> {
        match self.storage.get(VESTING_RECORD_KEY).await? {
            Some(bytes) => Ok(Some(VestingRecord::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn require_record(&self) -> Result<VestingRecord, VestingError> {
        self.load_record()
            .await?
            .ok_or(VestingError::NoScheduleFound)
    }

    async fn store_record(&mut self, record: &VestingRecord) -> Result<(), VestingError> {
        self.storage
            .set(VESTING_RECORD_KEY, record.to_bytes())
            .await?;
        Ok(())
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Deployment bootstrap: write the initial control state with the
    /// deployer as owner.
    pub async fn initialize(&mut self, owner: AccountId) -> Result<(), VestingError> {
        if self.storage.has(CONTRACT_CONTROL_KEY).await? {
            return Err(VestingError::AlreadyInitialized);
        }
        let control = ContractControlState::new(owner);
        self.store_control(&control).await?;
        info!("contract initialized, owner {}", control.owner);
        Ok(())
    }

    /// Create the vesting schedule: pull the funds from the caller and arm
    /// the first self-invocation after the lock period.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_vesting_schedule(
        &mut self,
        ctx: &CallContext,
        beneficiary: AccountId,
        token: AccountId,
        total_amount: u64,
        lock_period: u64,
        release_interval: u64,
        release_percentage: u64,
    ) -> Result<(), VestingError> {
        let mut control = self.load_control().await?;
        if control.paused {
            return Err(VestingError::Paused);
        }
        if total_amount == 0 {
            return Err(VestingError::InvalidTotalAmount);
        }
        if release_percentage == 0 || release_percentage > MAX_RELEASE_PERCENTAGE {
            return Err(VestingError::InvalidReleasePercentage(release_percentage));
        }
        if release_interval == 0 {
            return Err(VestingError::InvalidReleaseInterval);
        }
        // A per-interval amount that truncates to zero would re-arm forever
        // without ever moving a token
        if (total_amount as u128 * release_percentage as u128) / 100 == 0 {
            return Err(VestingError::ReleaseTooSmall {
                total: total_amount,
                percentage: release_percentage,
            });
        }
        if self.load_record().await?.is_some() {
            return Err(VestingError::ScheduleAlreadyExists);
        }

        let have = self
            .token
            .allowance(&token, &ctx.caller, &ctx.contract)
            .await?;
        if have < total_amount {
            return Err(VestingError::InsufficientAllowance {
                need: total_amount,
                have,
            });
        }

        let balance_before = self.token.balance_of(&token, &ctx.contract).await?;
        self.token
            .transfer_from(&token, &ctx.caller, &ctx.contract, total_amount)
            .await?;
        let balance_after = self.token.balance_of(&token, &ctx.contract).await?;
        let expected = balance_before.saturating_add(total_amount);
        if balance_after != expected {
            return Err(VestingError::TransferFailed {
                expected,
                actual: balance_after,
            });
        }
        info!("locked {} tokens for vesting to {}", total_amount, beneficiary);

        let start_period = ctx.current_period.saturating_add(lock_period);
        let mut record = VestingRecord {
            beneficiary,
            token,
            total_amount,
            amount_claimed: 0,
            lock_period,
            release_interval,
            release_percentage,
            next_release_period: start_period,
        };
        let handle = self
            .register_release_call(&ctx.contract, &mut record, start_period)
            .await?;
        control.pending_call_handle = Some(handle);

        self.store_record(&record).await?;
        self.store_control(&control).await?;
        Ok(())
    }

    /// Self-triggered release of one interval's amount.
    ///
    /// The scheduler invokes this at the registered slot; anyone else may
    /// call it too, which is why every precondition short-circuits into a
    /// silent skip instead of an error.
    pub async fn release_vested_tokens(
        &mut self,
        ctx: &CallContext,
        provided_beneficiary: &AccountId,
    ) -> Result<ReleaseOutcome, VestingError> {
        let control = self.load_control().await?;
        let Some(record) = self.load_record().await? else {
            debug!("release skipped: no vesting schedule");
            return Ok(ReleaseOutcome::Skipped(SkipReason::NoSchedule));
        };
        if !access::matches_beneficiary(provided_beneficiary, &record) {
            debug!("release skipped: beneficiary mismatch");
            return Ok(ReleaseOutcome::Skipped(SkipReason::BeneficiaryMismatch));
        }
        if control.paused {
            debug!("release skipped: contract is paused");
            return Ok(ReleaseOutcome::Skipped(SkipReason::Paused));
        }
        if record.is_complete() {
            debug!("release skipped: schedule already completed");
            return Ok(ReleaseOutcome::Skipped(SkipReason::Completed));
        }
        if ctx.current_period < record.next_release_period {
            debug!(
                "release skipped: period {} is before {}",
                ctx.current_period, record.next_release_period
            );
            return Ok(ReleaseOutcome::Skipped(SkipReason::NotDue));
        }

        self.run_locked_release(ctx, record, control).await
    }

    /// Re-run a failed release. Only callable by the owner or the
    /// beneficiary, and only while a failure is recorded.
    pub async fn recover_failed_release(
        &mut self,
        ctx: &CallContext,
    ) -> Result<ReleaseOutcome, VestingError> {
        let control = self.load_control().await?;
        let record = self.require_record().await?;
        access::require_beneficiary_or_owner(&ctx.caller, &control, &record)?;
        if control.paused {
            return Err(VestingError::Paused);
        }
        if !control.last_execution_status.is_failed() {
            return Err(VestingError::NoFailureRecorded);
        }
        if ctx.current_period < record.next_release_period {
            return Err(VestingError::ReleaseNotDue {
                current: ctx.current_period,
                due: record.next_release_period,
            });
        }

        info!(
            "recovering release that failed at period {:?}",
            control.last_failed_period
        );
        self.run_locked_release(ctx, record, control).await
    }

    /// Pause the schedule. Idempotent; cancels the pending self-invocation
    /// so no release fires while paused.
    pub async fn pause(&mut self, ctx: &CallContext) -> Result<(), VestingError> {
        let mut control = self.load_control().await?;
        access::require_owner(&ctx.caller, &control)?;
        if control.paused {
            debug!("pause: already paused");
            return Ok(());
        }
        self.cancel_pending_call(&mut control).await?;
        control.paused = true;
        self.store_control(&control).await?;
        info!("vesting paused");
        Ok(())
    }

    /// Resume a paused schedule, re-arming one self-invocation at the
    /// nearest eligible slot.
    pub async fn resume(&mut self, ctx: &CallContext) -> Result<(), VestingError> {
        let mut control = self.load_control().await?;
        access::require_owner(&ctx.caller, &control)?;
        if !control.paused {
            return Err(VestingError::NotPaused);
        }
        control.paused = false;

        if let Some(mut record) = self.load_record().await? {
            if !record.is_complete() {
                let earliest = record.next_release_period.max(ctx.current_period);
                let handle = self
                    .register_release_call(&ctx.contract, &mut record, earliest)
                    .await?;
                control.pending_call_handle = Some(handle);
                self.store_record(&record).await?;
            }
        }
        self.store_control(&control).await?;
        info!("vesting resumed");
        Ok(())
    }

    /// Cancel the pending self-invocation for good. The record remains
    /// queryable; no further release happens automatically.
    pub async fn stop(&mut self, ctx: &CallContext) -> Result<(), VestingError> {
        let mut control = self.load_control().await?;
        access::require_owner(&ctx.caller, &control)?;
        self.cancel_pending_call(&mut control).await?;
        self.store_control(&control).await?;
        info!("vesting stopped, no further automatic releases");
        Ok(())
    }

    pub async fn transfer_ownership(
        &mut self,
        ctx: &CallContext,
        new_owner: AccountId,
    ) -> Result<(), VestingError> {
        let mut control = self.load_control().await?;
        access::require_owner(&ctx.caller, &control)?;
        info!("ownership transferred from {} to {}", control.owner, new_owner);
        control.owner = new_owner;
        self.store_control(&control).await?;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub async fn get_schedule(&self) -> Result<VestingRecord, VestingError> {
        self.require_record().await
    }

    pub async fn get_amount_claimed(&self) -> Result<u64, VestingError> {
        Ok(self.require_record().await?.amount_claimed)
    }

    pub async fn get_remaining_locked(&self) -> Result<u64, VestingError> {
        Ok(self.require_record().await?.remaining())
    }

    /// Last execution status and, when failed, the period it failed at.
    pub async fn get_execution_status(
        &self,
    ) -> Result<(ExecutionStatus, Option<Period>), VestingError> {
        let control = self.load_control().await?;
        Ok((control.last_execution_status, control.last_failed_period))
    }

    pub async fn get_contract_info(&self) -> Result<ContractInfo, VestingError> {
        let control = self.load_control().await?;
        Ok(ContractInfo {
            owner: control.owner,
            paused: control.paused,
        })
    }

    pub async fn get_pending_call_handle(&self) -> Result<Option<CallHandle>, VestingError> {
        Ok(self.load_control().await?.pending_call_handle)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Locked section shared by release and recovery.
    ///
    /// Acquires the lock and persists it BEFORE any external token call,
    /// then clears it on every exit path. On failure the record is not
    /// persisted; only the failure markers and the cleared lock are, so
    /// recovery has durable state to act on while the schedule itself
    /// stays exactly as it was.
    async fn run_locked_release(
        &mut self,
        ctx: &CallContext,
        mut record: VestingRecord,
        mut control: ContractControlState,
    ) -> Result<ReleaseOutcome, VestingError> {
        control.acquire_release_lock()?;
        self.store_control(&control).await?;

        match self
            .execute_release(ctx, &mut record, &mut control)
            .await
        {
            Ok(outcome) => {
                control.mark_success();
                control.release_release_lock();
                self.store_record(&record).await?;
                self.store_control(&control).await?;
                Ok(outcome)
            }
            Err(err) => {
                control.release_release_lock();
                control.mark_failed(ctx.current_period);
                if let Err(store_err) = self.store_control(&control).await {
                    error!("failed to persist failure markers: {}", store_err);
                }
                warn!("release failed at period {}: {}", ctx.current_period, err);
                Err(err)
            }
        }
    }

    /// Transfer one interval's amount, verify it arrived, account for it,
    /// then either finish the schedule or arm the next self-invocation.
    async fn execute_release(
        &mut self,
        ctx: &CallContext,
        record: &mut VestingRecord,
        control: &mut ContractControlState,
    ) -> Result<ReleaseOutcome, VestingError> {
        let amount = calculator::release_amount(record);

        let balance_before = self
            .token
            .balance_of(&record.token, &record.beneficiary)
            .await?;
        self.token
            .transfer(&record.token, &record.beneficiary, amount)
            .await?;
        let balance_after = self
            .token
            .balance_of(&record.token, &record.beneficiary)
            .await?;
        let expected = balance_before.saturating_add(amount);
        if balance_after != expected {
            return Err(VestingError::TransferFailed {
                expected,
                actual: balance_after,
            });
        }

        record.amount_claimed = record.amount_claimed.saturating_add(amount);
        info!(
            "released {} tokens to {}, {} of {} claimed",
            amount, record.beneficiary, record.amount_claimed, record.total_amount
        );

        // The invocation that triggered us is spent; a manually triggered
        // release may still have one armed. Drop it either way so at most
        // one registration is ever live.
        self.cancel_pending_call(control).await?;

        if record.is_complete() {
            info!("vesting schedule completed");
            return Ok(ReleaseOutcome::Released {
                amount,
                completed: true,
            });
        }

        let next = calculator::next_period(ctx.current_period, record);
        let handle = self
            .register_release_call(&ctx.contract, record, next)
            .await?;
        control.pending_call_handle = Some(handle);
        Ok(ReleaseOutcome::Released {
            amount,
            completed: false,
        })
    }

    /// Find a slot in `[earliest, earliest + SLOT_SEARCH_WINDOW]`, consult
    /// its fee and register the next self-invocation with the beneficiary
    /// as payload. Sets `next_release_period` to the registered slot.
    async fn register_release_call(
        &mut self,
        contract: &AccountId,
        record: &mut VestingRecord,
        earliest: Period,
    ) -> Result<CallHandle, VestingError> {
        let payload = record.beneficiary.to_bytes();
        let latest = earliest.saturating_add(SLOT_SEARCH_WINDOW);
        let slot = self
            .deferred
            .find_cheapest_slot(earliest, latest, RELEASE_GAS_BUDGET, payload.len())
            .await?;
        let fee = self
            .deferred
            .quote(slot, RELEASE_GAS_BUDGET, payload.len())
            .await?;
        debug!(
            "next release slot: period {} thread {}, quoted fee {}",
            slot.period, slot.thread, fee
        );

        let handle = self
            .deferred
            .register(
                contract,
                RELEASE_ENTRYPOINT,
                slot,
                RELEASE_GAS_BUDGET,
                payload,
                RELEASE_COIN_BUDGET,
            )
            .await?;
        info!("deferred release registered: {}", handle);
        record.next_release_period = slot.period;
        Ok(handle)
    }

    /// Cancel the pending self-invocation if one is armed and still live.
    /// A handle that already executed no longer exists; that is not an
    /// error, the handle is simply dropped.
    async fn cancel_pending_call(
        &mut self,
        control: &mut ContractControlState,
    ) -> Result<(), VestingError> {
        if let Some(handle) = control.pending_call_handle.take() {
            if self.deferred.exists(&handle).await? {
                self.deferred.cancel(&handle).await?;
                info!("deferred call cancelled: {}", handle);
            } else {
                debug!("deferred call already gone: {}", handle);
            }
        }
        Ok(())
    }
}
