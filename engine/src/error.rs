use thiserror::Error;

use crate::{serializer::ReaderError, time::Period};

#[derive(Debug, Error)]
pub enum VestingError {
    #[error("Contract control state is not initialized")]
    NotInitialized,

    #[error("Contract control state is already initialized")]
    AlreadyInitialized,

    #[error("Total amount must be greater than zero")]
    InvalidTotalAmount,

    #[error("Release percentage must be within (0, 100], got {0}")]
    InvalidReleasePercentage(u64),

    #[error("Release interval must be greater than zero")]
    InvalidReleaseInterval,

    #[error("{percentage}% of {total} truncates to zero, schedule could never progress")]
    ReleaseTooSmall { total: u64, percentage: u64 },

    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: u64, have: u64 },

    #[error("Token transfer verification failed: expected balance {expected}, found {actual}")]
    TransferFailed { expected: u64, actual: u64 },

    #[error("A release is already in progress")]
    ConcurrentRelease,

    #[error("Contract is paused")]
    Paused,

    #[error("Contract is not paused")]
    NotPaused,

    #[error("No vesting schedule found")]
    NoScheduleFound,

    #[error("A vesting schedule already exists")]
    ScheduleAlreadyExists,

    #[error("Release is not due: current period {current}, due at {due}")]
    ReleaseNotDue { current: Period, due: Period },

    #[error("No failed release recorded")]
    NoFailureRecorded,

    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}
