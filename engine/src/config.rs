// Constants for the vesting engine
// These values define the deferred-call registration parameters and the
// persisted storage layout

use crate::time::Period;

// ============================================================================
// Deferred-call registration
// ============================================================================

/// Width of the slot search window, in periods.
/// A slot is always searched in `[earliest, earliest + SLOT_SEARCH_WINDOW]`:
/// the lower bound guarantees eligibility, the window lets the scheduler pick
/// the cheapest lane inside it.
pub const SLOT_SEARCH_WINDOW: Period = 10;

/// Gas budget reserved for one self-triggered release execution.
/// Used both for the cheapest-slot search and the registration itself so the
/// searched slot is always valid for the registered call.
pub const RELEASE_GAS_BUDGET: u64 = 2_200_000;

/// Coin budget attached to a deferred-call registration.
/// Covers the scheduler fee quoted for the chosen slot.
pub const RELEASE_COIN_BUDGET: u64 = 2_000_000_000;

/// Entry point the scheduler invokes on this contract at the registered slot.
pub const RELEASE_ENTRYPOINT: &str = "release_vested_tokens";

// ============================================================================
// Validation bounds
// ============================================================================

/// Upper bound (inclusive) for the release percentage.
pub const MAX_RELEASE_PERCENTAGE: u64 = 100;

// ============================================================================
// Storage layout
// ============================================================================

/// Key of the serialized vesting record.
pub const VESTING_RECORD_KEY: &[u8] = b"vesting_info";

/// Key of the serialized contract control state.
pub const CONTRACT_CONTROL_KEY: &[u8] = b"contract_control";
