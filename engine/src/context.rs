use crate::{account::AccountId, time::Period};

/// Execution context of one entry-point call.
///
/// The host passes caller identity, the contract's own account and the
/// current scheduler period explicitly; the engine holds no ambient state
/// about "now" or "who".
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Account that signed/triggered this call.
    pub caller: AccountId,
    /// This contract instance's own account, receiver of pulled funds and
    /// target of self-invocations.
    pub contract: AccountId,
    /// Current period on the scheduler time axis.
    pub current_period: Period,
}

impl CallContext {
    pub fn new(caller: AccountId, contract: AccountId, current_period: Period) -> Self {
        CallContext {
            caller,
            contract,
            current_period,
        }
    }

    /// Same caller and contract, at a later period.
    pub fn at_period(&self, current_period: Period) -> Self {
        CallContext {
            caller: self.caller.clone(),
            contract: self.contract.clone(),
            current_period,
        }
    }
}
