use async_trait::async_trait;

use crate::account::AccountId;

/// Bridge to an external fungible-token contract.
///
/// Every call is all-or-nothing: a failed transfer leaves balances
/// unchanged. `transfer` spends from this contract's own account;
/// `transfer_from` spends a pre-approved allowance of `from`.
#[async_trait]
pub trait TokenProvider {
    async fn allowance(
        &self,
        token: &AccountId,
        owner: &AccountId,
        spender: &AccountId,
    ) -> anyhow::Result<u64>;

    async fn transfer_from(
        &mut self,
        token: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> anyhow::Result<()>;

    async fn transfer(&mut self, token: &AccountId, to: &AccountId, amount: u64)
        -> anyhow::Result<()>;

    async fn balance_of(&self, token: &AccountId, account: &AccountId) -> anyhow::Result<u64>;
}
