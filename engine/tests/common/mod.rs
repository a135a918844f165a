// Shared test fixtures: in-memory host providers
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use anyhow::bail;
use async_trait::async_trait;

use autovest_engine::{
    account::AccountId,
    context::CallContext,
    contract::VestingContract,
    provider::{CallHandle, DeferredCallProvider, Slot, StorageProvider, TokenProvider},
    time::Period,
};

pub fn owner() -> AccountId {
    AccountId::from(&b"owner-account"[..])
}

pub fn investor() -> AccountId {
    AccountId::from(&b"investor-account"[..])
}

pub fn beneficiary() -> AccountId {
    AccountId::from(&b"beneficiary-account"[..])
}

pub fn contract_account() -> AccountId {
    AccountId::from(&b"vesting-contract"[..])
}

pub fn token_account() -> AccountId {
    AccountId::from(&b"token-contract"[..])
}

pub fn stranger() -> AccountId {
    AccountId::from(&b"stranger-account"[..])
}

pub fn ctx(caller: AccountId, current_period: Period) -> CallContext {
    CallContext::new(caller, contract_account(), current_period)
}

// ── Storage ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<Vec<u8>, Vec<u8>>,
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn set(&mut self, key: &[u8], value: Vec<u8>) -> anyhow::Result<()> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    async fn has(&self, key: &[u8]) -> anyhow::Result<bool> {
        Ok(self.entries.contains_key(key))
    }
}

// ── Token ───────────────────────────────────────────────────────────────

/// In-memory fungible-token ledger. `transfer` spends from the vesting
/// contract's account, like the real token contract would when called by it.
pub struct MockToken {
    contract: AccountId,
    balances: HashMap<(AccountId, AccountId), u64>,
    allowances: HashMap<(AccountId, AccountId, AccountId), u64>,
    /// When set, `transfer` fails outright (the token contract reverts).
    pub fail_transfers: bool,
    /// When set, `transfer` debits the sender but never credits the
    /// recipient: a buggy token that the balance postcondition must catch.
    pub swallow_transfers: bool,
}

impl MockToken {
    pub fn new(contract: AccountId) -> Self {
        MockToken {
            contract,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            fail_transfers: false,
            swallow_transfers: false,
        }
    }

    pub fn mint(&mut self, token: &AccountId, account: &AccountId, amount: u64) {
        *self
            .balances
            .entry((token.clone(), account.clone()))
            .or_insert(0) += amount;
    }

    pub fn approve(&mut self, token: &AccountId, owner: &AccountId, spender: &AccountId, amount: u64) {
        self.allowances
            .insert((token.clone(), owner.clone(), spender.clone()), amount);
    }

    pub fn balance(&self, token: &AccountId, account: &AccountId) -> u64 {
        self.balances
            .get(&(token.clone(), account.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn debit(&mut self, token: &AccountId, account: &AccountId, amount: u64) -> anyhow::Result<()> {
        let balance = self
            .balances
            .entry((token.clone(), account.clone()))
            .or_insert(0);
        if *balance < amount {
            bail!("insufficient balance of {account}: {balance} < {amount}");
        }
        *balance -= amount;
        Ok(())
    }
}

#[async_trait]
impl TokenProvider for MockToken {
    async fn allowance(
        &self,
        token: &AccountId,
        owner: &AccountId,
        spender: &AccountId,
    ) -> anyhow::Result<u64> {
        Ok(self
            .allowances
            .get(&(token.clone(), owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0))
    }

    async fn transfer_from(
        &mut self,
        token: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> anyhow::Result<()> {
        let key = (token.clone(), from.clone(), self.contract.clone());
        let allowance = self.allowances.get(&key).copied().unwrap_or(0);
        if allowance < amount {
            bail!("allowance exceeded: {allowance} < {amount}");
        }
        self.debit(token, from, amount)?;
        self.allowances.insert(key, allowance - amount);
        self.mint(token, to, amount);
        Ok(())
    }

    async fn transfer(
        &mut self,
        token: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> anyhow::Result<()> {
        if self.fail_transfers {
            bail!("token contract rejected the transfer");
        }
        let contract = self.contract.clone();
        self.debit(token, &contract, amount)?;
        if !self.swallow_transfers {
            self.mint(token, to, amount);
        }
        Ok(())
    }

    async fn balance_of(&self, token: &AccountId, account: &AccountId) -> anyhow::Result<u64> {
        Ok(self.balance(token, account))
    }
}

// ── Scheduler ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RegisteredCall {
    pub handle: CallHandle,
    pub target: AccountId,
    pub entrypoint: String,
    pub slot: Slot,
    pub gas_budget: u64,
    pub payload: Vec<u8>,
    pub coin_budget: u64,
}

/// Deferred-call scheduler that books the cheapest slot at the window start
/// and keeps a log of every registration.
#[derive(Default)]
pub struct MockScheduler {
    next_id: u64,
    pub registered: Vec<RegisteredCall>,
    pub live: HashSet<CallHandle>,
}

impl MockScheduler {
    /// Simulate the scheduler delivering a call: the handle stops existing.
    pub fn fire(&mut self, handle: &CallHandle) -> bool {
        self.live.remove(handle)
    }

    pub fn last_registered(&self) -> &RegisteredCall {
        self.registered.last().expect("no registration recorded")
    }
}

#[async_trait]
impl DeferredCallProvider for MockScheduler {
    async fn find_cheapest_slot(
        &self,
        earliest: Period,
        _latest: Period,
        _gas_budget: u64,
        _payload_size: usize,
    ) -> anyhow::Result<Slot> {
        Ok(Slot::new(earliest, 0))
    }

    async fn quote(
        &self,
        _slot: Slot,
        gas_budget: u64,
        payload_size: usize,
    ) -> anyhow::Result<u64> {
        Ok(gas_budget / 1_000 + payload_size as u64)
    }

    async fn register(
        &mut self,
        target: &AccountId,
        entrypoint: &str,
        slot: Slot,
        gas_budget: u64,
        payload: Vec<u8>,
        coin_budget: u64,
    ) -> anyhow::Result<CallHandle> {
        self.next_id += 1;
        let handle = CallHandle::new(format!("call-{}", self.next_id));
        self.live.insert(handle.clone());
        self.registered.push(RegisteredCall {
            handle: handle.clone(),
            target: target.clone(),
            entrypoint: entrypoint.to_string(),
            slot,
            gas_budget,
            payload,
            coin_budget,
        });
        Ok(handle)
    }

    async fn cancel(&mut self, handle: &CallHandle) -> anyhow::Result<()> {
        if !self.live.remove(handle) {
            bail!("unknown deferred call: {handle}");
        }
        Ok(())
    }

    async fn exists(&self, handle: &CallHandle) -> anyhow::Result<bool> {
        Ok(self.live.contains(handle))
    }
}

// ── Assembly ────────────────────────────────────────────────────────────

pub type TestContract = VestingContract<MemoryStorage, MockToken, MockScheduler>;

/// Initialized contract with `total` tokens minted to the investor and
/// approved for the contract to pull.
pub async fn deployed(total: u64) -> TestContract {
    let mut token = MockToken::new(contract_account());
    token.mint(&token_account(), &investor(), total);
    token.approve(&token_account(), &investor(), &contract_account(), total);

    let mut contract =
        VestingContract::new(MemoryStorage::default(), token, MockScheduler::default());
    contract.initialize(owner()).await.unwrap();
    contract
}

/// Deployed contract with the reference schedule already created at period
/// 0: total 1000, lock 5, interval 10, percentage 25.
pub async fn with_reference_schedule() -> TestContract {
    let mut contract = deployed(1000).await;
    contract
        .create_vesting_schedule(&ctx(investor(), 0), beneficiary(), token_account(), 1000, 5, 10, 25)
        .await
        .unwrap();
    contract
}
