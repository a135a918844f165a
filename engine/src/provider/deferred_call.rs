use std::fmt::{Display, Error, Formatter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    account::AccountId,
    serializer::{Reader, ReaderError, Serializer, Writer},
    time::Period,
};

/// A concrete (period, execution lane) pair returned by the scheduler's
/// cheapest-slot search and used as the registration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub period: Period,
    pub thread: u8,
}

impl Slot {
    pub fn new(period: Period, thread: u8) -> Self {
        Slot { period, thread }
    }
}

/// Opaque handle to a registered deferred call.
/// The scheduler mints it on registration; the engine only stores it and
/// hands it back for cancel/exists queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallHandle(String);

impl CallHandle {
    pub fn new(id: impl Into<String>) -> Self {
        CallHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serializer for CallHandle {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(CallHandle(reader.read_string()?))
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_string(&self.0);
    }

    fn size(&self) -> usize {
        1 + self.0.len()
    }
}

impl Display for CallHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

/// Interface to the external deferred-execution scheduler.
///
/// `register` arranges a future call into `target`'s `entrypoint` at the
/// given slot; delivery is at-least-once and never before the slot's
/// period. The handle stays valid until the call executes or is cancelled.
#[async_trait]
pub trait DeferredCallProvider {
    /// Find the cheapest available slot in `[earliest, latest]` able to
    /// host a call with the given budget and payload size.
    async fn find_cheapest_slot(
        &self,
        earliest: Period,
        latest: Period,
        gas_budget: u64,
        payload_size: usize,
    ) -> anyhow::Result<Slot>;

    /// Quote the booking fee for a slot.
    async fn quote(&self, slot: Slot, gas_budget: u64, payload_size: usize)
        -> anyhow::Result<u64>;

    async fn register(
        &mut self,
        target: &AccountId,
        entrypoint: &str,
        slot: Slot,
        gas_budget: u64,
        payload: Vec<u8>,
        coin_budget: u64,
    ) -> anyhow::Result<CallHandle>;

    async fn cancel(&mut self, handle: &CallHandle) -> anyhow::Result<()>;

    async fn exists(&self, handle: &CallHandle) -> anyhow::Result<bool>;
}
