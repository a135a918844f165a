use async_trait::async_trait;

/// Raw keyed byte storage.
///
/// All writes issued during one entry point are expected to be applied
/// atomically by the host: either the whole unit of work persists or none
/// of it does.
#[async_trait]
pub trait StorageProvider {
    async fn get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;

    async fn set(&mut self, key: &[u8], value: Vec<u8>) -> anyhow::Result<()>;

    async fn has(&self, key: &[u8]) -> anyhow::Result<bool>;
}
