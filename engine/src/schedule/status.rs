// ExecutionStatus - outcome of the most recent release execution

use serde::{Deserialize, Serialize};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Outcome of the most recent release/recovery execution.
/// Consulted by the recovery path: only a `Failed` status can be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// No release has executed yet.
    #[default]
    Absent,
    /// The last release completed and persisted its state.
    Success,
    /// The last release failed after acquiring the lock.
    Failed,
}

impl ExecutionStatus {
    /// Get the ID for serialization
    pub fn id(&self) -> u8 {
        match self {
            ExecutionStatus::Absent => 0,
            ExecutionStatus::Success => 1,
            ExecutionStatus::Failed => 2,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionStatus::Failed)
    }
}

impl Serializer for ExecutionStatus {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let tag = reader.read_u8()?;
        match tag {
            0 => Ok(ExecutionStatus::Absent),
            1 => Ok(ExecutionStatus::Success),
            2 => Ok(ExecutionStatus::Failed),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.id());
    }

    fn size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_absent() {
        assert_eq!(ExecutionStatus::default(), ExecutionStatus::Absent);
        assert!(!ExecutionStatus::default().is_failed());
    }

    #[test]
    fn test_serialization() {
        for status in [
            ExecutionStatus::Absent,
            ExecutionStatus::Success,
            ExecutionStatus::Failed,
        ] {
            let decoded = ExecutionStatus::from_bytes(&status.to_bytes()).unwrap();
            assert_eq!(status, decoded);
        }
        assert!(ExecutionStatus::from_bytes(&[3]).is_err());
    }
}
