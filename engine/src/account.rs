use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Maximum encoded length of an account identifier.
/// The binary layout prefixes the identifier with a single length byte.
pub const MAX_ACCOUNT_ID_SIZE: usize = u8::MAX as usize;

/// Opaque account identifier: the engine never interprets its contents,
/// it only routes it to the token and scheduler contracts.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Debug, Hash, Serialize, Deserialize)]
pub struct AccountId(#[serde(with = "hex")] Vec<u8>);

impl AccountId {
    pub fn new(bytes: Vec<u8>) -> Self {
        debug_assert!(!bytes.is_empty() && bytes.len() <= MAX_ACCOUNT_ID_SIZE);
        AccountId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&[u8]> for AccountId {
    fn from(bytes: &[u8]) -> Self {
        AccountId::new(bytes.to_vec())
    }
}

impl FromStr for AccountId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| "Invalid hex string")?;
        if bytes.is_empty() || bytes.len() > MAX_ACCOUNT_ID_SIZE {
            return Err("Invalid account id length");
        }
        Ok(AccountId(bytes))
    }
}

impl Serializer for AccountId {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let size = reader.read_u8()? as usize;
        if size == 0 {
            return Err(ReaderError::InvalidValue);
        }
        let bytes = reader.read_bytes(size)?;
        Ok(AccountId(bytes))
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.0.len() as u8);
        writer.write_bytes(&self.0);
    }

    fn size(&self) -> usize {
        1 + self.0.len()
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.to_hex())
    }
}
