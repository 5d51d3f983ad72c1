use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, IntoStaticStr};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Validator bonding status, numeric values match the VM `uint8` encoding
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum BondStatus {
    #[default]
    #[strum(serialize = "BOND_STATUS_UNSPECIFIED")]
    Unspecified = 0,
    #[strum(serialize = "BOND_STATUS_UNBONDED")]
    Unbonded = 1,
    #[strum(serialize = "BOND_STATUS_UNBONDING")]
    Unbonding = 2,
    #[strum(serialize = "BOND_STATUS_BONDED")]
    Bonded = 3,
}

impl BondStatus {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Unbonded),
            2 => Some(Self::Unbonding),
            3 => Some(Self::Bonded),
            _ => None,
        }
    }

    /// Parse a status filter, the empty string selects every status
    pub fn parse_filter(value: &str) -> Result<Option<Self>, strum::ParseError> {
        if value.is_empty() {
            return Ok(None);
        }
        BondStatus::from_str(value).map(Some)
    }
}

impl Serializer for BondStatus {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.as_u8());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        BondStatus::from_u8(reader.read_u8()?).ok_or(ReaderError::InvalidValue)
    }

    fn size(&self) -> usize {
        1
    }
}
