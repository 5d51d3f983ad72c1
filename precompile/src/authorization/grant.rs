use bridge_common::{
    crypto::Address,
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use alloy_primitives::U256;

/// Permission for `grantee` to send `msg_type` messages on behalf of `granter`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    pub granter: Address,
    pub grantee: Address,
    pub msg_type: String,
    /// Remaining spendable amount, `None` for an unlimited grant
    pub limit: Option<U256>,
    /// Unix seconds, `None` never expires
    pub expiration: Option<i64>,
}

impl Grant {
    pub fn new(
        granter: Address,
        grantee: Address,
        msg_type: impl Into<String>,
        limit: Option<U256>,
        expiration: Option<i64>,
    ) -> Self {
        Self {
            granter,
            grantee,
            msg_type: msg_type.into(),
            limit,
            expiration,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit.is_none()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expiration.is_some_and(|expiration| expiration < now)
    }

    /// Spendable amount, `U256::MAX` for an unlimited grant
    pub fn spendable(&self) -> U256 {
        self.limit.unwrap_or(U256::MAX)
    }
}

impl Serializer for Grant {
    fn write(&self, writer: &mut Writer) {
        self.granter.write(writer);
        self.grantee.write(writer);
        self.msg_type.write(writer);
        self.limit.write(writer);
        self.expiration.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            granter: reader.read()?,
            grantee: reader.read()?,
            msg_type: reader.read()?,
            limit: reader.read()?,
            expiration: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        20 + 20 + self.msg_type.size() + self.limit.size() + self.expiration.size()
    }
}
