use serde::{Deserialize, Serialize};

/// Page request, cursor bytes are opaque to the caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(with = "hex::serde")]
    pub key: Vec<u8>,
    pub offset: u64,
    pub limit: u64,
    pub count_total: bool,
    pub reverse: bool,
}

impl PageRequest {
    pub fn with_limit(limit: u64, count_total: bool) -> Self {
        Self {
            limit,
            count_total,
            ..Default::default()
        }
    }

    pub fn with_key(key: Vec<u8>, limit: u64) -> Self {
        Self {
            key,
            limit,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    // Empty when there is no further page
    #[serde(with = "hex::serde")]
    pub next_key: Vec<u8>,
    // Only set when the request asked for it
    pub total: u64,
}

impl PageResponse {
    pub fn has_next(&self) -> bool {
        !self.next_key.is_empty()
    }
}
