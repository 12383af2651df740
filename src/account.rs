//! Account identifiers

use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Number of bytes in a derived address.
pub const ADDRESS_LENGTH: usize = 20;

/// An account identifier, the hex form of a 20-byte derived address
/// (`0x` followed by 40 hex digits).
///
/// Any string can be wrapped so that malformed identifiers coming off the
/// wire can be represented and rejected; use [`AccountId::parse`] or
/// [`AccountId::is_account_id`] to check well-formedness.
///
/// Hex digits are case-insensitive: equality, hashing and ordering all work
/// on the lowercased text, while the original spelling is kept for display
/// and serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Parses and validates an account identifier.
    pub fn parse(s: &str) -> Result<Self, ChainError> {
        let id = AccountId(s.to_string());
        if !id.is_account_id() {
            return Err(ChainError::InvalidAccount(format!(
                "{:?} is not properly formatted",
                s
            )));
        }
        Ok(id)
    }

    /// Builds the identifier for raw address bytes.
    pub fn from_address(address: &[u8; ADDRESS_LENGTH]) -> Self {
        AccountId(format!("0x{}", hex::encode(address)))
    }

    /// Reports whether the identifier is properly formatted.
    pub fn is_account_id(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(digits) => {
                digits.len() == ADDRESS_LENGTH * 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The lowercased form two spellings of the same account share.
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for AccountId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for AccountId {}

impl Hash for AccountId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for AccountId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccountId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        AccountId(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
