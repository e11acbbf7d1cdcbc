//! Strongly-typed identifiers used across the engine.
//!
//! All identifiers are opaque strings. Construction rejects empty values and
//! strips stray quoting left behind by upstream exports (`'C123'`, `"ACME1"`).

use core::borrow::Borrow;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Registered principal name (login identity, token subject).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

/// Account identifier (the `customer` column of a transaction row).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

/// Tenant identifier (the `client_id` of an ownership record).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

/// Trim surrounding whitespace and any leading/trailing `'` or `"` characters.
///
/// Interior quotes are preserved: only accidental wrapping is removed.
pub fn strip_quotes(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
}

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build an identifier from raw input, normalizing stray quotes.
            pub fn parse(raw: &str) -> Result<Self, DomainError> {
                let value = strip_quotes(raw);
                if value.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty", $name)));
                }
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl Borrow<str> for $t {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(Username, "Username");
impl_string_newtype!(AccountId, "AccountId");
impl_string_newtype!(TenantId, "TenantId");

impl From<&Username> for AccountId {
    /// An account holder's username is its account identifier.
    fn from(value: &Username) -> Self {
        Self(value.0.clone())
    }
}

impl From<&Username> for TenantId {
    /// A client's username is its tenant identifier.
    fn from(value: &Username) -> Self {
        Self(value.0.clone())
    }
}
