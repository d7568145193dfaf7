//! Common identifier types used throughout the crate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length in bytes of addresses and object ids
pub const ID_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("'{0}' is empty")]
    Empty(String),

    #[error("'{value}' is longer than {max} hex digits")]
    TooLong { value: String, max: usize },

    #[error("'{0}' is not valid hex")]
    InvalidHex(String),

    #[error("'{0}' is not a package::module::function target")]
    InvalidTarget(String),
}

fn parse_hex_id(value: &str) -> Result<[u8; ID_LENGTH], ParseIdError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(ParseIdError::Empty(value.to_string()));
    }
    if digits.len() > ID_LENGTH * 2 {
        return Err(ParseIdError::TooLong {
            value: value.to_string(),
            max: ID_LENGTH * 2,
        });
    }

    // Short forms such as 0x2 are left-padded
    let padded = format!("{:0>width$}", digits, width = ID_LENGTH * 2);
    let mut out = [0u8; ID_LENGTH];
    hex::decode_to_slice(&padded, &mut out)
        .map_err(|_| ParseIdError::InvalidHex(value.to_string()))?;
    Ok(out)
}

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name([u8; ID_LENGTH]);

        impl $name {
            pub const fn new(bytes: [u8; ID_LENGTH]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex_id(s).map(Self)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

hex_id!(
    /// Account address on the network
    SuiAddress
);

hex_id!(
    /// Identifier of an on-chain object (coins, journals, packages)
    ObjectId
);

/// Fully qualified Move entry point, `package::module::function`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    pub fn new(package: ObjectId, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
        }
    }

    /// `<package>::journal::new_journal`
    pub fn new_journal(package: ObjectId) -> Self {
        Self::new(package, "journal", "new_journal")
    }
}

impl FromStr for MoveTarget {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        match parts.as_slice() {
            [package, module, function] if !module.is_empty() && !function.is_empty() => {
                Ok(Self::new(package.parse()?, *module, *function))
            }
            _ => Err(ParseIdError::InvalidTarget(s.to_string())),
        }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}
