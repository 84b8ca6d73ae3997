//! Identifier types for processor-owned objects.
//!
//! Customers and payment intents live in the payment processor; this crate only
//! ever holds their opaque IDs. Each ID type checks the processor's object
//! prefix (`cus_`, `pi_`) so that an ID of one kind cannot be passed where the
//! other is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Define a prefixed, string-backed identifier type with standard trait impls.
///
/// Generates a newtype over `String` with:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as string, validated)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`, `AsRef<str>`
macro_rules! processor_id_type {
    ($name:ident, $prefix:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Object prefix used by the processor for this ID kind.
            pub const PREFIX: &'static str = $prefix;

            /// Return the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.strip_prefix($prefix) {
                    Some(rest) if !rest.is_empty() => Ok(Self(s.to_string())),
                    _ => Err(IdError::InvalidPrefix {
                        expected: $prefix,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

processor_id_type!(
    CustomerId,
    "cus_",
    "A processor customer identifier (`cus_...`)."
);
processor_id_type!(
    PaymentIntentId,
    "pi_",
    "A processor payment intent identifier (`pi_...`)."
);

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input does not carry the expected object prefix.
    #[error("invalid identifier {value:?}: expected prefix {expected}")]
    InvalidPrefix {
        /// The prefix this ID kind requires.
        expected: &'static str,
        /// The rejected input.
        value: String,
    },
}
