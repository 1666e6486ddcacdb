//! Identifiers for books, patrons and loans
//!
//! ID Format:
//! - Book IDs: `b-{7-char-hash}` (e.g., `b-7f2b4c1`)
//! - Patron IDs: `p-{7-char-hash}` (e.g., `p-9d3e5f2`)
//! - Loan IDs: `l-{7-char-hash}` (e.g., `l-04ac1e9`)
//!
//! The hash is a 28-bit value. Within a process it is a scrambled sequence
//! number, so no two generated IDs repeat until 2^28 have been issued. The
//! starting point of the sequence is a blake3 hash of the first seed (usually
//! a title or name) and timestamp, so separate runs do not produce the same
//! series.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid book ID format: expected 'b-{{7-char-hash}}', got '{0}'")]
    InvalidBookId(String),

    #[error("Invalid patron ID format: expected 'p-{{7-char-hash}}', got '{0}'")]
    InvalidPatronId(String),

    #[error("Invalid loan ID format: expected 'l-{{7-char-hash}}', got '{0}'")]
    InvalidLoanId(String),
}

/// Bits in a hash: 7 hex characters
const HASH_BITS: u32 = 28;
const HASH_MASK: u32 = (1 << HASH_BITS) - 1;

static SEQUENCE: AtomicU32 = AtomicU32::new(0);
static ORIGIN: OnceLock<u32> = OnceLock::new();

/// Generates a 7-character hash for the next sequence number
fn generate_hash(seed: &str, timestamp: DateTime<Utc>) -> String {
    let origin = *ORIGIN.get_or_init(|| {
        let input = format!("{}{}", seed, timestamp.timestamp_nanos_opt().unwrap_or(0));
        let hash = blake3::hash(input.as_bytes());
        let bytes = hash.as_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    });
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{:07x}", scramble(origin.wrapping_add(sequence) & HASH_MASK))
}

/// A bijection on 28-bit values, so distinct inputs give distinct hashes
fn scramble(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x045d_9f3b) & HASH_MASK;
    x ^= x >> 15;
    x = x.wrapping_mul(0x0119_de1f) & HASH_MASK;
    x ^= x >> 13;
    x
}

/// Parses the hash portion after `prefix`, returning None if malformed
fn parse_hash(s: &str, prefix: &str) -> Option<String> {
    let hash = s.trim().strip_prefix(prefix)?;
    if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(hash.to_ascii_lowercase())
}

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal, $err:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            hash: String,
        }

        impl $name {
            /// Creates a new ID from a seed and timestamp
            pub fn new(seed: &str, timestamp: DateTime<Utc>) -> Self {
                Self {
                    hash: generate_hash(seed, timestamp),
                }
            }

            /// Returns the hash portion of the ID
            pub fn hash(&self) -> &str {
                &self.hash
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.hash)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hash(s, $prefix)
                    .map(|hash| Self { hash })
                    .ok_or_else(|| IdError::$err(s.trim().to_string()))
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
                id.to_string()
            }
        }
    };
}

define_id!(
    /// Book ID in the format `b-{7-char-hash}`
    BookId,
    "b-",
    InvalidBookId
);

define_id!(
    /// Patron ID in the format `p-{7-char-hash}`
    PatronId,
    "p-",
    InvalidPatronId
);

define_id!(
    /// Loan ID in the format `l-{7-char-hash}`
    LoanId,
    "l-",
    InvalidLoanId
);
