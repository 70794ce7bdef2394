//! Snowflake ID - time-ordered 64-bit identifier for channels, messages and reactions
//!
//! Message ids double as the tie-breaker in the `(created_at, id)` ordering key,
//! so ids from one generator must be strictly increasing.
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 64-bit id. JSON carries it as a decimal string so JavaScript clients keep
/// full precision; integers are accepted on input too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "WireId")]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2024-01-01T00:00:00Z in Unix milliseconds
    pub const EPOCH: i64 = 1_704_067_200_000;

    const WORKER_SHIFT: u32 = 12;
    const TIME_SHIFT: u32 = 22;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Unix milliseconds at which the id was minted
    #[inline]
    pub const fn timestamp(self) -> i64 {
        (self.0 >> Self::TIME_SHIFT) + Self::EPOCH
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn worker_id(self) -> u16 {
        ((self.0 >> Self::WORKER_SHIFT) & 0x3FF) as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl From<Snowflake> for String {
    fn from(id: Snowflake) -> Self {
        id.0.to_string()
    }
}

/// Accepted JSON shapes for an id
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl TryFrom<WireId> for Snowflake {
    type Error = SnowflakeParseError;

    fn try_from(raw: WireId) -> Result<Self, Self::Error> {
        match raw {
            WireId::Number(n) => Ok(Self(n)),
            WireId::Text(s) => s.parse(),
        }
    }
}

/// Thread-safe Snowflake ID generator
///
/// Timestamp and sequence are packed into one atomic word so every call
/// observes and advances the same logical clock. When the wall clock stalls,
/// regresses, or a millisecond's 4096 sequence slots run out, the generator
/// borrows from the next millisecond instead of sleeping, so ids stay strictly
/// increasing for the lifetime of the process.
pub struct SnowflakeGenerator {
    worker_id: u16,
    /// `(millis since EPOCH) << 12 | sequence` of the last id handed out
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// Largest worker id that fits in the 10-bit field
    pub const MAX_WORKER_ID: u16 = 1023;

    const SEQUENCE_MASK: i64 = 0xFFF;

    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id <= Self::MAX_WORKER_ID, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    /// Generate a new unique, strictly increasing Snowflake ID
    pub fn generate(&self) -> Snowflake {
        let now = Self::current_timestamp() - Snowflake::EPOCH;
        let mut last = self.state.load(Ordering::Acquire);

        loop {
            let last_millis = last >> 12;
            let next = if now > last_millis {
                now << 12
            } else if last & Self::SEQUENCE_MASK < Self::SEQUENCE_MASK {
                last + 1
            } else {
                (last_millis + 1) << 12
            };

            match self
                .state
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let millis = next >> 12;
                    let sequence = next & Self::SEQUENCE_MASK;
                    return Snowflake::new(
                        (millis << Snowflake::TIME_SHIFT)
                            | (i64::from(self.worker_id) << Snowflake::WORKER_SHIFT)
                            | sequence,
                    );
                }
                Err(actual) => last = actual,
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(Snowflake::EPOCH, |d| d.as_millis() as i64)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
