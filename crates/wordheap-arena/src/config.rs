//! Heap configuration parameters.

use std::error::Error;
use std::fmt;

use crate::header::{HEADER_BYTES, WORD_BYTES};

/// Configuration for a [`Heap`](crate::Heap).
///
/// Fixes the arena's size and the address it is presented at. Validated at
/// construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Arena size in bytes, including every header and the sentinel.
    ///
    /// Default: 16384. Must be even, at least [`HeapConfig::MIN_CAPACITY`]
    /// and at most [`HeapConfig::MAX_CAPACITY`].
    pub capacity: usize,

    /// Address of the arena's first byte as seen by callers.
    ///
    /// Pointers handed out are `base_address + offset`. Must be even and
    /// leave room for `capacity` bytes below 4 GiB.
    pub base_address: u32,

    /// Zero the payload of every block handed out by `allocate`.
    ///
    /// Default: `false`. Payload bytes otherwise hold whatever the previous
    /// owner (or a merged-away header) left behind.
    pub zero_fill: bool,
}

impl HeapConfig {
    /// Default arena size in bytes.
    pub const DEFAULT_CAPACITY: usize = 16 * 1024;

    /// Default base address.
    pub const DEFAULT_BASE_ADDRESS: u32 = 0x0001_0000;

    /// One zero-length block plus the sentinel.
    pub const MIN_CAPACITY: usize = 2 * HEADER_BYTES;

    /// The largest arena whose single initial free block still fits a
    /// 16-bit length.
    pub const MAX_CAPACITY: usize = 2 * HEADER_BYTES + u16::MAX as usize * WORD_BYTES;

    /// Create a config for an arena of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            base_address: Self::DEFAULT_BASE_ADDRESS,
            zero_fill: false,
        }
    }

    /// Create a config whose initial free block holds exactly `words` words.
    pub fn for_payload_words(words: u16) -> Self {
        Self::new(words as usize * WORD_BYTES + 2 * HEADER_BYTES)
    }

    /// Replace the base address.
    pub fn with_base_address(mut self, base_address: u32) -> Self {
        self.base_address = base_address;
        self
    }

    /// Enable or disable zero-filling of fresh allocations.
    pub fn with_zero_fill(mut self, zero_fill: bool) -> Self {
        self.zero_fill = zero_fill;
        self
    }

    /// Payload words of the single free block laid down by initialization.
    pub fn initial_free_words(&self) -> usize {
        self.capacity.saturating_sub(2 * HEADER_BYTES) / WORD_BYTES
    }

    /// Check structural constraints on the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < Self::MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.capacity,
            });
        }
        if self.capacity > Self::MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
            });
        }
        if self.capacity % WORD_BYTES != 0 {
            return Err(ConfigError::OddCapacity {
                capacity: self.capacity,
            });
        }
        if self.base_address as usize % WORD_BYTES != 0 {
            return Err(ConfigError::OddBaseAddress {
                base_address: self.base_address,
            });
        }
        if u64::from(self.base_address) + self.capacity as u64 > u64::from(u32::MAX) + 1 {
            return Err(ConfigError::AddressOverflow {
                base_address: self.base_address,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Errors detected by [`HeapConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity cannot hold a block header and the sentinel.
    CapacityTooSmall {
        /// The configured capacity.
        capacity: usize,
    },
    /// Capacity exceeds what a 16-bit block length can describe.
    CapacityTooLarge {
        /// The configured capacity.
        capacity: usize,
    },
    /// Capacity is not a whole number of words.
    OddCapacity {
        /// The configured capacity.
        capacity: usize,
    },
    /// Base address is not word aligned.
    OddBaseAddress {
        /// The configured base address.
        base_address: u32,
    },
    /// The arena would extend past the 32-bit address space.
    AddressOverflow {
        /// The configured base address.
        base_address: u32,
        /// The configured capacity.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityTooSmall { capacity } => write!(
                f,
                "capacity {capacity} is below the minimum of {}",
                HeapConfig::MIN_CAPACITY
            ),
            Self::CapacityTooLarge { capacity } => write!(
                f,
                "capacity {capacity} exceeds the maximum of {}",
                HeapConfig::MAX_CAPACITY
            ),
            Self::OddCapacity { capacity } => {
                write!(f, "capacity {capacity} is not a multiple of {WORD_BYTES}")
            }
            Self::OddBaseAddress { base_address } => {
                write!(f, "base address {base_address:#010x} is not word aligned")
            }
            Self::AddressOverflow {
                base_address,
                capacity,
            } => write!(
                f,
                "{capacity} bytes at {base_address:#010x} overflow the 32-bit address space"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HeapConfig::default();
        assert_eq!(config.capacity, 16 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn payload_words_constructor_accounts_for_header_and_sentinel() {
        let config = HeapConfig::for_payload_words(64);
        assert_eq!(config.capacity, 136);
        assert_eq!(config.initial_free_words(), 64);
    }

    #[test]
    fn capacity_bounds() {
        assert!(HeapConfig::new(8).validate().is_ok());
        assert_eq!(
            HeapConfig::new(6).validate(),
            Err(ConfigError::CapacityTooSmall { capacity: 6 })
        );
        assert!(HeapConfig::new(HeapConfig::MAX_CAPACITY).validate().is_ok());
        assert!(matches!(
            HeapConfig::new(HeapConfig::MAX_CAPACITY + 2).validate(),
            Err(ConfigError::CapacityTooLarge { .. })
        ));
        assert_eq!(
            HeapConfig::new(101).validate(),
            Err(ConfigError::OddCapacity { capacity: 101 })
        );
    }

    #[test]
    fn base_address_must_be_aligned_and_fit() {
        let odd = HeapConfig::new(64).with_base_address(0x101);
        assert!(matches!(odd.validate(), Err(ConfigError::OddBaseAddress { .. })));

        let top = HeapConfig::new(64).with_base_address(u32::MAX - 63);
        assert!(top.validate().is_ok());

        let over = HeapConfig::new(64).with_base_address(u32::MAX - 61);
        assert!(matches!(over.validate(), Err(ConfigError::AddressOverflow { .. })));
    }
}
