//! Membership filter keys for logs.
//!
//! A block advertises the logs it holds through a bloom filter built from filter keys. Both the
//! emitter address, embedded as a topic, and every topic contribute one 32-byte key, which lets a
//! light client decide whether a block could hold a log concerning an address before fetching its
//! receipts.

use crate::{Log, LogTopic};
use alloc::vec::Vec;
use alloy_primitives::{Address, Bloom, BloomInput};

impl Log {
    /// Returns the filter keys of the log: the emitter address as a topic, then every topic.
    pub fn filter_keys(&self) -> Vec<LogTopic> {
        core::iter::once(LogTopic::from_address(self.address()))
            .chain(self.topics().iter().copied())
            .collect()
    }

    /// Builds the bloom filter holding every filter key of the log.
    pub fn bloom(&self) -> Bloom {
        self.filter_keys().iter().fold(Bloom::ZERO, |mut bloom, key| {
            bloom.accrue_bloom(&key.bloom());
            bloom
        })
    }
}

/// Returns `true` if `bloom` may hold a log concerning `address`, either as emitter or as an
/// address topic. `false` is definitive.
pub fn bloom_may_contain_address(bloom: &Bloom, address: Address) -> bool {
    bloom.contains_input(BloomInput::Raw(LogTopic::from_address(address).filter_key()))
}

/// Builds the bloom filter of a set of logs, as a block would advertise it.
pub fn logs_bloom<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Bloom {
    logs.into_iter().fold(Bloom::ZERO, |mut bloom, log| {
        bloom.accrue_bloom(&log.bloom());
        bloom
    })
}
