//! Builders for logs used in tests.

use crate::{Log, LogTopic, RawLog};
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, Bytes};
use alloy_rlp::{BufMut, Header};

/// Builds a [`RawLog`] field by field.
#[derive(Debug, Clone, Default)]
pub struct RawLogBuilder {
    log: RawLog,
}

impl RawLogBuilder {
    /// Starts a log emitted by `address` with no topics and no data.
    pub fn new(address: Address) -> Self {
        Self { log: RawLog { address, ..Default::default() } }
    }

    /// Appends a topic.
    pub fn with_topic(mut self, topic: impl Into<LogTopic>) -> Self {
        self.log.topics.push(topic.into());
        self
    }

    /// Appends topics in order.
    pub fn with_topics(mut self, topics: impl IntoIterator<Item = LogTopic>) -> Self {
        self.log.topics.extend(topics);
        self
    }

    /// Sets the data.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.log.data = data.into();
        self
    }

    /// Returns the built [`RawLog`].
    pub fn build(self) -> RawLog {
        self.log
    }

    /// Returns a pending [`Log`] with the given identity.
    pub fn build_pending(self, transaction_hash: B256, receipt_index: u64) -> Log {
        Log::new(self.log, transaction_hash, receipt_index)
    }
}

/// Wraps already encoded items into an RLP list.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_length = items.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    Header { list: true, payload_length }.encode(&mut out);
    for item in items {
        out.put_slice(item);
    }
    out
}
