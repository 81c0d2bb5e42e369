//! The [`Log`] record tracked by a light client.
//!
//! A [`Log`] pairs the on-chain content of an event ([`RawLog`]) with the status it was observed
//! under. Its identity hash is derived once, at construction, from the originating transaction
//! hash and receipt index, and never changes afterwards: the status may move from pending to
//! included, the identity may not.
//!
//! `Log` implements [`Hash`], [`Eq`] and [`Borrow<B256>`] through its identity hash, so a hashed
//! set of logs deduplicates re-observations of the same event and can be queried by identity hash
//! directly. Status transitions take `&mut self`: a store holding logs is the single writer for
//! each entry, while shared references may be read concurrently.

use crate::{LogError, LogIdentity, LogInclusion, LogStatus, LogTopic, RawLog, codec};
use alloc::vec::Vec;
use alloy_primitives::{Address, B256, Bytes};
use alloy_rlp::{BufMut, Encodable};
use core::{
    borrow::Borrow,
    hash::{Hash, Hasher},
};
use tracing::{trace, warn};

/// An event record emitted by contract execution, keyed by its reorg-stable identity.
#[derive(Debug)]
pub struct Log {
    /// Contract that emitted the log.
    address: Address,
    /// Topics in emission order.
    topics: Vec<LogTopic>,
    /// Opaque payload.
    data: Bytes,
    /// Cached identity hash of `status`.
    hash: B256,
    /// Inclusion status.
    status: LogStatus,
}

impl Log {
    /// Creates a pending [`Log`] from its content and the identity supplied by the receipt it was
    /// found in.
    pub fn new(raw: RawLog, transaction_hash: B256, receipt_index: u64) -> Self {
        let status = LogStatus::pending(transaction_hash, receipt_index);
        let hash = status.identity_hash();
        trace!(target: "light_log::log", %hash, %transaction_hash, receipt_index, "Created log");

        let RawLog { address, topics, data } = raw;
        Self { address, topics, data, hash, status }
    }

    /// Decodes a pending [`Log`] from a buffer holding exactly one encoded log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::MalformedEncoding`] if the buffer is not a well formed log.
    pub fn decode(
        buf: &[u8],
        transaction_hash: B256,
        receipt_index: u64,
    ) -> Result<Self, LogError> {
        let raw = RawLog::decode_exact(buf)?;
        Ok(Self::new(raw, transaction_hash, receipt_index))
    }

    /// Returns the emitter address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns `true` if `address` emitted the log.
    pub fn has_address(&self, address: &Address) -> bool {
        self.address == *address
    }

    /// Returns the topics in emission order.
    pub fn topics(&self) -> &[LogTopic] {
        &self.topics
    }

    /// Returns the number of topics.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Returns the topic at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::IndexOutOfRange`] if `index` is past the last topic.
    pub fn topic_at(&self, index: usize) -> Result<LogTopic, LogError> {
        self.topics
            .get(index)
            .copied()
            .ok_or(LogError::IndexOutOfRange { index, len: self.topics.len() })
    }

    /// Returns the payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns an independent copy of the payload.
    pub fn data_copy(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Returns the identity hash.
    pub const fn hash(&self) -> B256 {
        self.hash
    }

    /// Returns the identity the log was created with.
    pub const fn identity(&self) -> &LogIdentity {
        self.status.identity()
    }

    /// Returns the inclusion status.
    pub const fn status(&self) -> &LogStatus {
        &self.status
    }

    /// Returns the `(block_hash, block_number)` pair if the log is included.
    pub const fn included(&self) -> Option<(B256, u64)> {
        self.status.included()
    }

    /// Returns `true` if any topic embeds `address`. Unless `topics_only` is set, a log emitted by
    /// `address` matches as well.
    pub fn matches_address(&self, address: &Address, topics_only: bool) -> bool {
        self.topics.iter().any(|topic| topic.matches_address(address)) ||
            (!topics_only && self.has_address(address))
    }

    /// Marks the log as included.
    ///
    /// The caller must have matched this log by identity; use [`Log::confirm`] to have the
    /// identity checked.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidTransition`] if the log is already included. The log is left
    /// unchanged.
    pub fn mark_included(&mut self, inclusion: LogInclusion) -> Result<(), LogError> {
        self.status = self.status.mark_included(inclusion)?;
        Ok(())
    }

    /// Marks the log as included after checking that `identity` is the log's identity.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::IdentityMismatch`] if the identities differ, or
    /// [`LogError::InvalidTransition`] if the log is already included.
    pub fn confirm(
        &mut self,
        identity: &LogIdentity,
        inclusion: LogInclusion,
    ) -> Result<(), LogError> {
        self.status.ensure_identity(identity)?;
        self.mark_included(inclusion)
    }

    /// Returns `true` if both logs share an identity hash.
    pub fn identity_eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }

    /// Returns `true` if both logs have the same address, topics and data. Status is ignored.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.address == other.address && self.topics == other.topics && self.data == other.data
    }

    /// Produces a fully independent copy by encoding then decoding the log, carrying the status
    /// over.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::MalformedEncoding`] if the encoding does not decode back, which means
    /// the codec is not lossless for this log.
    pub fn deep_copy(&self) -> Result<Self, LogError> {
        let encoded = alloy_rlp::encode(self);
        let raw = RawLog::decode_exact(&encoded).inspect_err(|err| {
            warn!(target: "light_log::log", hash = %self.hash, %err, "Log failed to re-decode");
        })?;

        let RawLog { address, topics, data } = raw;
        Ok(Self { address, topics, data, hash: self.hash, status: self.status })
    }

    /// Consumes the log, returning its content.
    pub fn into_raw(self) -> RawLog {
        RawLog { address: self.address, topics: self.topics, data: self.data }
    }
}

impl Encodable for Log {
    fn encode(&self, out: &mut dyn BufMut) {
        codec::encode_fields(&self.address, &self.topics, &self.data, out);
    }

    fn length(&self) -> usize {
        codec::encoded_length(&self.address, &self.topics, &self.data)
    }
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        self.identity_eq(other)
    }
}

impl Eq for Log {}

impl Hash for Log {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl Borrow<B256> for Log {
    fn borrow(&self) -> &B256 {
        &self.hash
    }
}

/// Decodes the list of logs carried by a transaction receipt.
///
/// Receipt indices are assigned by position, starting at zero, and every log starts pending.
///
/// # Errors
///
/// Returns [`LogError::MalformedEncoding`] if the list or any log in it is malformed; no logs
/// are returned in that case.
pub fn decode_receipt_logs(buf: &[u8], transaction_hash: B256) -> Result<Vec<Log>, LogError> {
    let mut payload = receipt_list_payload(buf).inspect_err(|err| {
        warn!(target: "light_log::codec", %err, "Rejected malformed receipt log list");
    })?;

    let mut logs = Vec::new();
    while !payload.is_empty() {
        let raw = RawLog::decode_fields(&mut payload)?;
        let receipt_index = logs.len() as u64;
        logs.push(Log::new(raw, transaction_hash, receipt_index));
    }
    Ok(logs)
}

fn receipt_list_payload(mut buf: &[u8]) -> Result<&[u8], crate::LogDecodeError> {
    let payload = codec::take_list_payload(&mut buf)?;
    if !buf.is_empty() {
        return Err(crate::LogDecodeError::TrailingBytes { remaining: buf.len() });
    }
    Ok(payload)
}
