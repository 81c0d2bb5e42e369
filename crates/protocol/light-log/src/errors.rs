//! Error types for the `kona-light-log` crate.

use alloy_primitives::B256;
use thiserror::Error;

/// The number of items in the RLP list of an encoded log: address, topics and data.
pub const LOG_ITEM_COUNT: usize = 3;

/// A structural violation found while decoding an RLP encoded log.
///
/// Every variant is fatal for the enclosing record. A log is never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogDecodeError {
    /// The top level list does not hold exactly [`LOG_ITEM_COUNT`] items.
    #[error("expected a list of {expected} items, got {got}")]
    ItemCount {
        /// The required number of items.
        expected: usize,
        /// The number of items found in the list.
        got: usize,
    },
    /// The emitter address item is not 20 bytes long.
    #[error("address must be 20 bytes, got {len}")]
    AddressLength {
        /// The length of the decoded item.
        len: usize,
    },
    /// A topic item is not 32 bytes long.
    #[error("topic {index} must be 32 bytes, got {len}")]
    TopicLength {
        /// Position of the topic within the topic list.
        index: usize,
        /// The length of the decoded item.
        len: usize,
    },
    /// A list was expected but a string was found.
    #[error("expected a list, got a string")]
    UnexpectedString,
    /// A string was expected but a list was found.
    #[error("expected a string, got a list")]
    UnexpectedList,
    /// Bytes remain after the encoded log.
    #[error("{remaining} trailing bytes after encoded log")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: usize,
    },
    /// The underlying RLP decoder rejected the input.
    #[error("rlp: {0}")]
    Rlp(alloy_rlp::Error),
}

impl From<alloy_rlp::Error> for LogDecodeError {
    fn from(err: alloy_rlp::Error) -> Self {
        match err {
            alloy_rlp::Error::UnexpectedString => Self::UnexpectedString,
            alloy_rlp::Error::UnexpectedList => Self::UnexpectedList,
            other => Self::Rlp(other),
        }
    }
}

impl From<LogDecodeError> for alloy_rlp::Error {
    fn from(err: LogDecodeError) -> Self {
        match err {
            LogDecodeError::ItemCount { .. } => Self::Custom("log must be a list of 3 items"),
            LogDecodeError::AddressLength { .. } | LogDecodeError::TopicLength { .. } => {
                Self::UnexpectedLength
            }
            LogDecodeError::UnexpectedString => Self::UnexpectedString,
            LogDecodeError::UnexpectedList => Self::UnexpectedList,
            LogDecodeError::TrailingBytes { .. } => Self::Custom("trailing bytes after log"),
            LogDecodeError::Rlp(err) => err,
        }
    }
}

/// An error raised by the operations on a [`Log`](crate::Log) or its
/// [`LogStatus`](crate::LogStatus).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// The wire bytes do not describe a log.
    #[error("malformed log encoding: {0}")]
    MalformedEncoding(#[from] LogDecodeError),
    /// The status is already included and cannot transition again.
    #[error("log already included in block {block_number} ({block_hash})")]
    InvalidTransition {
        /// Hash of the block the log is already included in.
        block_hash: B256,
        /// Number of the block the log is already included in.
        block_number: u64,
    },
    /// The identity presented for a transition is not the identity of the log.
    #[error("log identity mismatch. Expected {expected}, got {actual}")]
    IdentityMismatch {
        /// The identity hash of the log.
        expected: B256,
        /// The identity hash presented by the caller.
        actual: B256,
    },
    /// A topic was requested past the end of the topic list.
    #[error("topic index {index} out of range for {len} topics")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of topics in the log.
        len: usize,
    },
}
