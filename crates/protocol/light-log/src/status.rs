//! Inclusion status of a log and the identity it is keyed by.
//!
//! A log has no globally stable identifier of its own: the same logical event can be observed
//! under different blocks as the chain reorganizes. The only stable handle is the pair of the
//! originating transaction hash and the log's position within that transaction's receipt, which
//! is captured once as a [`LogIdentity`] and carried unchanged by every [`LogStatus`].

use crate::LogError;
use alloy_primitives::{B256, keccak256};
use derive_more::Display;
use tracing::debug;

/// The reorg-stable identity of a log: `(transaction_hash, receipt_index)`.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[display("tx: {transaction_hash}, receipt index: {receipt_index}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct LogIdentity {
    /// Hash of the transaction whose receipt holds the log.
    pub transaction_hash: B256,
    /// Position of the log within the receipt.
    pub receipt_index: u64,
}

impl LogIdentity {
    /// Creates a new [`LogIdentity`].
    pub const fn new(transaction_hash: B256, receipt_index: u64) -> Self {
        Self { transaction_hash, receipt_index }
    }

    /// Computes the identity hash.
    ///
    /// `keccak256(transaction_hash ++ receipt_index)`, with the receipt index as 8 big-endian
    /// bytes.
    pub fn hash(&self) -> B256 {
        let mut buf = [0u8; 32 + 8];
        buf[..32].copy_from_slice(self.transaction_hash.as_slice());
        buf[32..].copy_from_slice(&self.receipt_index.to_be_bytes());
        keccak256(buf)
    }
}

/// Placement of an included log on chain.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[display("block: {block_number} ({block_hash}), tx index: {transaction_index}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct LogInclusion {
    /// Hash of the including block.
    pub block_hash: B256,
    /// Number of the including block.
    pub block_number: u64,
    /// Index of the originating transaction within the block.
    pub transaction_index: u64,
}

impl LogInclusion {
    /// Creates a new [`LogInclusion`].
    pub const fn new(block_hash: B256, block_number: u64, transaction_index: u64) -> Self {
        Self { block_hash, block_number, transaction_index }
    }
}

/// The inclusion lifecycle of a log.
///
/// `Pending -> Included` is the only transition. `Included` is terminal: a log whose block is
/// orphaned must be replaced in its store, never moved back to `Pending`.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum LogStatus {
    /// Observed, but not yet confirmed at the tracked depth.
    #[display("pending ({_0})")]
    Pending(LogIdentity),
    /// Confirmed in a block.
    #[display("included ({identity}, {inclusion})")]
    Included {
        /// The identity the log was created with.
        identity: LogIdentity,
        /// Where the log was included.
        inclusion: LogInclusion,
    },
}

impl LogStatus {
    /// Creates a [`LogStatus::Pending`] status.
    ///
    /// Creating the same pending status twice yields equal values with equal identity hashes.
    pub const fn pending(transaction_hash: B256, receipt_index: u64) -> Self {
        Self::Pending(LogIdentity::new(transaction_hash, receipt_index))
    }

    /// Returns the identity the status was created with.
    pub const fn identity(&self) -> &LogIdentity {
        match self {
            Self::Pending(identity) | Self::Included { identity, .. } => identity,
        }
    }

    /// Returns the hash of the originating transaction.
    pub const fn transaction_hash(&self) -> B256 {
        self.identity().transaction_hash
    }

    /// Returns the position of the log within its receipt.
    pub const fn receipt_index(&self) -> u64 {
        self.identity().receipt_index
    }

    /// Computes the identity hash. Block placement never participates.
    pub fn identity_hash(&self) -> B256 {
        self.identity().hash()
    }

    /// Returns `true` if the status is [`LogStatus::Pending`].
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Returns `true` if the status is [`LogStatus::Included`].
    pub const fn is_included(&self) -> bool {
        matches!(self, Self::Included { .. })
    }

    /// Returns the full block placement if included.
    pub const fn inclusion(&self) -> Option<&LogInclusion> {
        match self {
            Self::Pending(_) => None,
            Self::Included { inclusion, .. } => Some(inclusion),
        }
    }

    /// Returns the `(block_hash, block_number)` pair if included.
    pub const fn included(&self) -> Option<(B256, u64)> {
        match self {
            Self::Pending(_) => None,
            Self::Included { inclusion, .. } => {
                Some((inclusion.block_hash, inclusion.block_number))
            }
        }
    }

    /// Transitions a pending status to [`LogStatus::Included`], keeping its identity.
    ///
    /// The caller is responsible for having matched the log by identity hash; see
    /// [`LogStatus::ensure_identity`].
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidTransition`] if the status is already included.
    pub fn mark_included(self, inclusion: LogInclusion) -> Result<Self, LogError> {
        match self {
            Self::Pending(identity) => {
                debug!(
                    target: "light_log::status",
                    %identity,
                    block_number = inclusion.block_number,
                    block_hash = %inclusion.block_hash,
                    "Log included"
                );
                Ok(Self::Included { identity, inclusion })
            }
            Self::Included { identity, inclusion: current } => {
                debug!(
                    target: "light_log::status",
                    %identity,
                    block_number = current.block_number,
                    "Rejected transition of an included log"
                );
                Err(LogError::InvalidTransition {
                    block_hash: current.block_hash,
                    block_number: current.block_number,
                })
            }
        }
    }

    /// Checks that `identity` is the identity this status was created with.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::IdentityMismatch`] carrying both identity hashes otherwise.
    pub fn ensure_identity(&self, identity: &LogIdentity) -> Result<(), LogError> {
        if self.identity() == identity {
            return Ok(());
        }
        Err(LogError::IdentityMismatch { expected: self.identity_hash(), actual: identity.hash() })
    }
}
