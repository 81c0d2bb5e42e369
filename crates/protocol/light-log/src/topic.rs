//! The 32-byte indexed value attached to a log.

use alloc::string::String;
use alloy_primitives::{Address, B256, Bloom, BloomInput, hex};
use derive_more::{AsRef, From, Into};

/// Number of leading zero bytes in a topic that embeds an [`Address`].
const ADDRESS_PADDING: usize = 12;

/// A 32-byte log topic.
///
/// Topics may embed a 20-byte [`Address`], right aligned with 12 leading zero bytes, which is how
/// indexed `address` event parameters are laid out on chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into, AsRef)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct LogTopic(pub B256);

impl LogTopic {
    /// The all-zero topic.
    pub const ZERO: Self = Self(B256::ZERO);

    /// Creates a new [`LogTopic`] from its raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// Embeds `address` into the low-order 20 bytes of a zeroed topic.
    pub fn from_address(address: Address) -> Self {
        Self(address.into_word())
    }

    /// Returns `true` if the topic is `address` embedded with [`Self::from_address`].
    pub fn matches_address(&self, address: &Address) -> bool {
        self.0[..ADDRESS_PADDING].iter().all(|byte| *byte == 0) && self.to_address() == *address
    }

    /// Extracts the low-order 20 bytes as an [`Address`].
    ///
    /// The high-order bytes are ignored; check [`Self::matches_address`] first when the topic
    /// may not embed an address.
    pub fn to_address(&self) -> Address {
        Address::from_word(self.0)
    }

    /// The raw bytes fed to a membership filter for this topic.
    pub fn filter_key(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Builds the bloom filter holding only this topic's filter key.
    pub fn bloom(&self) -> Bloom {
        let mut bloom = Bloom::ZERO;
        bloom.accrue(BloomInput::Raw(self.filter_key()));
        bloom
    }

    /// Builds the bloom filter for `address` embedded as a topic.
    pub fn address_bloom(address: Address) -> Bloom {
        Self::from_address(address).bloom()
    }

    /// Renders the topic as `0x` followed by 64 lowercase hex characters.
    pub fn to_hex_string(&self) -> String {
        hex::encode_prefixed(self.0)
    }
}

impl From<Address> for LogTopic {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

impl core::fmt::Display for LogTopic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use proptest::prelude::*;
    use rstest::rstest;

    const TRANSFER: LogTopic = LogTopic(b256!(
        "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925"
    ));

    #[test]
    fn test_from_address_right_aligns() {
        let addr = address!("0x5c0f318407f37029f2a2b6b29468b79fbd178f2a");
        let topic = LogTopic::from_address(addr);
        assert_eq!(
            topic.0,
            b256!("0x0000000000000000000000005c0f318407f37029f2a2b6b29468b79fbd178f2a")
        );
        assert_eq!(topic, LogTopic::from(addr));
    }

    #[rstest]
    #[case::embedded(
        b256!("0x000000000000000000000000642ae78fafbb8032da552d619ad43f1d81e4dd7c"),
        true
    )]
    #[case::dirty_padding(
        b256!("0x000000000000000000000001642ae78fafbb8032da552d619ad43f1d81e4dd7c"),
        false
    )]
    #[case::other_address(
        b256!("0x0000000000000000000000005c0f318407f37029f2a2b6b29468b79fbd178f2a"),
        false
    )]
    #[case::event_signature(TRANSFER.0, false)]
    fn test_matches_address(#[case] topic: B256, #[case] expected: bool) {
        let addr = address!("0x642ae78fafbb8032da552d619ad43f1d81e4dd7c");
        assert_eq!(LogTopic(topic).matches_address(&addr), expected);
    }

    #[test]
    fn test_to_address_ignores_padding() {
        // Extraction from a non-address topic is well defined, just meaningless.
        let topic = LogTopic(b256!(
            "0xffffffffffffffffffffffff642ae78fafbb8032da552d619ad43f1d81e4dd7c"
        ));
        assert_eq!(topic.to_address(), address!("0x642ae78fafbb8032da552d619ad43f1d81e4dd7c"));
        assert!(!topic.matches_address(&topic.to_address()));
    }

    #[test]
    fn test_hex_string() {
        let hex = TRANSFER.to_hex_string();
        assert_eq!(hex, "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925");
        assert_eq!(hex.len(), 66);
        assert_eq!(LogTopic::ZERO.to_string(), format!("0x{}", "0".repeat(64)));
    }

    #[test]
    fn test_filter_key_and_bloom() {
        assert_eq!(TRANSFER.filter_key(), TRANSFER.0.as_slice());
        assert_eq!(TRANSFER.filter_key().len(), 32);

        let bloom = TRANSFER.bloom();
        assert!(bloom.contains_input(BloomInput::Raw(TRANSFER.filter_key())));

        let addr = address!("0x96477a1c968a0e64e53b7ed01d0d6e4a311945c2");
        assert_eq!(LogTopic::address_bloom(addr), LogTopic::from_address(addr).bloom());
    }

    proptest! {
        #[test]
        fn prop_address_embedding_roundtrip(bytes in any::<[u8; 20]>()) {
            let addr = Address::from(bytes);
            let topic = LogTopic::from_address(addr);
            prop_assert_eq!(topic.to_address(), addr);
            prop_assert!(topic.matches_address(&addr));
        }
    }
}
