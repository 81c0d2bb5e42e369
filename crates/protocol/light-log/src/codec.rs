//! RLP encoding of logs.
//!
//! A log is encoded as a list of exactly three items:
//!
//! | Item | Content                                        |
//! |------|------------------------------------------------|
//! | 0    | emitter address, a 20-byte string              |
//! | 1    | list of topics, each a 32-byte string          |
//! | 2    | data, a byte string of any length              |
//!
//! The inclusion status is never encoded. It depends on where the log was observed, not on its
//! on-chain content, and is supplied out of band when a [`Log`](crate::Log) is built.

use crate::{LOG_ITEM_COUNT, LogDecodeError, LogTopic};
use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes};
use alloy_rlp::{Buf, BufMut, Decodable, Encodable, Header};
use tracing::warn;

/// The on-chain content of a log: emitter, topics and data, without any status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct RawLog {
    /// Contract that emitted the log.
    pub address: Address,
    /// Topics in emission order.
    pub topics: Vec<LogTopic>,
    /// Opaque payload.
    pub data: Bytes,
}

impl RawLog {
    /// Creates a new [`RawLog`].
    pub const fn new(address: Address, topics: Vec<LogTopic>, data: Bytes) -> Self {
        Self { address, topics, data }
    }

    /// Decodes a [`RawLog`] from a buffer holding exactly one encoded log.
    ///
    /// # Errors
    ///
    /// Returns a [`LogDecodeError`] if the buffer is not a well formed log, or if bytes remain
    /// after it.
    pub fn decode_exact(mut buf: &[u8]) -> Result<Self, LogDecodeError> {
        let log = Self::decode_fields(&mut buf)?;
        if !buf.is_empty() {
            warn!(target: "light_log::codec", remaining = buf.len(), "Trailing bytes after log");
            return Err(LogDecodeError::TrailingBytes { remaining: buf.len() });
        }
        Ok(log)
    }

    /// Decodes one encoded log from the front of `buf`, advancing it past the log.
    ///
    /// # Errors
    ///
    /// Returns a [`LogDecodeError`] describing the first structural violation found.
    pub fn decode_fields(buf: &mut &[u8]) -> Result<Self, LogDecodeError> {
        Self::decode_fields_inner(buf).inspect_err(|err| {
            warn!(target: "light_log::codec", %err, "Rejected malformed log");
        })
    }

    fn decode_fields_inner(buf: &mut &[u8]) -> Result<Self, LogDecodeError> {
        let mut payload = take_list_payload(buf)?;

        let got = count_items(payload)?;
        if got != LOG_ITEM_COUNT {
            return Err(LogDecodeError::ItemCount { expected: LOG_ITEM_COUNT, got });
        }

        let address = decode_address(&mut payload)?;

        let mut topics_payload = take_list_payload(&mut payload)?;
        let mut topics = Vec::<LogTopic>::with_capacity(count_items(topics_payload)?);
        while !topics_payload.is_empty() {
            let index = topics.len();
            let bytes = Header::decode_bytes(&mut topics_payload, false)?;
            let topic = <[u8; 32]>::try_from(bytes)
                .map_err(|_| LogDecodeError::TopicLength { index, len: bytes.len() })?;
            topics.push(LogTopic::new(topic));
        }

        let data = Bytes::copy_from_slice(Header::decode_bytes(&mut payload, false)?);

        Ok(Self { address, topics, data })
    }
}

impl Encodable for LogTopic {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out);
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

impl Decodable for LogTopic {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let bytes = Header::decode_bytes(buf, false)?;
        <[u8; 32]>::try_from(bytes).map(Self::new).map_err(|_| alloy_rlp::Error::UnexpectedLength)
    }
}

impl Encodable for RawLog {
    fn encode(&self, out: &mut dyn BufMut) {
        encode_fields(&self.address, &self.topics, &self.data, out);
    }

    fn length(&self) -> usize {
        encoded_length(&self.address, &self.topics, &self.data)
    }
}

impl Decodable for RawLog {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::decode_fields(buf).map_err(Into::into)
    }
}

/// Encodes the three log items as an RLP list.
pub(crate) fn encode_fields(
    address: &Address,
    topics: &[LogTopic],
    data: &Bytes,
    out: &mut dyn BufMut,
) {
    let topics_length = topics_payload_length(topics);
    let payload_length = payload_length(address, topics_length, data);

    Header { list: true, payload_length }.encode(out);
    address.encode(out);
    Header { list: true, payload_length: topics_length }.encode(out);
    for topic in topics {
        topic.encode(out);
    }
    data.encode(out);
}

/// Length of the RLP list written by [`encode_fields`].
pub(crate) fn encoded_length(address: &Address, topics: &[LogTopic], data: &Bytes) -> usize {
    let payload_length = payload_length(address, topics_payload_length(topics), data);
    Header { list: true, payload_length }.length() + payload_length
}

fn topics_payload_length(topics: &[LogTopic]) -> usize {
    topics.iter().map(Encodable::length).sum()
}

fn payload_length(address: &Address, topics_length: usize, data: &Bytes) -> usize {
    address.length() +
        Header { list: true, payload_length: topics_length }.length() +
        topics_length +
        data.length()
}

/// Splits the payload of the list at the front of `buf` off, advancing `buf` past the list.
pub(crate) fn take_list_payload<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], LogDecodeError> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(LogDecodeError::UnexpectedString);
    }
    let input: &'a [u8] = *buf;
    if input.len() < header.payload_length {
        return Err(alloy_rlp::Error::InputTooShort.into());
    }
    let (payload, rest) = input.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

/// Counts the items of a list payload without decoding them.
fn count_items(mut payload: &[u8]) -> Result<usize, LogDecodeError> {
    let mut count = 0;
    while !payload.is_empty() {
        let header = Header::decode(&mut payload)?;
        if payload.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort.into());
        }
        payload.advance(header.payload_length);
        count += 1;
    }
    Ok(count)
}

fn decode_address(buf: &mut &[u8]) -> Result<Address, LogDecodeError> {
    let bytes = Header::decode_bytes(buf, false)?;
    <[u8; 20]>::try_from(bytes)
        .map(Address::from)
        .map_err(|_| LogDecodeError::AddressLength { len: bytes.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{RawLogBuilder, encode_list};
    use alloy_primitives::{B256, address, b256, hex};
    use proptest::prelude::*;

    // A token approval log as served by a LES peer.
    const APPROVAL_RLP: &str = "f89b94\
        96477a1c968a0e64e53b7ed01d0d6e4a311945c2\
        f863\
        a08c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925\
        a00000000000000000000000005c0f318407f37029f2a2b6b29468b79fbd178f2a\
        a0000000000000000000000000642ae78fafbb8032da552d619ad43f1d81e4dd7c\
        a000000000000000000000000000000000000000000000000006f05b59d3b20000";

    #[test]
    fn test_decode_known_log() {
        let bytes = hex::decode(APPROVAL_RLP).unwrap();
        let log = RawLog::decode_exact(&bytes).unwrap();

        assert_eq!(log.address, address!("0x96477a1c968a0e64e53b7ed01d0d6e4a311945c2"));
        assert_eq!(log.topics.len(), 3);
        assert_eq!(
            log.topics[0].0,
            b256!("0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925")
        );
        assert!(
            log.topics[1].matches_address(&address!("0x5c0f318407f37029f2a2b6b29468b79fbd178f2a"))
        );
        assert_eq!(log.data.len(), 32);

        assert_eq!(alloy_rlp::encode(&log), bytes);
        assert_eq!(log.length(), bytes.len());
    }

    #[test]
    fn test_empty_topics_and_data() {
        let log = RawLog::new(Address::ZERO, Vec::new(), Bytes::new());
        let bytes = alloy_rlp::encode(&log);
        // list(21 + 1 + 1) = [0xd7, 0x94 ++ 20 zero bytes, 0xc0, 0x80]
        assert_eq!(bytes.len(), 24);
        assert_eq!(bytes[22..], [0xc0, 0x80]);
        assert_eq!(RawLog::decode_exact(&bytes).unwrap(), log);
    }

    #[test]
    fn test_decode_rejects_two_items() {
        let bytes = encode_list(&[
            alloy_rlp::encode(Address::ZERO),
            alloy_rlp::encode(Vec::<LogTopic>::new()),
        ]);
        assert_eq!(
            RawLog::decode_exact(&bytes),
            Err(LogDecodeError::ItemCount { expected: 3, got: 2 })
        );
    }

    #[test]
    fn test_decode_rejects_four_items() {
        let bytes = encode_list(&[
            alloy_rlp::encode(Address::ZERO),
            alloy_rlp::encode(Vec::<LogTopic>::new()),
            alloy_rlp::encode(Bytes::new()),
            alloy_rlp::encode(Bytes::new()),
        ]);
        assert_eq!(
            RawLog::decode_exact(&bytes),
            Err(LogDecodeError::ItemCount { expected: 3, got: 4 })
        );
    }

    #[test]
    fn test_decode_rejects_short_topic() {
        let bytes = encode_list(&[
            alloy_rlp::encode(Address::ZERO),
            encode_list(&[
                alloy_rlp::encode(B256::ZERO),
                alloy_rlp::encode(Bytes::from(vec![0xabu8; 31])),
            ]),
            alloy_rlp::encode(Bytes::new()),
        ]);
        assert_eq!(
            RawLog::decode_exact(&bytes),
            Err(LogDecodeError::TopicLength { index: 1, len: 31 })
        );
        // Through the `Decodable` impl the same input maps to an rlp error.
        assert_eq!(RawLog::decode(&mut bytes.as_slice()), Err(alloy_rlp::Error::UnexpectedLength));
    }

    #[test]
    fn test_decode_rejects_short_address() {
        let bytes = encode_list(&[
            alloy_rlp::encode(Bytes::from(vec![1u8; 19])),
            alloy_rlp::encode(Vec::<LogTopic>::new()),
            alloy_rlp::encode(Bytes::new()),
        ]);
        assert_eq!(RawLog::decode_exact(&bytes), Err(LogDecodeError::AddressLength { len: 19 }));
    }

    #[test]
    fn test_decode_rejects_string_at_top_level() {
        let bytes = alloy_rlp::encode(Bytes::from_static(b"not a log"));
        assert_eq!(RawLog::decode_exact(&bytes), Err(LogDecodeError::UnexpectedString));
    }

    #[test]
    fn test_decode_rejects_topics_string() {
        let bytes = encode_list(&[
            alloy_rlp::encode(Address::ZERO),
            alloy_rlp::encode(B256::ZERO),
            alloy_rlp::encode(Bytes::new()),
        ]);
        assert_eq!(RawLog::decode_exact(&bytes), Err(LogDecodeError::UnexpectedString));
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        let bytes = hex::decode(APPROVAL_RLP).unwrap();
        let err = RawLog::decode_exact(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err, LogDecodeError::Rlp(alloy_rlp::Error::InputTooShort));
    }

    #[test]
    fn test_decode_exact_rejects_trailing_bytes() {
        let mut bytes = hex::decode(APPROVAL_RLP).unwrap();
        bytes.push(0x80);
        assert_eq!(
            RawLog::decode_exact(&bytes),
            Err(LogDecodeError::TrailingBytes { remaining: 1 })
        );
        // The streaming decoder stops after the log.
        let mut buf = bytes.as_slice();
        assert!(RawLog::decode(&mut buf).is_ok());
        assert_eq!(buf, [0x80]);
    }

    #[test]
    fn test_topic_codec() {
        let topic = LogTopic::from_address(address!("0x642ae78fafbb8032da552d619ad43f1d81e4dd7c"));
        let bytes = alloy_rlp::encode(topic);
        assert_eq!(bytes.len(), 33);
        assert_eq!(LogTopic::decode(&mut bytes.as_slice()).unwrap(), topic);

        let short = alloy_rlp::encode(Bytes::from(vec![0u8; 31]));
        assert_eq!(
            LogTopic::decode(&mut short.as_slice()),
            Err(alloy_rlp::Error::UnexpectedLength)
        );
    }

    proptest! {
        #[test]
        fn prop_codec_roundtrip(
            address in any::<[u8; 20]>(),
            topics in prop::collection::vec(any::<[u8; 32]>(), 0..6),
            data in prop::collection::vec(any::<u8>(), 0..300),
        ) {
            let log = RawLogBuilder::new(Address::from(address))
                .with_topics(topics.into_iter().map(LogTopic::new))
                .with_data(data)
                .build();
            let bytes = alloy_rlp::encode(&log);
            prop_assert_eq!(bytes.len(), log.length());
            prop_assert_eq!(RawLog::decode_exact(&bytes).unwrap(), log);
        }
    }
}
