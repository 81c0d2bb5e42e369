#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/op-rs/kona/main/assets/square.png",
    html_favicon_url = "https://raw.githubusercontent.com/op-rs/kona/main/assets/favicon.ico"
)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod errors;
pub use errors::{LOG_ITEM_COUNT, LogDecodeError, LogError};

mod topic;
pub use topic::LogTopic;

mod status;
pub use status::{LogIdentity, LogInclusion, LogStatus};

mod codec;
pub use codec::RawLog;

mod log;
pub use log::{Log, decode_receipt_logs};

mod filter;
pub use filter::{bloom_may_contain_address, logs_bloom};

#[cfg(any(test, feature = "test-utils"))]
mod test_util;
#[cfg(any(test, feature = "test-utils"))]
pub use test_util::{RawLogBuilder, encode_list};
