//! Recognition and reformatting of MAC addresses in free-form text.
//!
//! [`find_all_candidates`] locates address tokens, [`format_mac_address`] rewrites a
//! single token and [`extract_oui`] yields the vendor prefix used for lookups. None of
//! these read configuration or global state.

pub mod error;
pub mod extract;
pub mod format;

pub use error::{MacError, MacResult};
pub use extract::{find_all_candidates, find_all_mac_addresses, AddressKind, Candidate};
pub use format::{
    extract_oui, find_delimiter, format_mac_address, format_with_delimiter, group_size, CaseOption,
    DelimiterOption, GroupSizeOption, MacFormat,
};
