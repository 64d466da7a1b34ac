use std::str::FromStr;

use serde::Deserialize;

use super::error::{MacError, MacResult};

/// Letter case of the formatted address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CaseOption {
    /// Keep whatever casing the input had
    #[default]
    Original,
    Upper,
    Lower,
}

impl FromStr for CaseOption {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(CaseOption::Original),
            "upper" => Ok(CaseOption::Upper),
            "lower" => Ok(CaseOption::Lower),
            _ => Err(MacError::InvalidCaseOption),
        }
    }
}

impl TryFrom<String> for CaseOption {
    type Error = MacError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Character placed between hex groups.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DelimiterOption {
    /// Reuse the first `:`, `-` or `.` found in the input
    #[default]
    Original,
    Colon,
    Hyphen,
    Dot,
    None,
}

impl DelimiterOption {
    /// The delimiter text, `None` for [`DelimiterOption::Original`] which depends on the input.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            DelimiterOption::Original => None,
            DelimiterOption::Colon => Some(":"),
            DelimiterOption::Hyphen => Some("-"),
            DelimiterOption::Dot => Some("."),
            DelimiterOption::None => Some(""),
        }
    }
}

impl FromStr for DelimiterOption {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(DelimiterOption::Original),
            ":" | "colon" => Ok(DelimiterOption::Colon),
            "-" | "hyphen" => Ok(DelimiterOption::Hyphen),
            "." | "dot" => Ok(DelimiterOption::Dot),
            "" | "none" => Ok(DelimiterOption::None),
            _ => Err(MacError::InvalidDelimiterOption),
        }
    }
}

impl TryFrom<String> for DelimiterOption {
    type Error = MacError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Number of hex digits per group.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum GroupSizeOption {
    /// Infer from the delimiters of the input
    #[default]
    Original,
    Two,
    Four,
    Six,
}

impl GroupSizeOption {
    pub fn size(&self) -> Option<usize> {
        match self {
            GroupSizeOption::Original => None,
            GroupSizeOption::Two => Some(2),
            GroupSizeOption::Four => Some(4),
            GroupSizeOption::Six => Some(6),
        }
    }
}

/// `0` means original size.
impl TryFrom<u8> for GroupSizeOption {
    type Error = MacError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GroupSizeOption::Original),
            2 => Ok(GroupSizeOption::Two),
            4 => Ok(GroupSizeOption::Four),
            6 => Ok(GroupSizeOption::Six),
            _ => Err(MacError::InvalidGroupSize),
        }
    }
}

/// Target notation for [`format_mac_address`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MacFormat {
    pub case: CaseOption,
    pub delimiter: DelimiterOption,
    pub group_size: GroupSizeOption,
}

impl MacFormat {
    pub fn new(case: CaseOption, delimiter: DelimiterOption, group_size: GroupSizeOption) -> Self {
        Self { case, delimiter, group_size }
    }
}

/// Rewrites one address token into `format`.
///
/// Attributes left as original are taken from the token itself.
pub fn format_mac_address(mac: &str, format: &MacFormat) -> MacResult<String> {
    let mac = match format.case {
        CaseOption::Original => mac.to_owned(),
        CaseOption::Upper => mac.to_uppercase(),
        CaseOption::Lower => mac.to_lowercase(),
    };

    let delimiter = match format.delimiter.as_str() {
        Some(delimiter) => delimiter,
        None => find_delimiter(&mac),
    };

    let group_size = match format.group_size.size() {
        Some(size) => size,
        None => group_size(&mac)?,
    };

    format_with_delimiter(&mac, delimiter, group_size)
}

/// First of `:`, `-`, `.` (in that order) present in `mac`, or an empty string.
pub fn find_delimiter(mac: &str) -> &'static str {
    [":", "-", "."]
        .into_iter()
        .find(|delimiter| mac.contains(delimiter))
        .unwrap_or("")
}

/// Infers the original group size from the number of delimiters.
pub fn group_size(mac: &str) -> MacResult<usize> {
    let stripped = mac.chars().filter(char::is_ascii_alphanumeric).count();
    let delimiters = mac.chars().count() - stripped;

    if delimiters == 0 {
        return Err(MacError::InvalidMacAddress);
    }

    match stripped / (delimiters + 1) {
        size @ (2 | 4 | 6) => Ok(size),
        _ => Err(MacError::InvalidMacAddress),
    }
}

/// Splits the hex digits of `mac` into groups of `group_size` joined by `delimiter`.
pub fn format_with_delimiter(mac: &str, delimiter: &str, group_size: usize) -> MacResult<String> {
    if !matches!(group_size, 2 | 4 | 6) {
        return Err(MacError::InvalidGroupSize);
    }

    let digits = clean_mac_address(mac);
    if digits.len() % group_size != 0 {
        return Err(MacError::InvalidMacAddressLength);
    }

    Ok(digits
        .chunks(group_size)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(delimiter))
}

/// The organizationally unique identifier: first six hex digits, upper case.
pub fn extract_oui(mac: &str) -> MacResult<String> {
    let digits = clean_mac_address(&mac.to_uppercase());

    if digits.len() < 12 {
        return Err(MacError::InvalidMacAddress);
    }

    Ok(digits[..6].iter().collect())
}

fn clean_mac_address(mac: &str) -> Vec<char> {
    mac.chars().filter(char::is_ascii_hexdigit).collect()
}
