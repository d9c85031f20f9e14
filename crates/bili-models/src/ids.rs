//! Canonical video identifiers and input scanning.
//!
//! Everything downstream of this module works on [`BvId`], the public
//! alphanumeric identifier (`BV` + 10 characters). User input arrives in a
//! handful of shapes: a bare id, a full watch URL, a `b23.tv` short link, or
//! a legacy numeric `av` id. [`scan_input`] classifies the input; the legacy
//! numeric form is converted with the base-58 transform in
//! [`BvId::from_avid`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body length of a canonical id, excluding the `BV` prefix.
const BV_BODY_LEN: usize = 10;

/// Positional base-58 alphabet of the av-to-bv transform. A character's
/// index in this string is its digit value.
const ALPHABET: &[u8; 58] = b"fZodR9XQDSUm21yCkr6zBqiveYah8bt4xsWpHnJE7jL5VG3guMTKNPAwcF";

/// Output template; the six slot positions are overwritten, everything else
/// is emitted verbatim.
const TEMPLATE: &[u8; 12] = b"BV1  4 1 7  ";

/// Template indices receiving base-58 digits, least significant first.
const SLOTS: [usize; 6] = [11, 10, 3, 8, 4, 6];

const XOR_CODE: u64 = 177_451_812;
const ADD_CODE: u64 = 8_728_348_608;

/// Exclusive upper bound of the six-digit base-58 encoding space.
const MAX_ENCODABLE: u64 = 58u64.pow(6);

/// Errors produced when validating a canonical id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Identifier does not start with the `BV` prefix.
    #[error("canonical id must start with 'BV'")]
    InvalidPrefix,
    /// Identifier body is not exactly 10 alphanumeric characters.
    #[error("canonical id must be 'BV' followed by 10 alphanumeric characters")]
    InvalidBody,
}

/// A validated canonical video identifier.
///
/// Immutable once constructed; the prefix is normalized to uppercase `BV`,
/// the body is kept as-is (it is case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BvId(String);

impl BvId {
    /// Validate a bare identifier of the canonical shape.
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let input = input.trim();
        let bytes = input.as_bytes();
        if bytes.len() < 2 || !bytes[0].eq_ignore_ascii_case(&b'B') || !bytes[1].eq_ignore_ascii_case(&b'V') {
            return Err(IdError::InvalidPrefix);
        }
        let body = &bytes[2..];
        if body.len() != BV_BODY_LEN || !body.iter().all(u8::is_ascii_alphanumeric) {
            return Err(IdError::InvalidBody);
        }
        let mut id = String::with_capacity(2 + BV_BODY_LEN);
        id.push_str("BV");
        id.push_str(&input[2..]);
        Ok(Self(id))
    }

    /// Convert a legacy numeric `av` id into its canonical form.
    ///
    /// The transform is `x' = (av XOR 177451812) + 8728348608`, then six
    /// base-58 digits of `x'` are written into the fixed template positions,
    /// least significant digit first. Returns `None` when the transformed
    /// value falls outside the six-digit encoding space; no real id does.
    pub fn from_avid(avid: u64) -> Option<Self> {
        let x = (avid ^ XOR_CODE).checked_add(ADD_CODE)?;
        if x >= MAX_ENCODABLE {
            return None;
        }
        let mut out = *TEMPLATE;
        for (i, &slot) in SLOTS.iter().enumerate() {
            let digit = (x / 58u64.pow(i as u32)) % 58;
            out[slot] = ALPHABET[digit as usize];
        }
        // Template and alphabet are ASCII, so the output always is.
        Some(Self(String::from_utf8(out.to_vec()).expect("BV template is ASCII")))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BvId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of scanning raw user input for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdScan {
    /// A canonical id was derived directly.
    Canonical(BvId),
    /// The input carries a `b23.tv` short-link token; resolving it to a
    /// final URL requires a network hop and is left to the caller.
    ShortLink(String),
    /// No identifier of any supported shape was found.
    NotFound,
}

/// Scan raw input for a video identifier.
///
/// Recognition order, first match wins:
/// 1. the whole input matches the canonical shape
/// 2. a `b23.tv/<token>` short link
/// 3. a canonical-shaped substring anywhere (e.g. embedded in a URL)
/// 4. a legacy `av<digits>` id, converted via [`BvId::from_avid`]
///
/// A numeric id outside the convertible range counts as not found.
pub fn scan_input(input: &str) -> IdScan {
    let input = input.trim();

    if let Ok(bvid) = BvId::parse(input) {
        return IdScan::Canonical(bvid);
    }
    if let Some(token) = find_short_link_token(input) {
        return IdScan::ShortLink(token);
    }
    if let Some(bvid) = find_bvid(input) {
        return IdScan::Canonical(bvid);
    }
    if let Some(bvid) = find_avid(input).and_then(BvId::from_avid) {
        return IdScan::Canonical(bvid);
    }
    IdScan::NotFound
}

/// Find a canonical-shaped substring anywhere in the input.
pub fn find_bvid(input: &str) -> Option<BvId> {
    let bytes = input.as_bytes();
    for start in 0..bytes.len() {
        let window = &bytes[start..];
        if window.len() < 2 + BV_BODY_LEN {
            break;
        }
        if window[0].eq_ignore_ascii_case(&b'B')
            && window[1].eq_ignore_ascii_case(&b'V')
            && window[2..2 + BV_BODY_LEN].iter().all(u8::is_ascii_alphanumeric)
        {
            let candidate = &input[start..start + 2 + BV_BODY_LEN];
            if let Ok(bvid) = BvId::parse(candidate) {
                return Some(bvid);
            }
        }
    }
    None
}

/// Extract the token of a `b23.tv/<token>` short link, if present.
fn find_short_link_token(input: &str) -> Option<String> {
    let pos = input.find("b23.tv/")?;
    let rest = &input[pos + "b23.tv/".len()..];
    let token: String = rest.chars().take_while(char::is_ascii_alphanumeric).collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Find a legacy `av<digits>` id anywhere in the input.
fn find_avid(input: &str) -> Option<u64> {
    let bytes = input.as_bytes();
    for start in 0..bytes.len().saturating_sub(2) {
        if bytes[start].eq_ignore_ascii_case(&b'a')
            && bytes[start + 1].eq_ignore_ascii_case(&b'v')
            && bytes[start + 2].is_ascii_digit()
        {
            let digits: String = input[start + 2..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(avid) = digits.parse::<u64>() {
                return Some(avid);
            }
        }
    }
    None
}
