//! Hex colour values.
//!
//! Every colour the gallery stores or renders is a CSS hex colour: `#` followed
//! by exactly three or six hex digits (`#fff`, `#1f2937`). Anything else is
//! rejected at the boundary, so a [`HexColor`] can be dropped straight into a
//! `style` attribute without further escaping.
//!
//! Case is preserved as submitted. `#FFF` and `#fff` are both valid and stay
//! distinct, which keeps re-validation of a stored record byte-for-byte stable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated CSS hex colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Validate `input` as a hex colour.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for empty input and
    /// for anything that is not `#` plus three or six hex digits.
    ///
    /// ```
    /// use png_overlay_gallery::color::HexColor;
    ///
    /// assert_eq!(HexColor::parse("#ff0000").unwrap().as_str(), "#ff0000");
    /// assert_eq!(HexColor::parse(" #abc ").unwrap().as_str(), "#abc");
    /// assert!(HexColor::parse("red").is_none());
    /// assert!(HexColor::parse("#abcd").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#')?;
        let valid_len = digits.len() == 3 || digits.len() == 6;
        if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    /// Validate `input`, falling back to `default` when it is not a colour.
    pub fn parse_or(input: &str, default: &HexColor) -> Self {
        Self::parse(input).unwrap_or_else(|| default.clone())
    }

    /// Pure black, the stock overlay colour.
    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    /// Pure white, the stock tile background.
    pub fn white() -> Self {
        Self("#ffffff".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a hex colour: {value:?}"))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}
