//! LZMA decoder options.
//!
//! [`LzmaOptions`] is the configuration handed to the entropy decoder: the
//! dictionary size from the container's properties byte, the lc/lp/pb
//! triplet from the most recent properties-bearing chunk, and an optional
//! preset dictionary supplied by the caller.

use oxiarc_core::error::{OxiArcError, Result};

/// Default number of literal context bits.
pub const LC_DEFAULT: u32 = 3;

/// Default number of literal position bits.
pub const LP_DEFAULT: u32 = 0;

/// Default number of position bits.
pub const PB_DEFAULT: u32 = 2;

/// Maximum of `lc + lp` allowed in LZMA2.
pub const LCLP_MAX: u32 = 4;

/// Largest valid lc/lp/pb byte: (pb=4 * 5 + lp=4) * 9 + lc=8.
pub const PROPS_BYTE_MAX: u8 = (4 * 5 + 4) * 9 + 8;

/// LZMA properties (lc, lp, pb).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LzmaProperties {
    /// Literal context bits.
    pub lc: u32,
    /// Literal position bits.
    pub lp: u32,
    /// Position bits.
    pub pb: u32,
}

impl LzmaProperties {
    /// Create new properties.
    pub fn new(lc: u32, lp: u32, pb: u32) -> Self {
        Self { lc, lp, pb }
    }

    /// Parse from property byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte > PROPS_BYTE_MAX {
            return None;
        }

        let pb = byte as u32 / 45;
        let remaining = byte as u32 - pb * 45;
        let lp = remaining / 9;
        let lc = remaining - lp * 9;

        Some(Self { lc, lp, pb })
    }

    /// Parse the properties byte of an LZMA2 chunk.
    ///
    /// LZMA2 additionally limits `lc + lp` to [`LCLP_MAX`].
    pub fn decode_lzma2_byte(byte: u8) -> Result<Self> {
        let props = Self::from_byte(byte).ok_or_else(|| {
            OxiArcError::invalid_options(format!("Invalid LZMA properties byte 0x{:02X}", byte))
        })?;

        if props.lc + props.lp > LCLP_MAX {
            return Err(OxiArcError::invalid_options(format!(
                "lc + lp = {} exceeds {}",
                props.lc + props.lp,
                LCLP_MAX
            )));
        }

        Ok(props)
    }

    /// Encode to property byte.
    pub fn to_byte(&self) -> u8 {
        ((self.pb * 45) + (self.lp * 9) + self.lc) as u8
    }
}

impl Default for LzmaProperties {
    fn default() -> Self {
        Self {
            lc: LC_DEFAULT,
            lp: LP_DEFAULT,
            pb: PB_DEFAULT,
        }
    }
}

/// Configuration of the entropy decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LzmaOptions {
    /// Dictionary size in bytes.
    pub dict_size: u32,
    /// Literal/position bits.
    pub props: LzmaProperties,
    /// Preset dictionary, if the caller has one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preset_dict: Option<Vec<u8>>,
}

impl Default for LzmaOptions {
    fn default() -> Self {
        Self {
            dict_size: 1 << 23,
            props: LzmaProperties::default(),
            preset_dict: None,
        }
    }
}

impl LzmaOptions {
    /// Create options for the given dictionary size.
    pub fn new(dict_size: u32) -> Self {
        Self {
            dict_size,
            ..Self::default()
        }
    }

    /// Set dictionary size.
    #[must_use]
    pub fn with_dict_size(mut self, dict_size: u32) -> Self {
        self.dict_size = dict_size;
        self
    }

    /// Set LZMA properties.
    #[must_use]
    pub fn with_properties(mut self, props: LzmaProperties) -> Self {
        self.props = props;
        self
    }

    /// Attach a preset dictionary.
    #[must_use]
    pub fn with_preset_dict(mut self, dict: impl Into<Vec<u8>>) -> Self {
        self.preset_dict = Some(dict.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_roundtrip() {
        let props = LzmaProperties::new(3, 0, 2);
        let byte = props.to_byte();
        assert_eq!(byte, 0x5D);
        assert_eq!(LzmaProperties::from_byte(byte), Some(props));
    }

    #[test]
    fn test_properties_byte_range() {
        assert_eq!(
            LzmaProperties::from_byte(PROPS_BYTE_MAX),
            Some(LzmaProperties::new(8, 4, 4))
        );
        assert_eq!(LzmaProperties::from_byte(PROPS_BYTE_MAX + 1), None);
        assert_eq!(LzmaProperties::from_byte(0xFF), None);
    }

    #[test]
    fn test_lzma2_lclp_limit() {
        // lc=4, lp=0 is the largest allowed lc.
        assert!(LzmaProperties::decode_lzma2_byte(LzmaProperties::new(4, 0, 2).to_byte()).is_ok());
        assert!(LzmaProperties::decode_lzma2_byte(LzmaProperties::new(2, 2, 0).to_byte()).is_ok());

        let err = LzmaProperties::decode_lzma2_byte(LzmaProperties::new(3, 2, 2).to_byte());
        assert!(matches!(err, Err(OxiArcError::InvalidOptions { .. })));

        let err = LzmaProperties::decode_lzma2_byte(LzmaProperties::new(8, 0, 0).to_byte());
        assert!(err.is_err());
    }

    #[test]
    fn test_options_builder() {
        let opts = LzmaOptions::new(1 << 16)
            .with_properties(LzmaProperties::new(0, 2, 0))
            .with_preset_dict(b"abc".to_vec());

        assert_eq!(opts.dict_size, 1 << 16);
        assert_eq!(opts.props.lp, 2);
        assert_eq!(opts.props.pb, 0);
        assert_eq!(opts.preset_dict.as_deref(), Some(&b"abc"[..]));

        let opts = opts.with_dict_size(4096);
        assert_eq!(opts.dict_size, 4096);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_from_json() {
        let json = r#"{"dict_size":65536,"props":{"lc":0,"lp":0,"pb":0}}"#;
        let opts: LzmaOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.dict_size, 65536);
        assert_eq!(opts.props, LzmaProperties::new(0, 0, 0));
        assert_eq!(opts.preset_dict, None);
    }
}
