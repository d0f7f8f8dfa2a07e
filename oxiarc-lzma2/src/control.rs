//! LZMA2 control byte.
//!
//! Every chunk starts with a control byte:
//! - 0x00: End of LZMA2 stream
//! - 0x01: Dictionary reset, then an uncompressed chunk
//! - 0x02: Uncompressed chunk, no reset
//! - 0x03-0x7F: Invalid
//! - 0x80-0xFF: LZMA compressed chunk. Bits 5-6 select the reset class,
//!   bits 0-4 are bits 16-20 of the uncompressed size minus one.

use oxiarc_core::error::{OxiArcError, Result};

/// End of stream marker.
pub const EOS: u8 = 0x00;

/// Uncompressed chunk with dictionary reset.
pub const UNCOMPRESSED_RESET: u8 = 0x01;

/// Uncompressed chunk without reset.
pub const UNCOMPRESSED: u8 = 0x02;

/// LZMA chunk mask (bit 7 set).
pub const LZMA_MASK: u8 = 0x80;

/// Shift of the two reset class bits.
pub const RESET_SHIFT: u32 = 5;

/// High bits of uncompressed size mask (bits 0-4).
pub const SIZE_HIGH_MASK: u8 = 0x1F;

/// What an LZMA chunk resets before it is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetClass {
    /// Continue with the current state and properties.
    None,
    /// Reset the entropy decoder state, keep the properties.
    State,
    /// Reset the entropy decoder state with new properties.
    StateAndProperties,
    /// Reset the dictionary, then as [`ResetClass::StateAndProperties`].
    All,
}

impl ResetClass {
    /// Decode the two reset bits (0-3).
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::None,
            1 => Self::State,
            2 => Self::StateAndProperties,
            _ => Self::All,
        }
    }

    /// The two reset bits.
    pub const fn bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::State => 1,
            Self::StateAndProperties => 2,
            Self::All => 3,
        }
    }

    /// Whether a properties byte follows the size fields.
    pub const fn has_properties(self) -> bool {
        matches!(self, Self::StateAndProperties | Self::All)
    }
}

/// A parsed control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// End of stream.
    EndOfStream,
    /// Uncompressed chunk.
    Uncompressed {
        /// Whether to reset the dictionary first.
        reset_dict: bool,
    },
    /// LZMA compressed chunk.
    Lzma {
        /// What to reset before decoding.
        reset: ResetClass,
        /// Bits 16-20 of the uncompressed size minus one.
        size_high: u8,
    },
}

impl Control {
    /// Parse a control byte.
    ///
    /// `offset` is the stream offset of the byte, used in the error.
    pub fn parse(byte: u8, offset: u64) -> Result<Self> {
        match byte {
            EOS => Ok(Self::EndOfStream),
            UNCOMPRESSED_RESET => Ok(Self::Uncompressed { reset_dict: true }),
            UNCOMPRESSED => Ok(Self::Uncompressed { reset_dict: false }),
            b if b & LZMA_MASK != 0 => Ok(Self::Lzma {
                reset: ResetClass::from_bits(b >> RESET_SHIFT),
                size_high: b & SIZE_HIGH_MASK,
            }),
            b => Err(OxiArcError::corrupted(
                offset,
                format!("Invalid LZMA2 control byte: 0x{:02X}", b),
            )),
        }
    }

    /// Build the control byte.
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::EndOfStream => EOS,
            Self::Uncompressed { reset_dict: true } => UNCOMPRESSED_RESET,
            Self::Uncompressed { reset_dict: false } => UNCOMPRESSED,
            Self::Lzma { reset, size_high } => {
                LZMA_MASK | (reset.bits() << RESET_SHIFT) | (size_high & SIZE_HIGH_MASK)
            }
        }
    }
}
