//! LZMA2 container properties byte.
//!
//! The filter properties of LZMA2 are a single byte. Bits 7-6 are reserved
//! and must be zero; bits 5-0 hold a dictionary size class from 0 to 40:
//!
//! ```text
//! class 0   ->   4 KiB      class 1  ->   6 KiB
//! class 2   ->   8 KiB      class 3  ->  12 KiB
//! ...
//! class 38  ->   2 GiB      class 39 ->   3 GiB
//! class 40  ->   u32::MAX
//! ```
//!
//! Formula: `(2 | (class & 1)) << (class / 2 + 11)`

use crate::options::LzmaOptions;
use oxiarc_core::error::{OxiArcError, Result};

/// Largest valid dictionary size class.
pub const DICT_CLASS_MAX: u8 = 40;

/// Reserved bits of the properties byte.
pub const RESERVED_MASK: u8 = 0xC0;

/// Get dictionary size for a class, `None` if the class is above 40.
pub fn dict_size_from_class(class: u8) -> Option<u32> {
    match class {
        DICT_CLASS_MAX => Some(u32::MAX),
        c if c < DICT_CLASS_MAX => {
            let base = 2 | u32::from(c & 1);
            Some(base << (c / 2 + 11))
        }
        _ => None,
    }
}

/// Decode the LZMA2 properties byte into decoder options.
///
/// The returned options carry the default lc/lp/pb and no preset dictionary.
pub fn decode_properties(byte: u8) -> Result<LzmaOptions> {
    if byte & RESERVED_MASK != 0 {
        return Err(OxiArcError::invalid_options(format!(
            "LZMA2 properties byte 0x{:02X} has reserved bits set",
            byte
        )));
    }

    let dict_size = dict_size_from_class(byte).ok_or_else(|| {
        OxiArcError::invalid_options(format!(
            "LZMA2 dictionary size class {} exceeds {}",
            byte, DICT_CLASS_MAX
        ))
    })?;

    Ok(LzmaOptions::new(dict_size))
}

/// Encode a dictionary size into the LZMA2 properties byte.
///
/// Picks the smallest class whose dictionary holds at least `dict_size` bytes.
pub fn encode_properties(dict_size: u32) -> u8 {
    (0..DICT_CLASS_MAX)
        .find(|&class| dict_size_from_class(class).is_some_and(|size| size >= dict_size))
        .unwrap_or(DICT_CLASS_MAX)
}
