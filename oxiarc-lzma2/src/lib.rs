//! # OxiArc LZMA2
//!
//! LZMA2 chunk framing decoder.
//!
//! LZMA2 wraps LZMA in a sequence of chunks. Each chunk is either stored
//! as-is or LZMA compressed, and can reset the dictionary, the LZMA state or
//! the lc/lp/pb properties before it is decoded. It is the compression
//! filter used by:
//! - XZ compressed files (.xz)
//! - 7-Zip archives (.7z, method LZMA2)
//!
//! ## Features
//!
//! - **Resumable** chunk decoder: input may be split at any byte
//! - Strict validation of reset ordering and chunk sizes
//! - Pluggable [`EntropyDecoder`] for the LZMA payload
//! - Container properties byte codec (dictionary size classes)
//!
//! ## Usage
//!
//! ```ignore
//! use oxiarc_lzma2::{Lzma2Stream, decode_properties};
//! use oxiarc_core::Decompressor;
//!
//! let options = decode_properties(props_byte)?;
//! let mut stream = Lzma2Stream::<MyLzmaDecoder>::new(options)?;
//! let decompressed = stream.decompress_all(&payload)?;
//! ```
//!
//! ## LZMA2 Format
//!
//! A stream is a sequence of chunks ended by a zero control byte. The first
//! chunk must reset the dictionary, and the first LZMA chunk must carry
//! properties. See [`control`] for the control byte layout and [`decoder`]
//! for the chunk layout.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod control;
pub mod decoder;
pub mod entropy;
pub mod options;
pub mod properties;
pub mod stream;

// Re-exports
pub use control::{Control, ResetClass};
pub use decoder::{Lzma2Decoder, Sequence};
pub use entropy::EntropyDecoder;
pub use options::{LzmaOptions, LzmaProperties};
pub use properties::{decode_properties, dict_size_from_class, encode_properties};
pub use stream::{Lzma2Stream, decode_lzma2};
