//! # OxiArc Core
//!
//! Core components for the OxiArc decoders.
//!
//! This crate provides the building blocks shared by the codec crates:
//!
//! - [`window`]: Sliding window buffer that LZ-family decoders write into
//! - [`traits`]: Streaming decompression trait and status values
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L2: Codec                                               │
//! │     LZMA2 chunk framing, entropy decoders               │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     Window, Decompressor, OxiArcError                   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiarc_core::window::{SlidingWindow, Window};
//!
//! let mut window = SlidingWindow::new(4096).unwrap();
//! window.write_raw(b"ab");
//! window.repeat(2, 4).unwrap();
//!
//! let mut out = Vec::new();
//! window.drain_to_vec(&mut out);
//! assert_eq!(out, b"ababab");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use error::{BoxedError, OxiArcError, Result};
pub use traits::{DecompressStatus, Decompressor};
pub use window::{SlidingWindow, Window};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{OxiArcError, Result};
    pub use crate::traits::{DecompressStatus, Decompressor};
    pub use crate::window::{SlidingWindow, Window};
}
