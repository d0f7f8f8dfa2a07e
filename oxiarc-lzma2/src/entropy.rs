//! Entropy decoder seam.
//!
//! The LZMA2 chunk decoder does not decode LZMA itself. It drives an
//! [`EntropyDecoder`] that it owns exclusively: the chunk decoder decides
//! when the entropy decoder is reset, tells it how many bytes the current
//! chunk decompresses to, and hands it the input that follows the chunk
//! header.

use crate::options::LzmaOptions;
use oxiarc_core::error::Result;
use oxiarc_core::traits::DecompressStatus;
use oxiarc_core::window::Window;

/// A resumable decoder for the payload of LZMA chunks.
pub trait EntropyDecoder: Sized {
    /// Create a decoder configured with `options`.
    fn new(options: &LzmaOptions) -> Result<Self>;

    /// Reset the coding state and adopt `options`.
    ///
    /// Must not forget the size set by [`EntropyDecoder::set_uncompressed`].
    fn reset(&mut self, options: &LzmaOptions);

    /// Set the uncompressed size of the chunk about to be decoded.
    ///
    /// Called once at the start of every LZMA chunk.
    fn set_uncompressed(&mut self, size: usize);

    /// Decode from `input[*in_pos..]` into `window`.
    ///
    /// Advances `in_pos` past the bytes it used. Returns
    /// [`DecompressStatus::Done`] once the chunk's uncompressed size has
    /// been produced, otherwise the reason it stopped. It may be called with
    /// no input left and still make progress from state buffered earlier.
    fn decode<W: Window>(
        &mut self,
        window: &mut W,
        input: &[u8],
        in_pos: &mut usize,
    ) -> Result<DecompressStatus>;

    /// Dictionary size this decoder needs from the window.
    fn dict_size(&self) -> usize;

    /// Estimated memory usage for `options`, `None` if unbounded or unknown.
    fn memory_usage(options: &LzmaOptions) -> Option<u64>;
}
