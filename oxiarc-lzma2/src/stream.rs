//! Buffer-to-buffer LZMA2 decompression.
//!
//! [`Lzma2Stream`] pairs an [`Lzma2Decoder`] with a [`SlidingWindow`] and
//! exposes them through the [`Decompressor`] trait: the caller passes input
//! and output slices and gets back how much of each was used.

use crate::decoder::Lzma2Decoder;
use crate::entropy::EntropyDecoder;
use crate::options::LzmaOptions;
use crate::properties::decode_properties;
use oxiarc_core::error::Result;
use oxiarc_core::traits::{DecompressStatus, Decompressor};
use oxiarc_core::window::SlidingWindow;

/// Smallest window allocated for a stream.
pub const DICT_SIZE_MIN: usize = 4096;

/// LZMA2 decompressor with its own window.
#[derive(Debug)]
pub struct Lzma2Stream<D: EntropyDecoder> {
    /// Chunk decoder.
    decoder: Lzma2Decoder<D>,
    /// History and pending output.
    window: SlidingWindow,
    /// Options the stream was created with, used again on reset.
    options: LzmaOptions,
    /// Whether the end-of-stream byte has been seen.
    finished: bool,
}

impl<D: EntropyDecoder> Lzma2Stream<D> {
    /// Create a stream decoder for `options`.
    pub fn new(options: LzmaOptions) -> Result<Self> {
        let decoder = Lzma2Decoder::new(&options)?;
        let window = SlidingWindow::new(decoder.dict_size().max(DICT_SIZE_MIN))?;

        Ok(Self {
            decoder,
            window,
            options,
            finished: false,
        })
    }

    /// Create a stream decoder from the LZMA2 properties byte.
    pub fn from_properties(props: u8) -> Result<Self> {
        Self::new(decode_properties(props)?)
    }

    /// The chunk decoder.
    pub fn decoder(&self) -> &Lzma2Decoder<D> {
        &self.decoder
    }

    /// The window.
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }
}

impl<D: EntropyDecoder> Decompressor for Lzma2Stream<D> {
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        if self.finished {
            return Ok((0, 0, DecompressStatus::Done));
        }

        // Bytes left over from a call that ran out of output go first.
        let mut produced = self.window.drain_into(output);
        let mut in_pos = 0;

        loop {
            self.window.set_limit(output.len() - produced);
            let status = self.decoder.decode(&mut self.window, input, &mut in_pos)?;
            let drained = self.window.drain_into(&mut output[produced..]);
            produced += drained;

            match status {
                DecompressStatus::Done => {
                    self.finished = true;
                    return Ok((in_pos, produced, status));
                }
                // The window reached the end of its buffer and wrapped.
                DecompressStatus::NeedsOutput if drained > 0 && produced < output.len() => continue,
                _ => return Ok((in_pos, produced, status)),
            }
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.decoder.reinit(&self.options);
        self.window.clear();
        self.finished = false;
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Decode a complete LZMA2 payload.
pub fn decode_lzma2<D: EntropyDecoder>(data: &[u8], dict_size: u32) -> Result<Vec<u8>> {
    let mut stream = Lzma2Stream::<D>::new(LzmaOptions::new(dict_size))?;
    stream.decompress_all(data)
}
