//! LZMA2 chunk decoder.
//!
//! LZMA2 is a container format around LZMA that provides:
//! - Support for uncompressible chunks (stored as-is)
//! - Dictionary/state reset capability
//! - Chunk-based format for better streaming
//!
//! ## Chunk Format
//!
//! ```text
//! uncompressed: control(0x01|0x02) size_hi size_lo data[size]
//! lzma:         control(0x80..)    usize_hi usize_lo csize_hi csize_lo [props] data[csize]
//! ```
//!
//! Both size fields store the value minus one, big-endian. For LZMA chunks
//! the control byte carries bits 16-20 of the uncompressed size.
//!
//! [`Lzma2Decoder`] parses the framing one byte at a time and can be resumed
//! after any byte, so callers may split the input however they like. It
//! never decodes LZMA payload itself; that is the job of the
//! [`EntropyDecoder`] it owns.

use crate::control::{Control, ResetClass};
use crate::entropy::EntropyDecoder;
use crate::options::{LzmaOptions, LzmaProperties};
use oxiarc_core::error::{OxiArcError, Result};
use oxiarc_core::traits::DecompressStatus;
use oxiarc_core::window::Window;
use std::mem;
use tracing::{debug, trace};

/// Position of the decoder within a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Expecting a control byte.
    Control,
    /// Expecting bits 8-15 of the uncompressed size.
    UncompressedSizeHigh,
    /// Expecting bits 0-7 of the uncompressed size.
    UncompressedSizeLow,
    /// Expecting bits 8-15 of the compressed size.
    CompressedSizeHigh,
    /// Expecting bits 0-7 of the compressed size.
    CompressedSizeLow,
    /// Expecting the lc/lp/pb byte.
    Properties,
    /// Inside the payload of an LZMA chunk.
    LzmaPayload,
    /// Inside the payload of an uncompressed chunk.
    CopyPayload,
}

/// LZMA2 chunk decoder.
#[derive(Debug)]
pub struct Lzma2Decoder<D: EntropyDecoder> {
    /// Entropy decoder. Declared first so it is dropped before the rest.
    lzma: D,
    /// Current state.
    sequence: Sequence,
    /// State to enter once the size fields are read.
    next_sequence: Sequence,
    /// Uncompressed size of the current LZMA chunk.
    uncompressed_size: usize,
    /// Input bytes left in the current chunk. For uncompressed chunks this
    /// is also the number of bytes left to copy.
    compressed_size: usize,
    /// True until the first chunk with new properties.
    need_properties: bool,
    /// True until the first dictionary reset.
    need_dictionary_reset: bool,
    /// Options for the entropy decoder, reused until new properties arrive.
    options: LzmaOptions,
    /// Input bytes consumed since the stream started.
    total_in: u64,
}

impl<D: EntropyDecoder> Lzma2Decoder<D> {
    /// Create a decoder and its entropy decoder from `options`.
    pub fn new(options: &LzmaOptions) -> Result<Self> {
        let lzma = D::new(options)?;

        Ok(Self {
            lzma,
            sequence: Sequence::Control,
            next_sequence: Sequence::Control,
            uncompressed_size: 0,
            compressed_size: 0,
            need_properties: true,
            need_dictionary_reset: true,
            options: options.clone(),
            total_in: 0,
        })
    }

    /// Prepare for a new stream, reusing the entropy decoder.
    pub fn reinit(&mut self, options: &LzmaOptions) {
        self.lzma.reset(options);
        self.options = options.clone();
        self.sequence = Sequence::Control;
        self.next_sequence = Sequence::Control;
        self.uncompressed_size = 0;
        self.compressed_size = 0;
        self.need_properties = true;
        self.need_dictionary_reset = true;
        self.total_in = 0;
    }

    /// Dictionary size required by the entropy decoder.
    pub fn dict_size(&self) -> usize {
        self.lzma.dict_size()
    }

    /// Estimated memory usage of a decoder for `options`.
    ///
    /// Returns `None` if the entropy decoder cannot bound its usage.
    pub fn memory_usage(options: &LzmaOptions) -> Option<u64> {
        let inner = D::memory_usage(options)?;
        let overhead = mem::size_of::<Self>() - mem::size_of::<D>();
        inner.checked_add(overhead as u64)
    }

    /// Current state.
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Whether a properties-bearing chunk is still required.
    pub fn need_properties(&self) -> bool {
        self.need_properties
    }

    /// Whether a dictionary reset is still required.
    pub fn need_dictionary_reset(&self) -> bool {
        self.need_dictionary_reset
    }

    /// Options the next chunk without new properties will use.
    pub fn options(&self) -> &LzmaOptions {
        &self.options
    }

    /// Input bytes consumed since the stream started.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// The entropy decoder.
    pub fn entropy(&self) -> &D {
        &self.lzma
    }

    /// Decode chunks from `input[*in_pos..]`.
    ///
    /// Returns [`DecompressStatus::Done`] after the end-of-stream byte,
    /// otherwise the reason decoding stopped. Running out of input is not
    /// an error; call again with more input to resume.
    pub fn decode<W: Window>(
        &mut self,
        window: &mut W,
        input: &[u8],
        in_pos: &mut usize,
    ) -> Result<DecompressStatus> {
        if *in_pos > input.len() {
            return Err(OxiArcError::internal(format!(
                "input position {} is beyond input length {}",
                *in_pos,
                input.len()
            )));
        }

        // Only the LZMA payload can make progress without new input.
        while *in_pos < input.len() || self.sequence == Sequence::LzmaPayload {
            match self.sequence {
                Sequence::Control => {
                    let offset = self.total_in;
                    let byte = self.read_byte(input, in_pos);
                    let control = Control::parse(byte, offset)
                        .inspect_err(|err| debug!("LZMA2 control byte rejected: {}", err))?;

                    match control {
                        Control::EndOfStream => {
                            trace!("LZMA2 end of stream at offset {}", offset);
                            return Ok(DecompressStatus::Done);
                        }
                        Control::Uncompressed { reset_dict } => {
                            if reset_dict {
                                window.reset();
                                self.need_dictionary_reset = false;
                            } else if self.need_dictionary_reset {
                                return Err(Self::format_error(
                                    offset,
                                    "uncompressed chunk before the first dictionary reset",
                                ));
                            }

                            trace!(
                                "LZMA2 uncompressed chunk at offset {} (reset_dict={})",
                                offset, reset_dict
                            );
                            self.sequence = Sequence::CompressedSizeHigh;
                            self.next_sequence = Sequence::CopyPayload;
                        }
                        Control::Lzma { reset, size_high } => {
                            trace!("LZMA2 LZMA chunk at offset {} ({:?})", offset, reset);
                            self.uncompressed_size = usize::from(size_high) << 16;
                            self.next_sequence = self.begin_lzma_chunk(reset, window, offset)?;
                            self.sequence = Sequence::UncompressedSizeHigh;
                        }
                    }
                }

                Sequence::UncompressedSizeHigh => {
                    let byte = self.read_byte(input, in_pos);
                    self.uncompressed_size += usize::from(byte) << 8;
                    self.sequence = Sequence::UncompressedSizeLow;
                }

                Sequence::UncompressedSizeLow => {
                    let byte = self.read_byte(input, in_pos);
                    self.uncompressed_size += usize::from(byte) + 1;
                    self.lzma.set_uncompressed(self.uncompressed_size);
                    self.sequence = Sequence::CompressedSizeHigh;
                }

                Sequence::CompressedSizeHigh => {
                    let byte = self.read_byte(input, in_pos);
                    self.compressed_size = usize::from(byte) << 8;
                    self.sequence = Sequence::CompressedSizeLow;
                }

                Sequence::CompressedSizeLow => {
                    let byte = self.read_byte(input, in_pos);
                    self.compressed_size += usize::from(byte) + 1;
                    self.sequence = self.next_sequence;
                    trace!(
                        "LZMA2 chunk sizes: compressed={} uncompressed={}",
                        self.compressed_size, self.uncompressed_size
                    );
                }

                Sequence::Properties => {
                    let offset = self.total_in;
                    let byte = self.read_byte(input, in_pos);
                    let props = LzmaProperties::decode_lzma2_byte(byte)
                        .map_err(|err| Self::format_error(offset, err.to_string()))?;

                    self.options.props = props;
                    self.lzma.reset(&self.options);
                    self.sequence = Sequence::LzmaPayload;
                }

                Sequence::LzmaPayload => {
                    let in_start = *in_pos;
                    let status = self.lzma.decode(window, input, in_pos)?;

                    if *in_pos < in_start || *in_pos > input.len() {
                        return Err(OxiArcError::internal(format!(
                            "entropy decoder moved input position from {} to {} (length {})",
                            in_start,
                            *in_pos,
                            input.len()
                        )));
                    }

                    let in_used = *in_pos - in_start;
                    self.total_in += in_used as u64;
                    if in_used > self.compressed_size {
                        return Err(Self::format_error(
                            self.total_in,
                            "LZMA chunk used more input than its compressed size",
                        ));
                    }
                    self.compressed_size -= in_used;

                    if status != DecompressStatus::Done {
                        return Ok(status);
                    }

                    // The uncompressed size is checked by the entropy decoder.
                    if self.compressed_size != 0 {
                        return Err(Self::format_error(
                            self.total_in,
                            format!(
                                "LZMA chunk ended with {} compressed bytes unused",
                                self.compressed_size
                            ),
                        ));
                    }

                    self.sequence = Sequence::Control;
                }

                Sequence::CopyPayload => {
                    let count = (input.len() - *in_pos)
                        .min(self.compressed_size)
                        .min(window.available());
                    let copied = window.write_raw(&input[*in_pos..*in_pos + count]);
                    if copied > count {
                        return Err(OxiArcError::internal(format!(
                            "window accepted {} bytes, only {} were offered",
                            copied, count
                        )));
                    }

                    *in_pos += copied;
                    self.total_in += copied as u64;
                    self.compressed_size -= copied;

                    if self.compressed_size != 0 {
                        return Ok(if window.available() == 0 {
                            DecompressStatus::NeedsOutput
                        } else {
                            DecompressStatus::NeedsInput
                        });
                    }

                    self.sequence = Sequence::Control;
                }
            }
        }

        Ok(DecompressStatus::NeedsInput)
    }

    /// Apply the resets of an LZMA chunk and pick the state after its sizes.
    fn begin_lzma_chunk<W: Window>(
        &mut self,
        reset: ResetClass,
        window: &mut W,
        offset: u64,
    ) -> Result<Sequence> {
        match reset {
            ResetClass::All => {
                window.reset();
                self.need_dictionary_reset = false;
                self.need_properties = false;
            }
            ResetClass::StateAndProperties => {
                if self.need_dictionary_reset {
                    return Err(Self::format_error(
                        offset,
                        "LZMA chunk before the first dictionary reset",
                    ));
                }
                self.need_properties = false;
            }
            ResetClass::State => {
                if self.need_properties {
                    return Err(Self::format_error(
                        offset,
                        "LZMA state reset before any properties were set",
                    ));
                }
                self.lzma.reset(&self.options);
            }
            ResetClass::None => {
                if self.need_properties {
                    return Err(Self::format_error(
                        offset,
                        "LZMA chunk before any properties were set",
                    ));
                }
            }
        }

        // The entropy decoder is reset once the new properties are read.
        Ok(if reset.has_properties() {
            Sequence::Properties
        } else {
            Sequence::LzmaPayload
        })
    }

    fn read_byte(&mut self, input: &[u8], in_pos: &mut usize) -> u8 {
        let byte = input[*in_pos];
        *in_pos += 1;
        self.total_in += 1;
        byte
    }

    fn format_error(offset: u64, message: impl Into<String>) -> OxiArcError {
        let err = OxiArcError::corrupted(offset, message);
        debug!("LZMA2 stream rejected: {}", err);
        err
    }
}
