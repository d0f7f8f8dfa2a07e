//! Shared helpers for the LZMA2 integration tests.

use oxiarc_core::error::Result;
use oxiarc_core::traits::DecompressStatus;
use oxiarc_core::window::Window;
use oxiarc_lzma2::{Control, EntropyDecoder, LzmaOptions, LzmaProperties, ResetClass};
use std::collections::VecDeque;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; `RUST_LOG=trace` shows chunk headers.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Entropy decoder whose "compressed" payload is the plain bytes.
///
/// It takes input as soon as it is offered, even when the window is full,
/// and flushes the backlog on later calls. That mirrors a real LZMA decoder
/// finishing a match without needing more input.
#[derive(Debug)]
pub struct StoredLzma {
    pub options: LzmaOptions,
    pub resets: usize,
    target: usize,
    produced: usize,
    backlog: VecDeque<u8>,
}

impl EntropyDecoder for StoredLzma {
    fn new(options: &LzmaOptions) -> Result<Self> {
        Ok(Self {
            options: options.clone(),
            resets: 0,
            target: 0,
            produced: 0,
            backlog: VecDeque::new(),
        })
    }

    fn reset(&mut self, options: &LzmaOptions) {
        self.options = options.clone();
        self.resets += 1;
        self.backlog.clear();
    }

    fn set_uncompressed(&mut self, size: usize) {
        self.target = size;
        self.produced = 0;
    }

    fn decode<W: Window>(
        &mut self,
        window: &mut W,
        input: &[u8],
        in_pos: &mut usize,
    ) -> Result<DecompressStatus> {
        let wanted = self.target - self.produced - self.backlog.len();
        let take = wanted.min(input.len() - *in_pos);
        self.backlog.extend(&input[*in_pos..*in_pos + take]);
        *in_pos += take;

        while let Some(&byte) = self.backlog.front() {
            if !window.put_byte(byte) {
                break;
            }
            self.backlog.pop_front();
            self.produced += 1;
        }

        Ok(if self.produced == self.target {
            DecompressStatus::Done
        } else if !self.backlog.is_empty() {
            DecompressStatus::NeedsOutput
        } else {
            DecompressStatus::NeedsInput
        })
    }

    fn dict_size(&self) -> usize {
        self.options.dict_size as usize
    }

    fn memory_usage(options: &LzmaOptions) -> Option<u64> {
        Some(u64::from(options.dict_size))
    }
}

/// Builds LZMA2 streams for [`StoredLzma`].
#[derive(Debug, Default)]
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an uncompressed chunk (1..=65536 bytes).
    pub fn uncompressed(mut self, data: &[u8], reset_dict: bool) -> Self {
        let control = Control::Uncompressed { reset_dict };
        self.bytes.push(control.to_byte());
        self.bytes
            .extend_from_slice(&((data.len() - 1) as u16).to_be_bytes());
        self.bytes.extend_from_slice(data);
        self
    }

    /// Append an LZMA chunk whose payload is `data` as-is.
    ///
    /// `props` must be given exactly when `reset` carries properties.
    pub fn lzma(mut self, data: &[u8], reset: ResetClass, props: Option<LzmaProperties>) -> Self {
        let size = data.len() - 1;
        let control = Control::Lzma {
            reset,
            size_high: (size >> 16) as u8,
        };
        self.bytes.push(control.to_byte());
        self.bytes
            .extend_from_slice(&((size & 0xFFFF) as u16).to_be_bytes());
        self.bytes
            .extend_from_slice(&((data.len() - 1) as u16).to_be_bytes());
        if let Some(props) = props {
            self.bytes.push(props.to_byte());
        }
        self.bytes.extend_from_slice(data);
        self
    }

    /// Append raw bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Append the end marker and return the stream.
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.push(Control::EndOfStream.to_byte());
        self.bytes
    }

    /// Return the stream without an end marker.
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Deterministic test data.
pub fn pattern(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 33) as u8
        })
        .collect()
}

/// Linear congruential generator for slice lengths.
pub struct Lcg(pub u64);

impl Lcg {
    /// Next value in `1..=max`.
    pub fn next_len(&mut self, max: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize % max + 1
    }
}
