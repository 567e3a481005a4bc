//! Decoder and encoder configuration

/// Default maximum nesting depth for objects/arrays
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Largest byte length that fits the short string form
pub const SHORT_STRING_MAX: usize = 0xFFFF;

/// Default budget of values a decoder may copy out of its reference table
pub const DEFAULT_MAX_REFERENCE_EXPANSION: usize = 1_000_000;

/// Default initial capacity of the encoder's output buffer
pub const DEFAULT_ENCODER_CAPACITY: usize = 256;

/// Decoder options
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum nesting depth (prevents stack overflow on hostile input)
    pub max_depth: usize,

    /// Consume a `0x00 0x00 0x09` sequence directly following the declared
    /// pairs of an ECMA array. Standard AMF0 producers emit it; the
    /// count-driven format read by default does not.
    pub skip_ecma_array_end_marker: bool,

    /// Total number of values a decoder may materialize by resolving
    /// references over its lifetime. Each resolution copies the referenced
    /// tree, so chained references can grow output exponentially in the
    /// input size.
    pub max_reference_expansion: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            skip_ecma_array_end_marker: false,
            max_reference_expansion: DEFAULT_MAX_REFERENCE_EXPANSION,
        }
    }
}

impl DecoderConfig {
    /// Options for reading ECMA arrays written by standard AMF0 producers
    pub fn interop() -> Self {
        Self {
            skip_ecma_array_end_marker: true,
            ..Self::default()
        }
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the reference expansion budget
    pub fn max_reference_expansion(mut self, nodes: usize) -> Self {
        self.max_reference_expansion = nodes;
        self
    }
}

/// Encoder options
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Initial output buffer capacity
    pub initial_capacity: usize,

    /// Maximum nesting depth
    pub max_depth: usize,

    /// Append `0x00 0x00 0x09` after the pairs of every ECMA array
    pub ecma_array_end_marker: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_ENCODER_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            ecma_array_end_marker: false,
        }
    }
}

impl EncoderConfig {
    /// Options for producing ECMA arrays readable by standard AMF0 consumers
    pub fn interop() -> Self {
        Self {
            ecma_array_end_marker: true,
            ..Self::default()
        }
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
