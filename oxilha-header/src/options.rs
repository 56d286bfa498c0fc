//! Decoder and encoder configuration.

use oxilha_core::timestamp::{
    generic_to_unix, generic_to_unix_local, unix_to_generic, unix_to_generic_local,
};

/// Default scratch capacity; the largest header the codec accepts.
pub const LZHEADER_STORAGE: usize = 4096;

/// Header decoding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest base header or extension record accepted, in bytes.
    pub scratch_capacity: usize,
    /// Fixed offset of generic timestamps from UTC, in seconds east.
    /// `None` reads them in the host's local zone.
    pub utc_offset: Option<i32>,
}

impl DecodeOptions {
    /// Standard configuration: 4096-byte scratch, generic stamps in local time.
    pub const STANDARD: Self = Self {
        scratch_capacity: LZHEADER_STORAGE,
        utc_offset: None,
    };

    /// Create the standard configuration.
    pub fn new() -> Self {
        Self::STANDARD
    }

    /// Set the scratch capacity.
    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    /// Read generic timestamps in a fixed offset instead of local time.
    pub fn with_utc_offset(mut self, seconds: i32) -> Self {
        self.utc_offset = Some(seconds);
        self
    }

    /// Generic stamp to Unix seconds under this configuration.
    pub fn generic_to_unix(&self, stamp: u32) -> i64 {
        match self.utc_offset {
            Some(offset) => generic_to_unix(stamp, offset),
            None => generic_to_unix_local(stamp),
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Header encoding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Omit UNIX extension records and trailers, and write OS id 0.
    pub generic_format: bool,
    /// Fixed offset of generic timestamps from UTC, in seconds east.
    /// `None` writes them in the host's local zone.
    pub utc_offset: Option<i32>,
    /// Largest header the encoder will produce, in bytes.
    pub scratch_capacity: usize,
}

impl EncodeOptions {
    /// UNIX flavoured headers with ownership and permission records.
    pub const UNIX: Self = Self {
        generic_format: false,
        utc_offset: None,
        scratch_capacity: LZHEADER_STORAGE,
    };

    /// Generic headers readable by non-UNIX tools.
    pub const GENERIC: Self = Self {
        generic_format: true,
        utc_offset: None,
        scratch_capacity: LZHEADER_STORAGE,
    };

    /// Create the UNIX configuration.
    pub fn new() -> Self {
        Self::UNIX
    }

    /// Select generic or UNIX output.
    pub fn with_generic_format(mut self, generic: bool) -> Self {
        self.generic_format = generic;
        self
    }

    /// Write generic timestamps in a fixed offset instead of local time.
    pub fn with_utc_offset(mut self, seconds: i32) -> Self {
        self.utc_offset = Some(seconds);
        self
    }

    /// Unix seconds to a generic stamp under this configuration.
    pub fn unix_to_generic(&self, t: i64) -> u32 {
        match self.utc_offset {
            Some(offset) => unix_to_generic(t, offset),
            None => unix_to_generic_local(t),
        }
    }

    /// Set the largest header size produced.
    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::UNIX
    }
}
