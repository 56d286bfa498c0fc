//! # OxiLHA Core
//!
//! Core components for the OxiLHA header codec.
//!
//! This crate provides the leaf building blocks that the level decoders and
//! encoders in `oxilha-header` are made of:
//!
//! - [`crc`]: CRC-16/ARC table and the header byte-sum
//! - [`cursor`]: bounded little-endian byte cursors
//! - [`timestamp`]: generic (MS-DOS), Unix and Windows FILETIME conversions
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ oxilha-header                                           │
//! │     header reader, level 0-3 decoders, level 0-2        │
//! │     encoders, extended header chain                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ oxilha-core (this crate)                                │
//! │     CRC-16, byte cursors, timestamp codec, errors       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxilha_core::crc::Crc16;
//! use oxilha_core::timestamp::{generic_to_unix, unix_to_generic};
//!
//! // Compute CRC-16/ARC
//! assert_eq!(Crc16::compute(b"123456789"), 0xBB3D);
//!
//! // Generic stamps have 2-second resolution
//! let stamp = unix_to_generic(1_705_321_801, 0);
//! assert_eq!(generic_to_unix(stamp, 0), 1_705_321_800);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod cursor;
pub mod error;
pub mod timestamp;

// Re-exports for convenience
pub use crc::{Crc16, calc_crc, calc_sum};
pub use cursor::{ByteReader, ByteWriter, SourceCursor};
pub use error::{LhaError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::crc::Crc16;
    pub use crate::cursor::{ByteReader, ByteWriter, SourceCursor};
    pub use crate::error::{LhaError, Result};
}
