//! # OxiLHA Header
//!
//! Decoding and encoding of LZH/LHA entry headers.
//!
//! LZH archives store each entry behind a header in one of four layouts:
//!
//! - **Level 0**: MS-DOS style header with the full path in a 1-byte-length
//!   name field and an optional old style UNIX trailer
//! - **Level 1**: level 0 layout with the basename only, followed by a chain
//!   of extended headers counted in the packed size
//! - **Level 2**: 16-bit header size, Unix timestamp and a header CRC
//! - **Level 3**: level 2 with 32-bit size fields
//!
//! Headers of every level can be decoded. Levels 0, 1 and 2 can be encoded.
//! Payload compression is out of scope; the decoded header tells the caller
//! where the payload starts and how large it is.
//!
//! ## Example
//!
//! ```rust
//! use oxilha_header::{LhaHeader, method};
//!
//! let mut header = LhaHeader::new(b"docs\xffreadme.txt".to_vec(), method::LH5);
//! header.packed_size = 42;
//! header.original_size = 100;
//!
//! let bytes = header.encode().unwrap();
//! let decoded = LhaHeader::decode(&bytes).unwrap().unwrap();
//!
//! assert_eq!(decoded.display_name(), "docs/readme.txt");
//! assert_eq!(decoded.data_offset, bytes.len());
//! assert!(decoded.validation.is_valid());
//!
//! // a zero byte marks the end of the archive
//! assert!(LhaHeader::decode(&[0]).unwrap().is_none());
//! ```
//!
//! ## Integrity checks
//!
//! Checksum and header CRC mismatches do not abort decoding. They are
//! reported in [`LhaHeader::validation`] and logged at `warn` level.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod encode;
pub mod extended;
pub mod header;
pub mod name;
pub mod options;

// Re-exports
pub use decode::decode_header;
pub use encode::encode_header;
pub use extended::{ext, parse_extended_headers};
pub use header::{Check, HeaderValidation, LhaHeader, method, os, unix};
pub use options::{DecodeOptions, EncodeOptions};
pub use oxilha_core::{LhaError, Result};
