//! Extended header chain.
//!
//! ```text
//!             size  field name
//!  --------------------------------
//!  base header:         :
//!           2 or 4  next-header size  [*1]
//!  --------------------------------------
//!  ext header:   1  ext-type            ^
//!                ?  contents            | [*1] next-header size
//!           2 or 4  next-header size    v
//!  --------------------------------------
//! ```
//!
//! Size fields are 2 bytes wide on level 1 and 2 headers and 4 bytes wide on
//! level 3 headers. A size of zero ends the chain.

use crate::header::{LhaHeader, MAX_NAME_LENGTH, MAX_OWNER_LENGTH};
use crate::name;
use log::{debug, warn};
use oxilha_core::cursor::{ByteReader, SourceCursor};
use oxilha_core::error::{LhaError, Result};
use oxilha_core::timestamp::filetime_to_unix;
use oxilha_core::Crc16;

/// Extension record types.
pub mod ext {
    /// Header CRC (CRC-16).
    pub const HEADER_CRC: u8 = 0x00;
    /// File name.
    pub const FILENAME: u8 = 0x01;
    /// Directory name.
    pub const DIRECTORY: u8 = 0x02;
    /// MS-DOS attribute.
    pub const DOS_ATTRIBUTE: u8 = 0x40;
    /// Windows FILETIME create, modify and access times.
    pub const WINDOWS_TIMESTAMP: u8 = 0x41;
    /// UNIX permission bits.
    pub const UNIX_PERMISSION: u8 = 0x50;
    /// UNIX gid and uid.
    pub const UNIX_GID_UID: u8 = 0x51;
    /// UNIX group name.
    pub const UNIX_GROUP: u8 = 0x52;
    /// UNIX user name.
    pub const UNIX_USER: u8 = 0x53;
    /// UNIX last modified time.
    pub const UNIX_MTIME: u8 = 0x54;
}

/// Parse the extended header chain starting with a record of `record_size`
/// bytes.
///
/// Each record is copied out of `src`, merged into `header` and, when `hcrc`
/// is given, folded into the running header CRC with the CRC field of a type 0
/// record read as zero. Unknown record types are skipped.
///
/// Returns the number of chain bytes consumed: `record_size` plus every
/// following size field.
pub fn parse_extended_headers(
    src: &mut SourceCursor<'_>,
    header: &mut LhaHeader,
    mut record_size: usize,
    mut hcrc: Option<&mut Crc16>,
    capacity: usize,
) -> Result<usize> {
    let field = header.size_field_length as usize;
    if record_size > 0 && field != 2 && field != 4 {
        return Err(LhaError::invalid_header(format!(
            "size field length must be 2 or 4, got {}",
            field
        )));
    }
    let framing = 1 + field;

    let mut whole_size = record_size;
    let mut dirname: Vec<u8> = Vec::new();

    while record_size > 0 {
        if record_size > capacity {
            return Err(LhaError::header_too_large(record_size, capacity));
        }
        if record_size < framing {
            return Err(LhaError::invalid_header(format!(
                "extended header of {} bytes is shorter than its framing",
                record_size
            )));
        }

        let mut record = src.take(record_size)?.to_vec();
        let ext_type = record[0];
        let body_len = record_size - framing;
        let mut body = ByteReader::new(&record[1..1 + body_len]);

        match ext_type {
            ext::HEADER_CRC => {
                header.header_crc = Some(body.read_u16()?);
            }
            ext::FILENAME => {
                let bytes = body.read_bounded(body_len, MAX_NAME_LENGTH)?;
                header.name = name::trim_at_nul(&bytes).to_vec();
            }
            ext::DIRECTORY => {
                let bytes = body.read_bounded(body_len, MAX_NAME_LENGTH)?;
                dirname = name::trim_at_nul(&bytes).to_vec();
            }
            ext::DOS_ATTRIBUTE => {
                header.attribute = body.read_u16()? as u8;
            }
            ext::WINDOWS_TIMESTAMP => {
                // create time is ignored
                body.skip(8)?;
                if header.header_level >= 2 {
                    // base header already carries a Unix time
                    body.skip(8)?;
                } else {
                    header.unix_last_modified_stamp = filetime_to_unix(body.read_u64()?);
                }
                // last access time is ignored
                body.skip(8)?;
            }
            ext::UNIX_PERMISSION => {
                header.unix_mode = body.read_u16()?;
            }
            ext::UNIX_GID_UID => {
                header.unix_gid = body.read_u16()?;
                header.unix_uid = body.read_u16()?;
            }
            ext::UNIX_GROUP => {
                let bytes = body.read_bounded(body_len, MAX_OWNER_LENGTH)?;
                header.group = name::trim_at_nul(&bytes).to_vec();
            }
            ext::UNIX_USER => {
                let bytes = body.read_bounded(body_len, MAX_OWNER_LENGTH)?;
                header.user = name::trim_at_nul(&bytes).to_vec();
            }
            ext::UNIX_MTIME => {
                header.unix_last_modified_stamp = body.read_u32()? as i64;
            }
            other => {
                debug!(
                    "skipping extended header type {:#04x} ({} bytes)",
                    other, record_size
                );
            }
        }

        if ext_type == ext::HEADER_CRC {
            record[1] = 0;
            record[2] = 0;
        }
        if let Some(crc) = hcrc.as_deref_mut() {
            crc.update(&record);
        }

        let mut next = ByteReader::at(&record, record_size - field);
        record_size = if field == 2 {
            next.read_u16()? as usize
        } else {
            next.read_u32()? as usize
        };
        whole_size += record_size;
    }

    if !dirname.is_empty() {
        if dirname.len() + header.name.len() > MAX_NAME_LENGTH {
            warn!(
                "directory name truncated: {} + {} bytes exceeds {}",
                dirname.len(),
                header.name.len(),
                MAX_NAME_LENGTH
            );
        }
        header.name = name::join_dir_name(&dirname, &header.name, MAX_NAME_LENGTH);
    }

    Ok(whole_size)
}
