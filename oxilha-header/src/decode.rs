//! Header decoding for levels 0, 1, 2 and 3.
//!
//! Every level starts with the same 21 bytes, the last of which is the
//! header level:
//!
//! ```text
//! offset  size  field name
//! ------------------------------------------
//!      0     1  header size / size field length (level 3)
//!      1     1  header sum (level 0/1)
//!      2     5  method ID
//!      7     4  packed size
//!     11     4  original size
//!     15     4  time stamp
//!     19     1  attribute
//!     20     1  level
//! ------------------------------------------
//! ```
//!
//! The bytes of the base header are copied into a scratch buffer as they are
//! consumed so that checksums can be computed over exactly those bytes.

use crate::extended::parse_extended_headers;
use crate::header::{
    COMMON_HEADER_SIZE, Check, I_GENERIC_HEADER_SIZE, I_HEADER_LEVEL, I_LEVEL1_HEADER_SIZE,
    I_LEVEL2_HEADER_SIZE, I_LEVEL3_HEADER_SIZE, LhaHeader, MAX_NAME_LENGTH, os,
};
use crate::name;
use crate::options::DecodeOptions;
use log::{debug, warn};
use oxilha_core::crc::{Crc16, calc_sum};
use oxilha_core::cursor::{ByteReader, SourceCursor};
use oxilha_core::error::{LhaError, Result};

/// Decode the entry header at the start of `src`.
///
/// Returns `Ok(None)` when the first byte is the end-of-archive marker 0.
/// On success the header's `data_offset` is the number of bytes consumed
/// from `src`, where the payload begins.
pub fn decode_header(src: &[u8], options: &DecodeOptions) -> Result<Option<LhaHeader>> {
    let mut cursor = SourceCursor::new(src);

    let end_mark = cursor.read_u8()?;
    if end_mark == 0 {
        return Ok(None);
    }

    if options.scratch_capacity < COMMON_HEADER_SIZE {
        return Err(LhaError::header_too_large(
            COMMON_HEADER_SIZE,
            options.scratch_capacity,
        ));
    }

    let mut scratch = Vec::with_capacity(options.scratch_capacity);
    scratch.push(end_mark);
    scratch.extend_from_slice(cursor.take(COMMON_HEADER_SIZE - 1)?);

    let mut header = LhaHeader::blank();
    match scratch[I_HEADER_LEVEL] {
        0 => decode_level0(&mut cursor, scratch, &mut header, options)?,
        1 => decode_level1(&mut cursor, scratch, &mut header, options)?,
        2 => decode_level2(&mut cursor, scratch, &mut header, options)?,
        3 => decode_level3(&mut cursor, scratch, &mut header, options)?,
        level => return Err(LhaError::unknown_level(level)),
    }

    header.data_offset = cursor.position();

    debug!(
        "level {} header '{}' {}: {} -> {} bytes, data at {}",
        header.header_level,
        header.display_name(),
        header.method_str(),
        header.original_size,
        header.packed_size,
        header.data_offset
    );

    Ok(Some(header))
}

impl LhaHeader {
    /// Decode a header with the standard options.
    pub fn decode(src: &[u8]) -> Result<Option<Self>> {
        decode_header(src, &DecodeOptions::STANDARD)
    }
}

/// Copy the rest of a level 0/1 base header into scratch and check its sum.
fn fill_summed_base(
    src: &mut SourceCursor<'_>,
    scratch: &mut Vec<u8>,
    header: &mut LhaHeader,
    options: &DecodeOptions,
) -> Result<()> {
    let header_size = scratch[0] as usize;
    let checksum = scratch[1];
    let total = header_size + 2;

    if total > options.scratch_capacity {
        return Err(LhaError::header_too_large(total, options.scratch_capacity));
    }
    // room for the name length byte
    if total < COMMON_HEADER_SIZE + 1 {
        return Err(LhaError::invalid_header(format!(
            "header size {} is smaller than the base header",
            header_size
        )));
    }

    scratch.extend_from_slice(src.take(total - COMMON_HEADER_SIZE)?);

    header.size_field_length = 2;
    header.header_size = header_size;

    let computed = calc_sum(&scratch[2..]);
    header.validation.checksum = Check::compare(checksum as u16, computed as u16);
    if checksum != computed {
        warn!(
            "header checksum mismatch: declared {:#04x}, computed {:#04x}",
            checksum, computed
        );
    }
    Ok(())
}

/// Fields 2..21 shared by every level, leaving `reader` at offset 21.
fn read_common_fields(reader: &mut ByteReader<'_>, header: &mut LhaHeader) -> Result<u32> {
    header.method.copy_from_slice(reader.read_bytes(5)?);
    header.packed_size = reader.read_u32()? as u64;
    header.original_size = reader.read_u32()? as u64;
    let stamp = reader.read_u32()?;
    header.attribute = reader.read_u8()?;
    header.header_level = reader.read_u8()?;
    Ok(stamp)
}

/// Level 0 header.
///
/// ```text
/// offset   size  field name
/// ----------------------------------
///     0       1  header size    [*1]
///     1       1  header sum
///             ---------------------------------------
///     2       5  method ID                         ^
///     7       4  packed size    [*2]               |
///    11       4  original size                     |
///    15       2  time                              |
///    17       2  date                              |
///    19       1  attribute                         | [*1] header size (X+Y+22)
///    20       1  level (0x00 fixed)                |
///    21       1  name length                       |
///    22       X  pathname                          |
/// X +22       2  file crc (CRC-16)                 |
/// X +24       Y  ext-header(old style)             v
/// -------------------------------------------------
/// X+Y+24         data                              ^
///                  :                               | [*2] packed size
///                  :                               v
/// -------------------------------------------------
///
/// ext-header(old style)
///     0       1  ext-type ('U')
///     1       1  minor version
///     2       4  UNIX time
///     6       2  mode
///     8       2  uid
///    10       2  gid
/// ```
fn decode_level0(
    src: &mut SourceCursor<'_>,
    mut scratch: Vec<u8>,
    header: &mut LhaHeader,
    options: &DecodeOptions,
) -> Result<()> {
    fill_summed_base(src, &mut scratch, header, options)?;
    let total = scratch.len();

    let mut reader = ByteReader::at(&scratch, 2);
    let stamp = read_common_fields(&mut reader, header)?;
    header.unix_last_modified_stamp = options.generic_to_unix(stamp);

    let name_length = reader.read_u8()? as usize;
    let remainder = total as i64 - name_length as i64 - I_GENERIC_HEADER_SIZE as i64;
    if remainder < 0 && remainder != -2 {
        return Err(LhaError::malformed_remainder(remainder));
    }

    let raw_name = reader.read_bounded(name_length, MAX_NAME_LENGTH)?;
    header.name = name::trim_at_nul(&raw_name).to_vec();

    if remainder == -2 {
        // oldest variant without a CRC field
        header.extend_type = os::EXTEND_GENERIC;
        header.crc = None;
        return Ok(());
    }

    header.crc = Some(reader.read_u16()?);
    if remainder == 0 {
        return Ok(());
    }

    header.extend_type = reader.read_u8()?;
    let mut extend_size = remainder as usize - 1;

    if header.extend_type == os::EXTEND_UNIX {
        if extend_size >= 11 {
            header.minor_version = reader.read_u8()?;
            header.unix_last_modified_stamp = reader.read_u32()? as i64;
            header.unix_mode = reader.read_u16()?;
            header.unix_uid = reader.read_u16()?;
            header.unix_gid = reader.read_u16()?;
            extend_size -= 11;
        } else {
            header.extend_type = os::EXTEND_GENERIC;
        }
    }

    if extend_size > 0 {
        reader.skip(extend_size)?;
    }

    header.header_size += 2;
    Ok(())
}

/// Level 1 header.
///
/// ```text
/// offset   size  field name
/// -----------------------------------
///     0       1  header size   [*1]
///     1       1  header sum
///             -------------------------------------
///     2       5  method ID                        ^
///     7       4  skip size     [*2]               |
///    11       4  original size                    |
///    15       2  time                             |
///    17       2  date                             |
///    19       1  attribute (0x20 fixed)           | [*1] header size (X+Y+25)
///    20       1  level (0x01 fixed)               |
///    21       1  name length                      |
///    22       X  filename                         |
/// X+ 22       2  file crc (CRC-16)                |
/// X+ 24       1  OS ID                            |
/// X +25       Y  ???                              |
/// X+Y+25      2  next-header size                 v
/// -------------------------------------------------
/// X+Y+27      Z  ext-header                       ^
///                 :                               |
/// -----------------------------------             | [*2] skip size
/// X+Y+Z+27       data                             |
///                 :                               v
/// -------------------------------------------------
/// ```
fn decode_level1(
    src: &mut SourceCursor<'_>,
    mut scratch: Vec<u8>,
    header: &mut LhaHeader,
    options: &DecodeOptions,
) -> Result<()> {
    fill_summed_base(src, &mut scratch, header, options)?;
    let total = scratch.len();

    let mut reader = ByteReader::at(&scratch, 2);
    let stamp = read_common_fields(&mut reader, header)?;
    header.unix_last_modified_stamp = options.generic_to_unix(stamp);

    let name_length = reader.read_u8()? as usize;
    if total < name_length + I_LEVEL1_HEADER_SIZE {
        return Err(LhaError::invalid_header(format!(
            "level 1 base header of {} bytes cannot hold a {}-byte name",
            total, name_length
        )));
    }

    let raw_name = reader.read_bounded(name_length, MAX_NAME_LENGTH)?;
    header.name = name::trim_at_nul(&raw_name).to_vec();
    header.crc = Some(reader.read_u16()?);
    header.extend_type = reader.read_u8()?;

    // old style extend header
    let dummy = total - name_length - I_LEVEL1_HEADER_SIZE;
    if dummy > 0 {
        reader.skip(dummy)?;
    }

    // a type 0 record is stored but not verified at this level
    let extend_size = reader.read_u16()? as usize;
    let chain_size =
        parse_extended_headers(src, header, extend_size, None, options.scratch_capacity)?;

    // the skip size counts the extended headers, the header size does not
    header.packed_size = header
        .packed_size
        .checked_sub(chain_size as u64)
        .ok_or_else(|| {
            LhaError::invalid_header(format!(
                "skip size {} is smaller than the {}-byte extended header",
                header.packed_size, chain_size
            ))
        })?;
    header.header_size += chain_size + 2;

    Ok(())
}

/// Fold the padding after the chain into `hcrc` and compare the result with
/// the declared header CRC. A chain without a type 0 record declares 0.
fn finish_header_crc(
    src: &mut SourceCursor<'_>,
    header: &mut LhaHeader,
    mut hcrc: Crc16,
    prefix: usize,
    chain_size: usize,
) -> Result<()> {
    let padding = header
        .header_size
        .checked_sub(prefix + chain_size)
        .ok_or_else(|| {
            LhaError::invalid_header(format!(
                "header size {} is smaller than the {} bytes read",
                header.header_size,
                prefix + chain_size
            ))
        })?;
    hcrc.update(src.take(padding)?);

    let computed = hcrc.value();
    header.validation.header_crc = Check::compare(header.header_crc.unwrap_or(0), computed);
    if let Check::Mismatch { declared, computed } = header.validation.header_crc {
        warn!(
            "header CRC mismatch: declared {:#06x}, computed {:#06x}",
            declared, computed
        );
    }
    Ok(())
}

/// Level 2 header.
///
/// ```text
/// offset   size  field name
/// --------------------------------------------------
///     0       2  total header size [*1]           ^
///             -----------------------             |
///     2       5  method ID                        |
///     7       4  packed size       [*2]           |
///    11       4  original size                    |
///    15       4  time                             |
///    19       1  RESERVED (0x20 fixed)            | [*1] total header size
///    20       1  level (0x02 fixed)               |      (X+26+(1))
///    21       2  file crc (CRC-16)                |
///    23       1  OS ID                            |
///    24       2  next-header size                 |
/// -----------------------------------             |
///    26       X  ext-header                       |
///                 :                               |
/// -----------------------------------             |
/// X +26      (1) padding                          v
/// -------------------------------------------------
/// X +26+(1)      data                             ^
///                 :                               | [*2] packed size
///                 :                               v
/// -------------------------------------------------
/// ```
fn decode_level2(
    src: &mut SourceCursor<'_>,
    mut scratch: Vec<u8>,
    header: &mut LhaHeader,
    options: &DecodeOptions,
) -> Result<()> {
    let header_size = u16::from_le_bytes([scratch[0], scratch[1]]) as usize;
    if header_size > options.scratch_capacity {
        return Err(LhaError::header_too_large(
            header_size,
            options.scratch_capacity,
        ));
    }

    header.size_field_length = 2;
    header.header_size = header_size;

    scratch.extend_from_slice(src.take(I_LEVEL2_HEADER_SIZE - COMMON_HEADER_SIZE)?);

    let mut reader = ByteReader::at(&scratch, 2);
    let stamp = read_common_fields(&mut reader, header)?;
    header.unix_last_modified_stamp = stamp as i64;
    header.crc = Some(reader.read_u16()?);
    header.extend_type = reader.read_u8()?;
    let extend_size = reader.read_u16()? as usize;

    let mut hcrc = Crc16::new();
    hcrc.update(&scratch);

    let chain_size = parse_extended_headers(
        src,
        header,
        extend_size,
        Some(&mut hcrc),
        options.scratch_capacity,
    )?;

    // padding should be 0 or 1
    finish_header_crc(src, header, hcrc, I_LEVEL2_HEADER_SIZE, chain_size)
}

/// Level 3 header.
///
/// ```text
/// offset   size  field name
/// --------------------------------------------------
///     0       2  size field length (4 fixed)      ^
///     2       5  method ID                        |
///     7       4  packed size       [*2]           |
///    11       4  original size                    |
///    15       4  time                             |
///    19       1  RESERVED (0x20 fixed)            | [*1] total header size
///    20       1  level (0x03 fixed)               |      (X+32)
///    21       2  file crc (CRC-16)                |
///    23       1  OS ID                            |
///    24       4  total header size [*1]           |
///    28       4  next-header size                 |
/// -----------------------------------             |
///    32       X  ext-header                       |
///                 :                               v
/// -------------------------------------------------
/// X +32          data                             ^
///                 :                               | [*2] packed size
///                 :                               v
/// -------------------------------------------------
/// ```
fn decode_level3(
    src: &mut SourceCursor<'_>,
    mut scratch: Vec<u8>,
    header: &mut LhaHeader,
    options: &DecodeOptions,
) -> Result<()> {
    header.size_field_length = u16::from_le_bytes([scratch[0], scratch[1]]);

    scratch.extend_from_slice(src.take(I_LEVEL3_HEADER_SIZE - COMMON_HEADER_SIZE)?);

    let mut reader = ByteReader::at(&scratch, 2);
    let stamp = read_common_fields(&mut reader, header)?;
    header.unix_last_modified_stamp = stamp as i64;
    header.crc = Some(reader.read_u16()?);
    header.extend_type = reader.read_u8()?;
    let header_size = reader.read_u32()? as usize;
    let extend_size = reader.read_u32()? as usize;

    if header_size > options.scratch_capacity {
        return Err(LhaError::header_too_large(
            header_size,
            options.scratch_capacity,
        ));
    }
    header.header_size = header_size;

    let mut hcrc = Crc16::new();
    hcrc.update(&scratch);

    let chain_size = parse_extended_headers(
        src,
        header,
        extend_size,
        Some(&mut hcrc),
        options.scratch_capacity,
    )?;

    // padding should be 0
    finish_header_crc(src, header, hcrc, I_LEVEL3_HEADER_SIZE, chain_size)
}
