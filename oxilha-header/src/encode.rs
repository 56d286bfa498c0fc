//! Header encoding for levels 0, 1 and 2.
//!
//! Encoders build the header in a bounded [`ByteWriter`], reserving the
//! size, checksum and CRC fields and patching them once the rest of the
//! header is known. The input header is never modified.

use crate::extended::ext;
use crate::header::{
    CURRENT_UNIX_MINOR_VERSION, I_GENERIC_HEADER_SIZE, I_LEVEL0_HEADER_SIZE,
    I_LEVEL1_HEADER_SIZE, I_PACKED_SIZE, LhaHeader, os,
};
use crate::name;
use crate::options::EncodeOptions;
use log::{debug, warn};
use oxilha_core::crc::{Crc16, calc_sum};
use oxilha_core::cursor::ByteWriter;
use oxilha_core::error::{LhaError, Result};

/// Encode `header` at its `header_level`.
///
/// Level 3 headers can be decoded but not encoded.
pub fn encode_header(header: &LhaHeader, options: &EncodeOptions) -> Result<Vec<u8>> {
    let bytes = match header.header_level {
        0 => encode_level0(header, options)?,
        1 => encode_level1(header, options)?,
        2 => encode_level2(header, options)?,
        3 => return Err(LhaError::unsupported_level(3)),
        level => return Err(LhaError::unknown_level(level)),
    };

    debug!(
        "encoded level {} header '{}' ({} bytes)",
        header.header_level,
        header.display_name(),
        bytes.len()
    );
    Ok(bytes)
}

impl LhaHeader {
    /// Encode with UNIX extensions.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_header(self, &EncodeOptions::UNIX)
    }
}

fn u32_field(value: u64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        LhaError::invalid_header(format!("{} {} does not fit in 32 bits", field, value))
    })
}

/// Unix time as stored in 32-bit fields.
fn unix_stamp(t: i64) -> u32 {
    let stamp = t.clamp(0, u32::MAX as i64);
    if stamp != t {
        warn!(
            "modification time {} is outside the 32-bit Unix range, stored as {}",
            t, stamp
        );
    }
    stamp as u32
}

fn os_id(options: &EncodeOptions) -> u8 {
    if options.generic_format {
        os::EXTEND_GENERIC
    } else {
        os::EXTEND_UNIX
    }
}

/// Write one extended header preceded by its size field.
fn put_record(w: &mut ByteWriter, ext_type: u8, body: &[u8]) -> Result<()> {
    let size = u16::try_from(body.len() + 3).map_err(|_| {
        LhaError::invalid_header(format!(
            "extended header {:#04x} of {} bytes is too long",
            ext_type,
            body.len()
        ))
    })?;
    w.put_u16(size)?;
    w.put_u8(ext_type)?;
    w.put_bytes(body)
}

fn write_unix_info(w: &mut ByteWriter, header: &LhaHeader, level: u8) -> Result<()> {
    put_record(w, ext::UNIX_PERMISSION, &header.unix_mode.to_le_bytes())?;

    let mut ids = [0u8; 4];
    ids[..2].copy_from_slice(&header.unix_gid.to_le_bytes());
    ids[2..].copy_from_slice(&header.unix_uid.to_le_bytes());
    put_record(w, ext::UNIX_GID_UID, &ids)?;

    if !header.group.is_empty() {
        put_record(w, ext::UNIX_GROUP, &header.group)?;
    }
    if !header.user.is_empty() {
        put_record(w, ext::UNIX_USER, &header.user)?;
    }
    if level == 1 {
        let stamp = unix_stamp(header.unix_last_modified_stamp);
        put_record(w, ext::UNIX_MTIME, &stamp.to_le_bytes())?;
    }
    Ok(())
}

/// Method through level byte of a level 0/1 header, after two reserved bytes.
fn put_summed_prefix(
    w: &mut ByteWriter,
    header: &LhaHeader,
    options: &EncodeOptions,
    packed_size: u32,
    attribute: u8,
    level: u8,
) -> Result<()> {
    w.put_u8(0x00)?; // header size
    w.put_u8(0x00)?; // check sum
    w.put_bytes(&header.method)?;
    w.put_u32(packed_size)?;
    w.put_u32(u32_field(header.original_size, "original size")?)?;
    w.put_u32(options.unix_to_generic(header.unix_last_modified_stamp))?;
    w.put_u8(attribute)?;
    w.put_u8(level)
}

/// Patch the header size and the byte-sum over `header_size` bytes.
fn finish_summed(mut w: ByteWriter, header_size: usize) -> Result<Vec<u8>> {
    w.patch_u8(0, header_size as u8)?;
    let sum = calc_sum(&w.as_slice()[2..2 + header_size]);
    w.patch_u8(1, sum)?;
    Ok(w.into_inner())
}

fn encode_level0(header: &LhaHeader, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut w = ByteWriter::new(options.scratch_capacity);
    let packed_size = u32_field(header.packed_size, "packed size")?;
    put_summed_prefix(&mut w, header, options, packed_size, header.attribute, 0)?;

    // level 0 keeps the directory part in the name
    let limit = if options.generic_format {
        255 - I_GENERIC_HEADER_SIZE + 2
    } else {
        255 - I_LEVEL0_HEADER_SIZE + 2
    };
    let name_length = header.name.len().min(limit);
    if name_length < header.name.len() {
        warn!(
            "level 0 name truncated from {} to {} bytes",
            header.name.len(),
            name_length
        );
    }
    w.put_u8(name_length as u8)?;
    w.put_bytes(&header.name[..name_length])?;
    w.put_u16(header.crc.unwrap_or(0))?;

    let header_size = if options.generic_format {
        I_GENERIC_HEADER_SIZE + name_length - 2
    } else {
        // old style extend header
        w.put_u8(os::EXTEND_UNIX)?;
        w.put_u8(CURRENT_UNIX_MINOR_VERSION)?;
        w.put_u32(unix_stamp(header.unix_last_modified_stamp))?;
        w.put_u16(header.unix_mode)?;
        w.put_u16(header.unix_uid)?;
        w.put_u16(header.unix_gid)?;
        I_LEVEL0_HEADER_SIZE + name_length - 2
    };

    finish_summed(w, header_size)
}

fn encode_level1(header: &LhaHeader, options: &EncodeOptions) -> Result<Vec<u8>> {
    let (dirname, basename) = name::split_path(&header.name);

    let mut w = ByteWriter::new(options.scratch_capacity);
    // skip size is patched once the extended headers are written
    put_summed_prefix(&mut w, header, options, 0, 0x20, 1)?;

    let limit = 255 - I_LEVEL1_HEADER_SIZE + 2;
    let long_name = basename.len() > limit;
    if long_name {
        w.put_u8(0)?;
    } else {
        w.put_u8(basename.len() as u8)?;
        w.put_bytes(basename)?;
    }

    w.put_u16(header.crc.unwrap_or(0))?;
    w.put_u8(os_id(options))?;

    let header_size = w.position();
    let chain_start = header_size + 2;

    if long_name {
        put_record(&mut w, ext::FILENAME, basename)?;
    }
    if !dirname.is_empty() {
        put_record(&mut w, ext::DIRECTORY, dirname)?;
    }
    if !options.generic_format {
        write_unix_info(&mut w, header, 1)?;
    }
    w.put_u16(0x0000)?; // next header size

    let chain_size = w.position() - chain_start;
    let skip_size = u32_field(
        header.packed_size.saturating_add(chain_size as u64),
        "skip size",
    )?;
    w.patch_u32(I_PACKED_SIZE, skip_size)?;

    finish_summed(w, header_size)
}

fn encode_level2(header: &LhaHeader, options: &EncodeOptions) -> Result<Vec<u8>> {
    let (dirname, basename) = name::split_path(&header.name);

    let mut w = ByteWriter::new(options.scratch_capacity);
    w.put_u16(0x0000)?; // header size
    w.put_bytes(&header.method)?;
    w.put_u32(u32_field(header.packed_size, "packed size")?)?;
    w.put_u32(u32_field(header.original_size, "original size")?)?;
    w.put_u32(unix_stamp(header.unix_last_modified_stamp))?;
    w.put_u8(0x20)?;
    w.put_u8(2)?;
    w.put_u16(header.crc.unwrap_or(0))?;
    w.put_u8(os_id(options))?;

    put_record(&mut w, ext::HEADER_CRC, &[0, 0])?;
    let header_crc_at = w.position() - 2;

    // the filename record is written even for an empty name
    put_record(&mut w, ext::FILENAME, basename)?;
    if !dirname.is_empty() {
        put_record(&mut w, ext::DIRECTORY, dirname)?;
    }
    if !options.generic_format {
        write_unix_info(&mut w, header, 2)?;
    }
    w.put_u16(0x0000)?; // next header size

    let mut header_size = w.position();
    if header_size & 0xFF == 0 {
        // a zero first byte would read as the end-of-archive mark
        w.put_u8(0)?;
        header_size += 1;
    }

    let size_field = u16::try_from(header_size).map_err(|_| {
        LhaError::invalid_header(format!(
            "level 2 header of {} bytes is too long",
            header_size
        ))
    })?;
    w.patch_u16(0, size_field)?;

    let hcrc = Crc16::compute(w.as_slice());
    w.patch_u16(header_crc_at, hcrc)?;

    Ok(w.into_inner())
}
