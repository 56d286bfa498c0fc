//! Encode and decode headers of every writable level.

use oxilha_header::{
    Check, DecodeOptions, EncodeOptions, LhaHeader, decode_header, encode_header, method, os,
    unix,
};

fn utc() -> (EncodeOptions, DecodeOptions) {
    (
        EncodeOptions::GENERIC.with_utc_offset(0),
        DecodeOptions::new().with_utc_offset(0),
    )
}

fn entry(name: &[u8], level: u8) -> LhaHeader {
    let mut header = LhaHeader::new(name.to_vec(), method::LH6);
    header.header_level = level;
    header.packed_size = 4096;
    header.original_size = 16384;
    header.crc = Some(0x1D0F);
    header.unix_last_modified_stamp = 1_500_000_001;
    header.unix_mode = unix::UNIX_FILE_REGULAR | 0o755;
    header.unix_uid = 1000;
    header.unix_gid = 1000;
    header
}

fn assert_same_entry(decoded: &LhaHeader, original: &LhaHeader) {
    assert_eq!(decoded.name, original.name);
    assert_eq!(decoded.method, original.method);
    assert_eq!(decoded.packed_size, original.packed_size);
    assert_eq!(decoded.original_size, original.original_size);
    assert_eq!(decoded.crc, original.crc);
    assert_eq!(decoded.unix_mode, original.unix_mode);
    assert_eq!(decoded.unix_uid, original.unix_uid);
    assert_eq!(decoded.unix_gid, original.unix_gid);
}

#[test]
fn test_level1_unix_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let header = entry(b"usr\xffbin\xfftool", 1);
    let bytes = header.encode()?;
    let decoded = LhaHeader::decode(&bytes)?.ok_or("missing header")?;

    assert_same_entry(&decoded, &header);
    assert_eq!(decoded.header_level, 1);
    assert_eq!(decoded.extend_type, os::EXTEND_UNIX);
    // the Unix time record overrides the generic stamp
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_001);
    assert!(decoded.validation.is_valid());
    assert_eq!(decoded.data_offset, bytes.len());
    Ok(())
}

#[test]
fn test_level1_generic_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let header = entry(b"DOS\xffFILE.TXT", 1);
    let (encode, decode) = utc();
    let bytes = encode_header(&header, &encode)?;
    let decoded = decode_header(&bytes, &decode)?.ok_or("missing header")?;

    assert_eq!(decoded.name, header.name);
    assert_eq!(decoded.packed_size, header.packed_size);
    assert_eq!(decoded.extend_type, os::EXTEND_GENERIC);
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_000);
    // no UNIX records, defaults apply
    assert_eq!(decoded.unix_mode, unix::UNIX_FILE_REGULAR | unix::UNIX_RW_RW_RW);
    Ok(())
}

#[test]
fn test_level2_unix_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut header = entry(b"src\xfflib.rs", 2);
    header.user = b"builder".to_vec();
    header.group = b"wheel".to_vec();
    let bytes = header.encode()?;
    let decoded = LhaHeader::decode(&bytes)?.ok_or("missing header")?;

    assert_same_entry(&decoded, &header);
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_001);
    assert_eq!(decoded.user, b"builder");
    assert_eq!(decoded.group, b"wheel");
    assert_eq!(decoded.validation.header_crc, Check::Valid);
    assert_eq!(decoded.header_size, bytes.len());
    assert_eq!(decoded.display_name(), "src/lib.rs");
    Ok(())
}

#[test]
fn test_level2_long_directory_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut name = Vec::new();
    for _ in 0..50 {
        name.extend_from_slice(b"directory\xff");
    }
    name.extend_from_slice(b"leaf.dat");
    let header = entry(&name, 2);

    let bytes = header.encode()?;
    let decoded = LhaHeader::decode(&bytes)?.ok_or("missing header")?;
    assert_eq!(decoded.name, name);
    Ok(())
}

#[test]
fn test_level0_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let header = entry(b"A\\B.TXT", 0);

    let bytes = header.encode()?;
    let decoded = LhaHeader::decode(&bytes)?.ok_or("missing header")?;
    assert_same_entry(&decoded, &header);
    assert_eq!(decoded.extend_type, os::EXTEND_UNIX);
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_001);
    assert_eq!(decoded.header_size, bytes.len());

    let (encode, decode) = utc();
    let bytes = encode_header(&header, &encode)?;
    let decoded = decode_header(&bytes, &decode)?.ok_or("missing header")?;
    assert_eq!(decoded.name, header.name);
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_000);
    assert_eq!(decoded.validation.checksum, Check::Valid);
    Ok(())
}

#[test]
fn test_generic_stamp_with_utc_offset() -> Result<(), Box<dyn std::error::Error>> {
    let header = entry(b"LOCAL.TXT", 1);
    let encode = EncodeOptions::GENERIC.with_utc_offset(9 * 3600);
    let decode = DecodeOptions::new().with_utc_offset(9 * 3600);

    let bytes = encode_header(&header, &encode)?;
    let decoded = decode_header(&bytes, &decode)?.ok_or("missing header")?;
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_000);

    let (_, utc) = utc();
    let decoded = decode_header(&bytes, &utc)?.ok_or("missing header")?;
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_000 + 9 * 3600);
    Ok(())
}

#[test]
fn test_generic_stamp_in_local_time() -> Result<(), Box<dyn std::error::Error>> {
    // written and read in the host's zone, whatever it is
    let header = entry(b"LOCAL.TXT", 1);
    let bytes = encode_header(&header, &EncodeOptions::GENERIC)?;
    let decoded = LhaHeader::decode(&bytes)?.ok_or("missing header")?;
    assert_eq!(decoded.unix_last_modified_stamp, 1_500_000_000);

    // the stored fields are the local wall clock
    let (_, utc) = utc();
    let wall = decode_header(&bytes, &utc)?.ok_or("missing header")?;
    let offset = oxilha_core::timestamp::local_offset_at(1_500_000_000) as i64;
    assert_eq!(wall.unix_last_modified_stamp, 1_500_000_000 + offset);
    Ok(())
}

#[test]
fn test_walk_entries() -> Result<(), Box<dyn std::error::Error>> {
    let entries = [
        entry(b"level0.bin", 0),
        entry(b"one\xfflevel1.bin", 1),
        entry(b"two\xfflevel2.bin", 2),
    ];

    let mut archive = Vec::new();
    for (i, header) in entries.iter().enumerate() {
        let mut header = header.clone();
        header.packed_size = 10 + i as u64;
        archive.extend(header.encode()?);
        archive.extend(std::iter::repeat_n(i as u8 + 1, header.packed_size as usize));
    }
    archive.push(0);

    let mut offset = 0;
    let mut seen = Vec::new();
    while let Some(header) = LhaHeader::decode(&archive[offset..])? {
        let start = offset + header.data_offset;
        let payload = &archive[start..start + header.packed_size as usize];
        assert!(payload.iter().all(|&b| b == seen.len() as u8 + 1));

        seen.push(header.name.clone());
        offset = start + header.packed_size as usize;
    }

    assert_eq!(offset, archive.len() - 1);
    assert_eq!(
        seen,
        vec![
            b"level0.bin".to_vec(),
            b"one\xfflevel1.bin".to_vec(),
            b"two\xfflevel2.bin".to_vec(),
        ]
    );
    Ok(())
}
