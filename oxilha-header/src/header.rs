//! LZH entry header data model.

use crate::name;
use std::time::SystemTime;

/// Maximum number of name bytes kept in a header.
pub const MAX_NAME_LENGTH: usize = 1023;

/// Maximum number of bytes kept for UNIX user and group names.
pub const MAX_OWNER_LENGTH: usize = 255;

/// Size of the part shared by every header level.
pub const COMMON_HEADER_SIZE: usize = 21;

/// Offset of the header level byte.
pub const I_HEADER_LEVEL: usize = 20;

/// Offset of the packed size field.
pub const I_PACKED_SIZE: usize = 7;

/// Fixed size of a generic level 0 header, excluding the name.
pub const I_GENERIC_HEADER_SIZE: usize = 24;

/// Fixed size of a level 0 header with the UNIX trailer, excluding the name.
pub const I_LEVEL0_HEADER_SIZE: usize = 36;

/// Fixed size of a level 1 base header, excluding the name.
pub const I_LEVEL1_HEADER_SIZE: usize = 27;

/// Fixed size of a level 2 base header.
pub const I_LEVEL2_HEADER_SIZE: usize = 26;

/// Fixed size of a level 3 base header.
pub const I_LEVEL3_HEADER_SIZE: usize = 32;

/// Minor version written into the level 0 UNIX trailer.
pub const CURRENT_UNIX_MINOR_VERSION: u8 = 0x00;

/// OS identifiers (the `extend_type` byte).
pub mod os {
    /// Generic, no OS-specific information.
    pub const EXTEND_GENERIC: u8 = 0;
    /// UNIX.
    pub const EXTEND_UNIX: u8 = b'U';
    /// MS-DOS.
    pub const EXTEND_MSDOS: u8 = b'M';
    /// Mac OS.
    pub const EXTEND_MACOS: u8 = b'm';
    /// OS-9.
    pub const EXTEND_OS9: u8 = b'9';
    /// OS/2.
    pub const EXTEND_OS2: u8 = b'2';
    /// OS-68K.
    pub const EXTEND_OS68K: u8 = b'K';
    /// OS-9000.
    pub const EXTEND_OS386: u8 = b'3';
    /// Human68K.
    pub const EXTEND_HUMAN: u8 = b'H';
    /// CP/M.
    pub const EXTEND_CPM: u8 = b'C';
    /// FLEX.
    pub const EXTEND_FLEX: u8 = b'F';
    /// Runser.
    pub const EXTEND_RUNSER: u8 = b'R';

    /// Human readable name of an OS identifier.
    pub fn os_name(id: u8) -> &'static str {
        match id {
            EXTEND_GENERIC => "generic",
            EXTEND_UNIX => "UNIX",
            EXTEND_MSDOS => "MS-DOS",
            EXTEND_MACOS => "Mac OS",
            EXTEND_OS9 => "OS-9",
            EXTEND_OS2 => "OS/2",
            EXTEND_OS68K => "OS-68K",
            EXTEND_OS386 => "OS-9000",
            EXTEND_HUMAN => "Human68K",
            EXTEND_CPM => "CP/M",
            EXTEND_FLEX => "FLEX",
            EXTEND_RUNSER => "Runser",
            _ => "unknown",
        }
    }
}

/// UNIX mode bits as stored in headers.
pub mod unix {
    /// File type mask.
    pub const UNIX_FILE_TYPEMASK: u16 = 0o170000;
    /// Regular file.
    pub const UNIX_FILE_REGULAR: u16 = 0o100000;
    /// Directory.
    pub const UNIX_FILE_DIRECTORY: u16 = 0o040000;
    /// Symbolic link.
    pub const UNIX_FILE_SYMLINK: u16 = 0o120000;
    /// rw-rw-rw- permissions.
    pub const UNIX_RW_RW_RW: u16 = 0o000666;
}

/// Well-known compression method identifiers.
pub mod method {
    /// Stored, no compression.
    pub const LH0: [u8; 5] = *b"-lh0-";
    /// LHarc 1.x, dynamic Huffman.
    pub const LH1: [u8; 5] = *b"-lh1-";
    /// 4KB window, static Huffman.
    pub const LH4: [u8; 5] = *b"-lh4-";
    /// 8KB window, static Huffman.
    pub const LH5: [u8; 5] = *b"-lh5-";
    /// 32KB window, static Huffman.
    pub const LH6: [u8; 5] = *b"-lh6-";
    /// 64KB window, static Huffman.
    pub const LH7: [u8; 5] = *b"-lh7-";
    /// Directory entry.
    pub const LHD: [u8; 5] = *b"-lhd-";
    /// LArc stored.
    pub const LZ4: [u8; 5] = *b"-lz4-";
    /// LArc 2KB window.
    pub const LZS: [u8; 5] = *b"-lzs-";
    /// LArc 4KB window.
    pub const LZ5: [u8; 5] = *b"-lz5-";

    const KNOWN: [[u8; 5]; 10] = [LH0, LH1, LH4, LH5, LH6, LH7, LHD, LZ4, LZS, LZ5];

    /// Whether `id` is one of the methods listed above.
    pub fn is_known_method(id: &[u8; 5]) -> bool {
        KNOWN.contains(id)
    }
}

/// DOS directory attribute bit.
pub const DOS_ATTR_DIRECTORY: u8 = 0x10;

/// Outcome of one header integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Check {
    /// The declared and computed values agree.
    Valid,
    /// The declared and computed values differ.
    Mismatch {
        /// Value stored in the header.
        declared: u16,
        /// Value computed over the header bytes.
        computed: u16,
    },
    /// The check does not apply to this header.
    #[default]
    Absent,
}

impl Check {
    /// Compare a declared value with a computed one.
    pub fn compare(declared: u16, computed: u16) -> Self {
        if declared == computed {
            Self::Valid
        } else {
            Self::Mismatch { declared, computed }
        }
    }

    /// True unless the check ran and failed.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Mismatch { .. })
    }
}

/// Integrity checks performed while decoding a header.
///
/// A mismatch never aborts decoding; it is only reported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderValidation {
    /// Byte-sum of level 0 and level 1 base headers.
    pub checksum: Check,
    /// Header CRC of level 2 and level 3 headers, compared with 0 when the
    /// chain has no type 0 record.
    ///
    /// Always `Absent` for level 1: a type 0 record there is kept in
    /// [`LhaHeader::header_crc`] but never checked.
    pub header_crc: Check,
}

impl HeaderValidation {
    /// True if no check failed.
    pub fn is_valid(&self) -> bool {
        self.checksum.is_ok() && self.header_crc.is_ok()
    }
}

/// LZH entry header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LhaHeader {
    /// Header size, normalised so that levels can be compared.
    pub header_size: usize,
    /// Width of length fields in the extended header chain (2 or 4).
    pub size_field_length: u16,
    /// Compression method identifier.
    pub method: [u8; 5],
    /// Compressed payload size.
    pub packed_size: u64,
    /// Original (uncompressed) size.
    pub original_size: u64,
    /// MS-DOS attribute (level 0/1) or reserved byte (level 2/3).
    pub attribute: u8,
    /// Header level (0, 1, 2 or 3).
    pub header_level: u8,
    /// Path bytes, directories separated by 0xFF.
    pub name: Vec<u8>,
    /// CRC-16 of the original data, if stored.
    pub crc: Option<u16>,
    /// Header CRC declared by a type 0 extension record.
    pub header_crc: Option<u16>,
    /// OS identifier.
    pub extend_type: u8,
    /// Minor version of the level 0 UNIX trailer.
    pub minor_version: u8,
    /// Last modification time, Unix seconds.
    pub unix_last_modified_stamp: i64,
    /// UNIX mode bits.
    pub unix_mode: u16,
    /// UNIX user id.
    pub unix_uid: u16,
    /// UNIX group id.
    pub unix_gid: u16,
    /// UNIX user name.
    pub user: Vec<u8>,
    /// UNIX group name.
    pub group: Vec<u8>,
    /// Integrity check results.
    pub validation: HeaderValidation,
    /// Number of header bytes consumed; payload data starts here.
    pub data_offset: usize,
}

impl Default for LhaHeader {
    fn default() -> Self {
        Self {
            header_size: 0,
            size_field_length: 2,
            method: method::LH0,
            packed_size: 0,
            original_size: 0,
            attribute: 0x20,
            header_level: 2,
            name: Vec::new(),
            crc: Some(0),
            header_crc: None,
            extend_type: os::EXTEND_UNIX,
            minor_version: CURRENT_UNIX_MINOR_VERSION,
            unix_last_modified_stamp: 0,
            unix_mode: unix::UNIX_FILE_REGULAR | unix::UNIX_RW_RW_RW,
            unix_uid: 0,
            unix_gid: 0,
            user: Vec::new(),
            group: Vec::new(),
            validation: HeaderValidation::default(),
            data_offset: 0,
        }
    }
}

impl LhaHeader {
    /// Create a header for `name` (0xFF separated) with UNIX defaults.
    pub fn new(name: impl Into<Vec<u8>>, method: [u8; 5]) -> Self {
        Self {
            name: name.into(),
            method,
            ..Self::default()
        }
    }

    /// Empty header as a decoder starts from.
    pub(crate) fn blank() -> Self {
        Self {
            method: [0; 5],
            attribute: 0,
            header_level: 0,
            crc: None,
            extend_type: os::EXTEND_GENERIC,
            ..Self::default()
        }
    }

    /// Modification time as a `SystemTime`.
    pub fn modified(&self) -> SystemTime {
        oxilha_core::timestamp::unix_to_system_time(self.unix_last_modified_stamp)
    }

    /// Set the modification time from a `SystemTime`.
    pub fn set_modified(&mut self, time: SystemTime) {
        self.unix_last_modified_stamp = oxilha_core::timestamp::system_time_to_unix(time);
    }

    /// Method identifier as text, e.g. `-lh5-`.
    pub fn method_str(&self) -> String {
        String::from_utf8_lossy(&self.method).into_owned()
    }

    /// Whether the header stores a payload CRC.
    pub fn has_crc(&self) -> bool {
        self.crc.is_some()
    }

    /// Whether the entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.method == method::LHD
            || self.unix_mode & unix::UNIX_FILE_TYPEMASK == unix::UNIX_FILE_DIRECTORY
            || (self.header_level < 2 && self.attribute & DOS_ATTR_DIRECTORY != 0)
    }

    /// Whether the entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.unix_mode & unix::UNIX_FILE_TYPEMASK == unix::UNIX_FILE_SYMLINK
    }

    /// Symbolic link target, stored after a `|` in the name.
    pub fn link_target(&self) -> Option<&[u8]> {
        if !self.is_symlink() {
            return None;
        }
        name::split_symlink(&self.name).map(|(_, target)| target)
    }

    /// Path for display, `/` separated and decoded from Shift_JIS when possible.
    pub fn display_name(&self) -> String {
        let path = match name::split_symlink(&self.name) {
            Some((path, _)) if self.is_symlink() => path,
            _ => &self.name[..],
        };
        name::decode_name(&name::path_from_lha(path))
    }
}
