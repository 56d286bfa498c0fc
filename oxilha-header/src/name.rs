//! Path handling for header names.
//!
//! Header names are raw bytes. Level 1, 2 and 3 headers separate directory
//! components with the byte 0xFF; some MS-DOS archivers use `\` instead.

use encoding_rs::SHIFT_JIS;

/// Path separator inside header names.
pub const PATH_SEPARATOR: u8 = 0xFF;

/// Separator between a symbolic link's name and its target.
pub const SYMLINK_SEPARATOR: u8 = b'|';

/// Convert a `/` or `\` separated path to header form.
pub fn path_to_lha(path: &[u8]) -> Vec<u8> {
    path.iter()
        .map(|&b| match b {
            b'/' | b'\\' => PATH_SEPARATOR,
            _ => b,
        })
        .collect()
}

/// Convert a header name to a `/` separated path.
pub fn path_from_lha(name: &[u8]) -> Vec<u8> {
    name.iter()
        .map(|&b| match b {
            PATH_SEPARATOR | b'\\' => b'/',
            _ => b,
        })
        .collect()
}

/// Split a header name at the last separator.
///
/// The directory part keeps its trailing separator and is empty when the name
/// has no directory.
pub fn split_path(name: &[u8]) -> (&[u8], &[u8]) {
    match name.iter().rposition(|&b| b == PATH_SEPARATOR) {
        Some(pos) => name.split_at(pos + 1),
        None => (&name[..0], name),
    }
}

/// Split a symbolic link name of the form `path|target`.
pub fn split_symlink(name: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = name.iter().position(|&b| b == SYMLINK_SEPARATOR)?;
    Some((&name[..pos], &name[pos + 1..]))
}

/// Join a directory and a file name into at most `limit` bytes.
///
/// The file name is kept whole when it fits on its own; the directory is cut
/// short to make room for it.
pub fn join_dir_name(dir: &[u8], file: &[u8], limit: usize) -> Vec<u8> {
    let file = &file[..file.len().min(limit)];
    let dir = &dir[..dir.len().min(limit - file.len())];

    let mut joined = Vec::with_capacity(dir.len() + file.len());
    joined.extend_from_slice(dir);
    joined.extend_from_slice(file);
    joined
}

/// Bytes up to the first NUL.
pub fn trim_at_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Decode name bytes (Shift_JIS or UTF-8).
pub fn decode_name(bytes: &[u8]) -> String {
    // Try Shift_JIS first
    let (decoded, _, had_errors) = SHIFT_JIS.decode(bytes);
    if !had_errors {
        return decoded.into_owned();
    }

    // Fall back to UTF-8 lossy
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_conversion() {
        assert_eq!(path_to_lha(b"a/b\\c.txt"), b"a\xffb\xffc.txt");
        assert_eq!(path_from_lha(b"a\xffb\\c.txt"), b"a/b/c.txt");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(
            split_path(b"dir\xffsub\xfffile"),
            (&b"dir\xffsub\xff"[..], &b"file"[..])
        );
        assert_eq!(split_path(b"file"), (&b""[..], &b"file"[..]));
        assert_eq!(split_path(b"dir\xff"), (&b"dir\xff"[..], &b""[..]));
    }

    #[test]
    fn test_split_symlink() {
        assert_eq!(
            split_symlink(b"link|target"),
            Some((&b"link"[..], &b"target"[..]))
        );
        assert_eq!(split_symlink(b"plain"), None);
    }

    #[test]
    fn test_join_dir_name_fits() {
        assert_eq!(join_dir_name(b"dir\xff", b"file", 16), b"dir\xfffile");
    }

    #[test]
    fn test_join_dir_name_truncates_directory() {
        let dir = vec![b'd'; 20];
        let joined = join_dir_name(&dir, b"name.txt", 12);
        assert_eq!(joined.len(), 12);
        assert_eq!(&joined[..4], b"dddd");
        assert!(joined.ends_with(b"name.txt"));
    }

    #[test]
    fn test_join_dir_name_file_alone_too_long() {
        let file = vec![b'f'; 20];
        let joined = join_dir_name(b"dir\xff", &file, 10);
        assert_eq!(joined, vec![b'f'; 10]);
    }

    #[test]
    fn test_trim_at_nul() {
        assert_eq!(trim_at_nul(b"abc\0def"), b"abc");
        assert_eq!(trim_at_nul(b"abc"), b"abc");
        assert_eq!(trim_at_nul(b"\0"), b"");
    }

    #[test]
    fn test_decode_name_utf8() {
        assert_eq!(decode_name(b"test.txt"), "test.txt");
    }

    #[test]
    fn test_decode_name_shift_jis() {
        // "テスト" in Shift_JIS
        assert_eq!(decode_name(&[0x83, 0x65, 0x83, 0x58, 0x83, 0x67]), "テスト");
    }
}
