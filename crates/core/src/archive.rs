//! Archive format checks.

use std::io::Cursor;

/// Returns true when `bytes` open as a zip archive.
///
/// The central directory has to be readable; a leading `PK` signature alone
/// is not enough.
pub fn is_zip_archive(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    zip::ZipArchive::new(Cursor::new(bytes)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_valid_zip() {
        let bytes = fixtures::zip_bytes(&[("main.c", b"int main() { return 0; }")]);
        assert!(is_zip_archive(&bytes));
    }

    #[test]
    fn test_empty_archive_is_still_a_zip() {
        let bytes = fixtures::zip_bytes(&[]);
        assert!(is_zip_archive(&bytes));
    }

    #[test]
    fn test_empty_input() {
        assert!(!is_zip_archive(&[]));
    }

    #[test]
    fn test_magic_only_is_rejected() {
        assert!(!is_zip_archive(b"PK\x03\x04 definitely not an archive"));
    }

    #[test]
    fn test_plain_text_is_rejected() {
        assert!(!is_zip_archive(b"%PDF-1.7 a pdf pretending to be homework"));
    }

    #[test]
    fn test_truncated_zip_is_rejected() {
        let bytes = fixtures::zip_bytes(&[("a.txt", b"hello")]);
        assert!(!is_zip_archive(&bytes[..bytes.len() - 10]));
    }
}
