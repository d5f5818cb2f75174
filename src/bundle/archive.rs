// In: src/bundle/archive.rs

//! Thin wrapper over `zip::ZipArchive` that enumerates array entries and reads
//! their decompressed bytes, one at a time, from an in-memory archive.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::BundleError;

pub(crate) struct ArchiveReader<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ArchiveReader<'a> {
    /// Opens the archive's central directory.
    ///
    /// # Errors
    /// Returns `BundleError::ArchiveFormat` if `bytes` is not a zip container.
    pub fn open(bytes: &'a [u8]) -> Result<Self, BundleError> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Entries whose path ends with `suffix` (exact, case-sensitive), as
    /// `(index, name with the suffix stripped)`. Directories are never included.
    pub fn array_entries(&self, suffix: &str) -> Vec<(usize, String)> {
        (0..self.archive.len())
            .filter_map(|index| {
                let path = self.archive.name_for_index(index)?;
                if path.ends_with('/') {
                    return None;
                }
                path.strip_suffix(suffix)
                    .map(|name| (index, name.to_string()))
            })
            .collect()
    }

    /// Reads and decompresses the entry at `index`, stopping once more than
    /// `limit` bytes have come out.
    ///
    /// # Errors
    /// Returns `BundleError::EntryTooLarge` if the entry decompresses past `limit`,
    /// whatever size its local header claims.
    pub fn read_entry(&mut self, index: usize, limit: u64) -> Result<Vec<u8>, BundleError> {
        let file = self.archive.by_index(index)?;
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
        if bytes.len() as u64 > limit {
            return Err(BundleError::EntryTooLarge { limit });
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::writer::write_archive;

    #[test]
    fn test_array_entries_filter_by_suffix() {
        let archive = write_archive([
            ("masks.npy", &b"a"[..]),
            ("readme.txt", &b"b"[..]),
            ("nested/points.npy", &b"c"[..]),
            ("upper.NPY", &b"d"[..]),
            ("masks.npy.bak", &b"e"[..]),
        ])
        .unwrap();

        let reader = ArchiveReader::open(&archive).unwrap();
        assert_eq!(reader.len(), 5);
        let names: Vec<String> = reader
            .array_entries(".npy")
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        assert_eq!(names, vec!["masks".to_string(), "nested/points".to_string()]);
    }

    #[test]
    fn test_read_entry_decompresses() {
        let payload = vec![7u8; 4096];
        let archive = write_archive([("big.npy", payload.as_slice())]).unwrap();
        let mut reader = ArchiveReader::open(&archive).unwrap();
        let (index, _) = reader.array_entries(".npy")[0].clone();
        assert_eq!(reader.read_entry(index, 4096).unwrap(), payload);
    }

    #[test]
    fn test_read_entry_stops_at_limit() {
        // Highly compressible, so the archive itself stays tiny.
        let payload = vec![0u8; 64 * 1024];
        let archive = write_archive([("bomb.npy", payload.as_slice())]).unwrap();
        assert!(archive.len() < payload.len() / 8);

        let mut reader = ArchiveReader::open(&archive).unwrap();
        assert!(matches!(
            reader.read_entry(0, 4095),
            Err(BundleError::EntryTooLarge { limit: 4095 })
        ));
        assert_eq!(reader.read_entry(0, 64 * 1024).unwrap().len(), 64 * 1024);
    }

    #[test]
    fn test_open_rejects_non_zip() {
        assert!(matches!(
            ArchiveReader::open(b"definitely not a zip file"),
            Err(BundleError::ArchiveFormat(_))
        ));
        assert!(matches!(
            ArchiveReader::open(&[]),
            Err(BundleError::ArchiveFormat(_))
        ));
    }
}
