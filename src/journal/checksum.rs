//! CRC32 checksums for journal records

/// Computes the CRC32 checksum of a byte slice.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}
