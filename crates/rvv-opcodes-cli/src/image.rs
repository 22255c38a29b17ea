use anyhow::{Context, Result};
use std::path::Path;

/// Reads a raw little-endian instruction stream as 32-bit words.
/// A trailing partial word is dropped.
pub fn load_words(path: &Path, skip: usize, len: Option<usize>) -> Result<Vec<u32>> {
    let file = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    let chunks = payload.chunks_exact(4);
    if !chunks.remainder().is_empty() {
        tracing::warn!(bytes = chunks.remainder().len(), "ignoring trailing partial word");
    }
    Ok(chunks
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_honours_skip_and_len() {
        let cwd = std::env::current_dir().unwrap();
        let path = cwd.join("_test_words.bin");
        std::fs::write(&path, [0xffu8, 0xd7, 0x80, 0x21, 0x02, 0x57, 0x00, 0x00, 0x00, 0xaa]).unwrap();
        let words = load_words(&path, 1, None).unwrap();
        assert_eq!(words, vec![0x0221_80d7, 0x0000_0057]);
        let words = load_words(&path, 1, Some(4)).unwrap();
        assert_eq!(words, vec![0x0221_80d7]);
        assert!(load_words(&path, 11, None).is_err());
        assert!(load_words(&path, 2, Some(9)).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
