//! Turns a raw word-list file into the Key Table and Word Index the engine
//! needs. Spec scopes this out of the engine proper, but a runnable crate
//! still needs one collaborator that builds both from the same pass.

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use memmap2::Mmap;
use rayon::prelude::*;
use tracing::warn;

use crate::codec::{encode, is_valid_five};
use crate::error::SolverError;
use crate::keytable::KeyTable;
use crate::word_index::WordIndex;

pub struct Ingested {
    pub keys: KeyTable,
    pub index: WordIndex,
    pub skipped: u64,
}

/// Reads `path`, memory-mapping it when possible and falling back to a full
/// read for inputs that aren't a regular file (pipes, `/dev/stdin`-style
/// fifos). Splits on `b'\n'`; any line that isn't exactly five lowercase
/// ASCII letters is counted and silently skipped.
pub fn load(path: &Path) -> Result<Ingested, SolverError> {
    let file = File::open(path)?;
    let bytes = read_bytes(&file)?;

    let lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();

    let valid: Vec<[u8; 5]> = lines
        .par_iter()
        .filter_map(|line| parse_line(line))
        .collect();

    let skipped = lines.len() as u64 - valid.len() as u64;
    if skipped > 0 {
        warn!(skipped, "skipped malformed input lines");
    }

    let mut keys = KeyTable::with_capacity(valid.len());
    let mut index = WordIndex::with_hash_size(crate::config::HASH_SIZE);

    for word in valid {
        let mask = encode(&word);
        if !is_valid_five(mask) {
            continue;
        }
        if index.insert(mask, word)? {
            keys.push(mask);
        }
    }

    Ok(Ingested {
        keys,
        index,
        skipped,
    })
}

fn read_bytes(file: &File) -> Result<Vec<u8>, SolverError> {
    let meta = file.metadata()?;
    if meta.is_file() && meta.len() > 0 {
        // SAFETY: the mapping is read-only and dropped before this function
        // returns; we copy the bytes out rather than holding the mmap open,
        // trading a copy for not having to thread a lifetime through the
        // rest of the pipeline.
        let mmap = unsafe { Mmap::map(file) }?;
        Ok(mmap.to_vec())
    } else if meta.is_file() {
        Ok(Vec::new())
    } else {
        let mut buf = Vec::new();
        let mut file = file.try_clone()?;
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

fn parse_line(line: &[u8]) -> Option<[u8; 5]> {
    if line.len() != 5 {
        return None;
    }
    if !line.iter().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    let mut word = [0u8; 5];
    word.copy_from_slice(line);
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(contents: &str) -> tempfile_path::TempPath {
        tempfile_path::write(contents)
    }

    // A tiny local stand-in for a tempfile crate: writes into the system
    // temp dir and removes the file on drop.
    mod tempfile_path {
        use std::io::Write;
        use std::path::{Path, PathBuf};
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        pub struct TempPath(PathBuf);

        impl TempPath {
            pub fn path(&self) -> &Path {
                &self.0
            }
        }

        impl Drop for TempPath {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.0);
            }
        }

        pub fn write(contents: &str) -> TempPath {
            let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = std::env::temp_dir();
            path.push(format!(
                "fivewords-ingest-test-{}-{unique}.txt",
                std::process::id()
            ));
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(contents.as_bytes()).unwrap();
            TempPath(path)
        }
    }

    #[test]
    fn parses_valid_lines_and_skips_malformed_ones() {
        let fixture = write_fixture("brick\nglent\nTOOLONG\nAB\njumpy\nvozhd\nwaqfs\n");
        let result = load(fixture.path()).unwrap();

        // the trailing newline also produces one empty trailing line.
        assert_eq!(result.keys.len(), 5);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn anagrams_collapse_to_one_key_table_entry() {
        let fixture = write_fixture("abcde\nedcba\n");
        let result = load(fixture.path()).unwrap();

        assert_eq!(result.keys.len(), 1);
        assert_eq!(result.index.lookup(encode(b"abcde")), Some(b"abcde"));
    }

    #[test]
    fn empty_input_yields_empty_key_table() {
        let fixture = write_fixture("");
        let result = load(fixture.path()).unwrap();

        assert!(result.keys.is_empty());
    }
}
