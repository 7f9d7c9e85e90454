//! Memory-mapped log file reader for batch mode.

use std::fs::File;
use std::path::Path;

use memchr::memchr;
use memmap2::Mmap;

use super::ReaderError;

/// Read-only view over a whole log file. Batch mode iterates its lines once,
/// front to back; the file is never held open beyond the reader's lifetime.
#[derive(Debug)]
pub struct LogReader {
    mmap: Mmap,
}

impl LogReader {
    pub fn open(path: &Path) -> Result<Self, ReaderError> {
        let file = File::open(path).map_err(|source| ReaderError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        // mmap is read-only; the file is not mutated while parsing
        #[allow(unsafe_code)]
        let mmap = unsafe {
            Mmap::map(&file).map_err(|source| ReaderError::MemoryMap {
                path: path.to_path_buf(),
                source,
            })?
        };
        Ok(Self { mmap })
    }

    /// Iterate lines as `&str`. Lines that are not valid UTF-8 are skipped;
    /// the feed is ASCII apart from display names.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            buf: &self.mmap,
            pos: 0,
        }
    }
}

pub struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while self.pos < self.buf.len() {
            let rest = &self.buf[self.pos..];
            let (raw, advance) = match memchr(b'\n', rest) {
                Some(nl) => (&rest[..nl], nl + 1),
                None => (rest, rest.len()),
            };
            self.pos += advance;

            match std::str::from_utf8(raw) {
                Ok(line) => return Some(line),
                Err(_) => {
                    tracing::debug!(offset = self.pos, "skipping non-UTF-8 line");
                    continue;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_lines_and_skips_invalid_utf8() {
        let tmp = tempfile_path();
        {
            let mut file = File::create(&tmp.0).unwrap();
            file.write_all(b"3|1000|1|Ayaka\n").unwrap();
            file.write_all(&[0xFF, 0xFE, b'\n']).unwrap();
            file.write_all(b"2|2000|1").unwrap();
        }
        let reader = LogReader::open(&tmp.0).unwrap();
        let lines: Vec<&str> = reader.lines().collect();
        assert_eq!(lines, vec!["3|1000|1|Ayaka", "2|2000|1"]);
    }

    #[test]
    fn open_missing_file_reports_path() {
        let err = LogReader::open(Path::new("/nonexistent/arklog-test.log")).unwrap_err();
        assert!(matches!(err, ReaderError::OpenFile { .. }));
    }

    struct TempPath(std::path::PathBuf);
    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn tempfile_path() -> TempPath {
        let mut path = std::env::temp_dir();
        path.push(format!("arklog-reader-{}.log", std::process::id()));
        TempPath(path)
    }
}
