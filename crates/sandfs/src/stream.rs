//! Atomic stream writes via a temp-file-then-rename protocol.
//!
//! A [`StreamSaver`] writes into a `<name>.part` sibling of the destination
//! and renames it into place only after the full copy succeeds. Readers of
//! the destination observe either the previous content (or absence) or the
//! complete new content, never a partial write. A crash mid-write leaves an
//! orphaned `.part` file and an untouched destination.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Incremental writer that commits atomically.
///
/// Implements [`std::io::Write`] for the copy phase. Dropping a saver
/// without calling [`commit`](StreamSaver::commit) removes the temp file;
/// the destination is never touched until the rename.
#[derive(Debug)]
pub struct StreamSaver {
    dest: PathBuf,
    temp: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl StreamSaver {
    /// Open a `.part` sibling of `dest` for writing. The destination's
    /// parent directory must already exist.
    pub(crate) fn create(dest: PathBuf) -> io::Result<Self> {
        let temp = part_path(&dest);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)?;

        Ok(Self {
            dest,
            temp,
            file: Some(file),
            committed: false,
        })
    }

    /// Flush, close, and atomically rename the temp file into place.
    ///
    /// On any failure the temp file is removed by the drop handler and the
    /// destination is left untouched.
    pub fn commit(mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&self.temp, &self.dest)?;
        self.committed = true;
        Ok(())
    }
}

impl Write for StreamSaver {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file {
            Some(ref mut file) => file.write(buf),
            None => Err(io::Error::other("stream saver already finished")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file {
            Some(ref mut file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StreamSaver {
    fn drop(&mut self) {
        // Close the handle before unlinking; harmless if commit already ran.
        self.file.take();
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

/// Sibling temp path: `dir/name` becomes `dir/name.part`.
fn part_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(".part");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_writes_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.bin");

        let mut saver = StreamSaver::create(dest.clone()).unwrap();
        saver.write_all(b"hello ").unwrap();
        saver.write_all(b"world").unwrap();
        saver.commit().unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
        assert!(!temp_dir.path().join("out.bin.part").exists());
    }

    #[test]
    fn test_destination_absent_until_commit() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.bin");

        let mut saver = StreamSaver::create(dest.clone()).unwrap();
        saver.write_all(b"partial").unwrap();

        assert!(!dest.exists());
        assert!(temp_dir.path().join("out.bin.part").exists());

        saver.commit().unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn test_drop_without_commit_removes_temp() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.bin");

        {
            let mut saver = StreamSaver::create(dest.clone()).unwrap();
            saver.write_all(b"abandoned").unwrap();
        }

        assert!(!dest.exists());
        assert!(!temp_dir.path().join("out.bin.part").exists());
    }

    #[test]
    fn test_drop_leaves_existing_destination_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.bin");
        fs::write(&dest, b"original").unwrap();

        {
            let mut saver = StreamSaver::create(dest.clone()).unwrap();
            saver.write_all(b"replacement that never lands").unwrap();
        }

        assert_eq!(fs::read(&dest).unwrap(), b"original");
    }

    #[test]
    fn test_commit_replaces_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out.bin");
        fs::write(&dest, b"old").unwrap();

        let mut saver = StreamSaver::create(dest.clone()).unwrap();
        saver.write_all(b"new").unwrap();
        saver.commit().unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn test_io_copy_through_saver() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("copied.bin");
        let content = vec![0x5au8; 64 * 1024];

        let mut saver = StreamSaver::create(dest.clone()).unwrap();
        let copied = io::copy(&mut content.as_slice(), &mut saver).unwrap();
        saver.commit().unwrap();

        assert_eq!(copied, content.len() as u64);
        assert_eq!(fs::read(&dest).unwrap(), content);
    }

    #[test]
    fn test_part_path_naming() {
        assert_eq!(
            part_path(Path::new("/a/b/report.pdf")),
            PathBuf::from("/a/b/report.pdf.part")
        );
        assert_eq!(
            part_path(Path::new("/a/noext")),
            PathBuf::from("/a/noext.part")
        );
    }
}
