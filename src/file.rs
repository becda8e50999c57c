use std::io::{Read, Result, Seek, SeekFrom, Write};
use std::path::Path;

use crate::traits::TryClone;

/// This is a newtype wrapper around [std::fs::File]
///
/// The only reason for this is that we cannot implement
/// [TryClone](crate::traits::TryClone) on [std::fs::File]
#[derive(Debug)]
pub struct File(pub std::fs::File);

impl TryClone for File {
    type Error = std::io::Error;

    fn try_clone(&self) -> Result<Self> {
        std::fs::File::try_clone(&self.0).map(File)
    }
}

impl File {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<File> {
        std::fs::File::open(path).map(Self)
    }

    pub fn create<P: AsRef<Path>>(path: P) -> Result<File> {
        std::fs::File::create(path).map(Self)
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf)
    }
}

impl Seek for File {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.0.seek(pos)
    }
}

impl Write for File {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.0.flush()
    }
}
