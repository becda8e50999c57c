use crate::storage::RunRecord;

/// Reset a reader to the start of its event stream
pub trait Rewind {
    type Error;

    fn rewind(&mut self) -> Result<(), Self::Error>;
}

/// Fallible duplication of an I/O handle
pub trait TryClone {
    type Error;

    fn try_clone(&self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

/// Persist the accumulated output of a run
///
/// Called exactly once, after the event loop has completed.
pub trait WriteRun {
    type Error;

    fn write(&mut self, run: &RunRecord) -> Result<(), Self::Error>;
}

/// Progress indicator
pub trait Progress {
    fn inc(&self, i: u64);
    fn finish(&self);
}
