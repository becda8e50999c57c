use std::io::{BufRead, BufReader, Seek};

use audec::auto_decompress;
use log::debug;
use noisy_float::prelude::*;
use nom::{character::complete::char, sequence::preceded};
use particle_id::ParticleID;
use thiserror::Error;

use crate::{
    event::{Event, Particle},
    file::File,
    parsing::{double_entry, i32_entry, u32_entry},
    traits::{Rewind, TryClone},
};

/// Reader for a single (potentially compressed) event stream file
///
/// The stream is the text format written by the generation stage: one
/// `E <id> <n>` header per event, followed by `n` lines
/// `P <pdg id> <pt> <eta> <phi> <mass>`. Blank lines and lines
/// starting with `#` are ignored.
pub struct FileReader {
    source: File,
    lines: Box<dyn BufRead>,
    line_nr: usize,
}

impl FileReader {
    /// Construct a reader for the given event stream file
    pub fn new(source: File) -> Result<Self, std::io::Error> {
        let cloned_source = source.try_clone()?;
        Ok(FileReader {
            source,
            lines: auto_decompress(BufReader::new(cloned_source)),
            line_nr: 0,
        })
    }

    fn next_interesting_line(
        &mut self,
    ) -> Option<Result<String, std::io::Error>> {
        loop {
            let mut line = String::new();
            match self.lines.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => self.line_nr += 1,
                Err(err) => return Some(Err(err)),
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                return Some(Ok(line));
            }
        }
    }

    fn parse_particle(&mut self) -> Result<Particle, EventReadError> {
        let line = match self.next_interesting_line() {
            Some(line) => line?,
            None => return Err(EventReadError::UnexpectedEof),
        };
        let parsed = preceded(
            char('P'),
            nom::sequence::tuple((
                i32_entry,
                double_entry,
                double_entry,
                double_entry,
                double_entry,
            )),
        )(line.as_str());
        match parsed {
            Ok((_rest, (id, pt, eta, phi, m))) => {
                Ok(Particle::from_pt_eta_phi_m(
                    ParticleID::new(id),
                    n64(pt),
                    n64(eta),
                    n64(phi),
                    n64(m),
                ))
            }
            Err(_) => Err(self.parse_error(line)),
        }
    }

    fn parse_error(&self, line: String) -> EventReadError {
        EventReadError::ParseError {
            line_nr: self.line_nr,
            line: line.trim_end().to_owned(),
        }
    }
}

impl Rewind for FileReader {
    type Error = RewindError;

    fn rewind(&mut self) -> Result<(), Self::Error> {
        use RewindError::*;
        self.source.rewind()?;
        let cloned_source = self.source.try_clone().map_err(CloneError)?;
        self.lines = auto_decompress(BufReader::new(cloned_source));
        self.line_nr = 0;
        Ok(())
    }
}

impl Iterator for FileReader {
    type Item = Result<Event, EventReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.next_interesting_line()? {
            Ok(line) => line,
            Err(err) => return Some(Err(err.into())),
        };
        let header = preceded(
            char('E'),
            nom::sequence::tuple((u32_entry, u32_entry)),
        )(line.as_str());
        let (id, nparticles) = match header {
            Ok((_rest, header)) => header,
            Err(_) => return Some(Err(self.parse_error(line))),
        };
        debug!("reading event {id} with {nparticles} particles");
        let mut particles = Vec::with_capacity(nparticles as usize);
        for _ in 0..nparticles {
            match self.parse_particle() {
                Ok(particle) => particles.push(particle),
                Err(err) => return Some(Err(err)),
            }
        }
        Some(Ok(Event::new(id as usize, particles)))
    }
}

/// Error rewinding an event stream
#[derive(Debug, Error)]
pub enum RewindError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Source clone error: {0}")]
    CloneError(std::io::Error),
}

/// Error reading an event
#[derive(Debug, Error)]
pub enum EventReadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse line {line_nr}: {line}")]
    ParseError { line_nr: usize, line: String },
    #[error("Unexpected end of event stream")]
    UnexpectedEof,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_for(content: &str) -> (tempfile::TempDir, FileReader) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.dat");
        std::fs::write(&path, content).unwrap();
        let reader = FileReader::new(File::open(path).unwrap()).unwrap();
        (dir, reader)
    }

    #[test]
    fn read_two_events() {
        let (_dir, mut reader) = reader_for(
            "# comment\n\
             E 0 2\n\
             P 211 10.0 0.5 1.0 0.139\n\
             P -211 20.0 -0.5 2.0 0.139\n\
             \n\
             E 1 0\n",
        );
        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.id(), 0);
        assert_eq!(first.particles().len(), 2);
        assert!((first.particles()[0].p.pt() - 10.).abs() < 1e-9);
        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.id(), 1);
        assert!(second.particles().is_empty());
        assert!(reader.next().is_none());
    }

    #[test]
    fn rewind_restarts() {
        let (_dir, mut reader) = reader_for("E 7 0\n");
        assert_eq!(reader.next().unwrap().unwrap().id(), 7);
        assert!(reader.next().is_none());
        reader.rewind().unwrap();
        assert_eq!(reader.next().unwrap().unwrap().id(), 7);
    }

    #[test]
    fn truncated_event() {
        let (_dir, mut reader) = reader_for("E 0 2\nP 22 1.0 0.0 0.0 0.0\n");
        assert!(matches!(
            reader.next(),
            Some(Err(EventReadError::UnexpectedEof))
        ));
    }

    #[test]
    fn malformed_line() {
        let (_dir, mut reader) = reader_for("E 0 1\nQ nonsense\n");
        assert!(matches!(
            reader.next(),
            Some(Err(EventReadError::ParseError { line_nr: 2, .. }))
        ));
    }
}
