use std::{io::BufWriter, path::Path};

use crate::{
    compression::{compress_writer, Compression},
    event::Event,
    file::File,
};

/// Write events to a (potentially compressed) event stream file
///
/// The counterpart of [FileReader](crate::reader::FileReader): one
/// `E <id> <n>` header per event followed by one `P` line per
/// final-state particle.
pub struct EventWriter<T: std::io::Write>(T);

impl EventWriter<Box<dyn std::io::Write>> {
    pub fn try_new(
        filename: &Path,
        compression: Option<Compression>,
    ) -> Result<Self, std::io::Error> {
        let outfile = File::create(filename)?;
        let out = BufWriter::new(outfile);
        let out = compress_writer(out, compression)?;
        Ok(Self(out))
    }
}

impl<T: std::io::Write> EventWriter<T> {
    /// Append one event to the stream
    pub fn write(&mut self, event: &Event) -> Result<(), std::io::Error> {
        writeln!(self.0, "E {} {}", event.id(), event.particles().len())?;
        for particle in event.particles() {
            writeln!(
                self.0,
                "P {} {} {} {} {}",
                particle.id.id(),
                particle.p.pt(),
                particle.p.eta(),
                particle.p.phi(),
                particle.p.m(),
            )?;
        }
        Ok(())
    }

    /// Flush the stream
    pub fn finish(mut self) -> Result<(), std::io::Error> {
        self.0.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Particle;
    use crate::reader::FileReader;
    use noisy_float::prelude::*;
    use particle_id::ParticleID;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.dat");

        let events = vec![
            Event::new(
                0,
                vec![
                    Particle::from_pt_eta_phi_m(
                        ParticleID::new(211),
                        n64(10.),
                        n64(0.5),
                        n64(1.),
                        n64(0.139),
                    ),
                    Particle::from_pt_eta_phi_m(
                        ParticleID::new(22),
                        n64(35.),
                        n64(-2.1),
                        n64(4.),
                        n64(0.),
                    ),
                ],
            ),
            Event::new(1, vec![]),
        ];

        let mut writer = EventWriter::try_new(&path, None).unwrap();
        for event in &events {
            writer.write(event).unwrap();
        }
        writer.finish().unwrap();

        let reader =
            FileReader::new(crate::file::File::open(&path).unwrap()).unwrap();
        let read: Vec<_> = reader.map(|ev| ev.unwrap()).collect();
        assert_eq!(read.len(), events.len());
        for (written, read) in events.iter().zip(&read) {
            assert_eq!(written.id(), read.id());
            assert_eq!(written.particles().len(), read.particles().len());
            for (p, q) in written.particles().iter().zip(read.particles()) {
                assert_eq!(p.id, q.id);
                assert!((p.p.pt() - q.p.pt()).abs() < 1e-9);
                assert!((p.p.eta() - q.p.eta()).abs() < 1e-9);
            }
        }
    }
}
