use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use audec::auto_decompress;
use log::{debug, trace};
use serde::Deserialize;
use thiserror::Error;

use crate::event::Event;

/// Reader for a stream of YAML documents, one event per document
///
/// Events without an explicit id are numbered by their position in the
/// stream, starting at zero. The reader stops after the first error.
pub struct EventReader {
    docs: serde_yaml::Deserializer<'static>,
    pos: usize,
    failed: bool,
}

impl EventReader {
    /// Read events from a source that may be compressed
    pub fn new(source: impl BufRead + 'static) -> Self {
        Self {
            docs: serde_yaml::Deserializer::from_reader(auto_decompress(source)),
            pos: 0,
            failed: false,
        }
    }

    /// Read events from the (potentially compressed) file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CreateError> {
        let path = path.as_ref();
        debug!("Reading events from {path:?}");
        let file = std::fs::File::open(path)
            .map_err(|err| CreateError(path.to_owned(), err))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl Iterator for EventReader {
    type Item = Result<Event, EventReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let doc = self.docs.next()?;
        let pos = self.pos;
        self.pos += 1;
        match Event::deserialize(doc) {
            Ok(mut event) => {
                event.id.get_or_insert(pos);
                trace!("Read event {pos}: {event:?}");
                Some(Ok(event))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(EventReadError { pos, err }))
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to open {0:?}: {1}")]
pub struct CreateError(PathBuf, #[source] std::io::Error);

#[derive(Debug, Error)]
#[error("Failed to read event at position {pos}: {err}")]
pub struct EventReadError {
    pos: usize,
    #[source]
    err: serde_yaml::Error,
}

impl EventReadError {
    /// Position of the offending document in the input
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{Cursor, Write};

    use noisy_float::prelude::*;

    const EVENTS: &str = "
weight: 0.5
electrons:
  - lepton: { pid: 11, charge: -1, p: [50., 30., 0., 40.] }
    photons:
      - { pid: 22, p: [1., 1., 0., 0.] }
muons:
  - lepton: { pid: -13, charge: 1, p: [40., 0., 40., 0.] }
jets:
  - [100., 0., -60., 80.]
missing_momentum: [20., 20., 0., 0.]
unstable:
  - { pid: 521, charge: 1, p: [20., 0., -12., 15.], children: [-421, 211] }
  - { pid: 511, p: [20., 0., 12., 15.] }
---
id: 7
weight: -1
---
{}
";

    #[test]
    fn read_stream() {
        let _ = env_logger::builder().is_test(true).try_init();
        let events: Vec<_> = EventReader::new(Cursor::new(EVENTS))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events.len(), 3);

        let ev = &events[0];
        assert_eq!(ev.id(), Some(0));
        assert_eq!(ev.weight, n64(0.5));
        assert_eq!(ev.electrons.len(), 1);
        assert_eq!(ev.electrons[0].charge(), -1);
        assert_eq!(ev.electrons[0].photons.len(), 1);
        assert_eq!(ev.electrons[0].photons[0].charge, 0);
        assert_eq!(ev.muons[0].pid().id(), -13);
        assert_eq!(ev.jets.len(), 1);
        assert_eq!(ev.missing_momentum.pt(), n64(20.));
        assert_eq!(ev.unstable.len(), 2);
        assert_eq!(ev.unstable[0].children.as_ref().map(|c| c.len()), Some(2));
        assert_eq!(ev.unstable[1].children, None);

        assert_eq!(events[1].id(), Some(7));
        assert_eq!(events[1].weight, n64(-1.));
        assert_eq!(events[2].id(), Some(2));
        assert_eq!(events[2].weight, n64(1.));
        assert!(events[2].jets.is_empty());
    }

    #[test]
    fn read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EVENTS.as_bytes()).unwrap();
        let reader = EventReader::from_file(file.path()).unwrap();
        assert_eq!(reader.count(), 3);

        assert!(EventReader::from_file("/nonexistent/events.yml").is_err());
    }

    #[test]
    fn bad_event() {
        let yaml = "weight: 1\n---\njets: 3\n---\nweight: 2\n";
        let mut reader = EventReader::new(Cursor::new(yaml));
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.position(), 1);
        assert!(reader.next().is_none());
    }
}
