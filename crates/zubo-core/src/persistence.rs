//! Save/Load of in-progress sessions
//!
//! A [`Snapshot`] is the session plus the ids of the deck it is playing,
//! encoded with bincode. Questions themselves are not stored; they are looked
//! up in the question bank again when a snapshot is resumed.
//!
//! Where snapshots live is up to the caller: anything implementing
//! [`SessionStore`] can be attached to the engine.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zubo_logic::session::GameSession;

/// Version number for snapshot format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable state of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub session: GameSession,
    /// Question ids in deck order.
    pub deck: Vec<u32>,
}

impl Snapshot {
    pub fn new(session: GameSession, deck: Vec<u32>) -> Self {
        Self {
            version: SAVE_VERSION,
            session,
            deck,
        }
    }
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    /// The snapshot's deck names a question the bank does not have.
    #[error("Unknown question id {0} in saved deck")]
    UnknownQuestion(u32),
}

/// Write a snapshot to a writer
pub fn save_snapshot<W: Write>(writer: W, snapshot: &Snapshot) -> Result<(), SaveError> {
    bincode::serialize_into(writer, snapshot)?;
    Ok(())
}

/// Read a snapshot from a reader, rejecting other format versions
pub fn load_snapshot<R: Read>(reader: R) -> Result<Snapshot, SaveError> {
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: snapshot.version,
        });
    }

    Ok(snapshot)
}

/// Somewhere to keep the snapshot of the current run.
pub trait SessionStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), SaveError>;
    /// `Ok(None)` when nothing has been saved.
    fn load(&self) -> Result<Option<Snapshot>, SaveError>;
    fn clear(&mut self) -> Result<(), SaveError>;
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded size of the saved snapshot, if any.
    pub fn saved_len(&self) -> Option<usize> {
        self.slot.borrow().as_ref().map(Vec::len)
    }

    /// Replace the stored bytes directly.
    pub fn put_raw(&self, bytes: Vec<u8>) {
        *self.slot.borrow_mut() = Some(bytes);
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, snapshot)?;
        *self.slot.borrow_mut() = Some(buffer);
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, SaveError> {
        match self.slot.borrow().as_deref() {
            Some(bytes) => load_snapshot(bytes).map(Some),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}

/// Snapshot kept in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), SaveError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        save_snapshot(&mut writer, snapshot)?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, SaveError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        load_snapshot(BufReader::new(file)).map(Some)
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zubo_logic::config::GameRules;
    use zubo_logic::persona::{add_weight, Persona};
    use zubo_logic::progression::Answer;
    use zubo_logic::session::AnswerRecord;

    fn played_session() -> GameSession {
        let rules = GameRules::default();
        let mut session = GameSession::new(&rules);
        session.start(&rules);
        session.score = 12;
        session.answered_count = 14;
        session.question_index = 14;
        session.time_bank = session.time_bank.deposit(640);
        add_weight(&mut session.persona_tally, Persona::Explorer, 3);
        session.history.push(AnswerRecord {
            question_id: 9,
            answer: Answer::Timeout,
            elapsed_ms: 60_000,
            correct: false,
            seconds_earned: 0,
        });
        session.open_store();
        session
    }

    #[test]
    fn test_save_load_roundtrip() {
        let snapshot = Snapshot::new(played_session(), vec![4, 8, 15, 16, 23, 42]);

        let mut save_buffer = Vec::new();
        save_snapshot(&mut save_buffer, &snapshot).expect("Save failed");
        let loaded = load_snapshot(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_version_mismatch() {
        let mut snapshot = Snapshot::new(played_session(), vec![1]);
        snapshot.version = SAVE_VERSION + 1;
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &snapshot).unwrap();

        match load_snapshot(&buffer[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_data() {
        let snapshot = Snapshot::new(played_session(), vec![1, 2, 3]);
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &snapshot).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            load_snapshot(&buffer[..]),
            Err(SaveError::Bincode(_))
        ));
    }

    #[test]
    fn test_memory_store_shares_slot() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        assert!(handle.load().unwrap().is_none());

        let snapshot = Snapshot::new(played_session(), vec![7]);
        store.save(&snapshot).unwrap();
        assert!(handle.saved_len().unwrap() > 0);
        assert_eq!(handle.load().unwrap(), Some(snapshot));

        store.clear().unwrap();
        assert!(handle.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store() {
        let path = std::env::temp_dir().join(format!("zubo-file-store-{}.bin", std::process::id()));
        let mut store = FileStore::new(&path);
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        let snapshot = Snapshot::new(played_session(), vec![3, 1, 2]);
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));

        store.clear().unwrap();
        assert!(!path.exists());
        // clearing twice is fine
        store.clear().unwrap();
    }
}
