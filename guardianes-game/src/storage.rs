//! Client-local slot remembering the last player name.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

use crate::player::PlayerName;

/// Where the last signed-in player name is kept between runs.
///
/// The session reads it on resume and clears it on sign-out.
pub trait NameSlot {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored name, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn load(&self) -> Result<Option<PlayerName>, Self::Error>;

    /// Remember `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    fn store(&self, name: &PlayerName) -> Result<(), Self::Error>;

    /// Forget the stored name.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be cleared.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Slot kept in memory. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryNameSlot {
    name: Rc<RefCell<Option<PlayerName>>>,
}

impl MemoryNameSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameSlot for MemoryNameSlot {
    type Error = Infallible;

    fn load(&self) -> Result<Option<PlayerName>, Self::Error> {
        Ok(self.name.borrow().clone())
    }

    fn store(&self, name: &PlayerName) -> Result<(), Self::Error> {
        *self.name.borrow_mut() = Some(name.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        self.name.borrow_mut().take();
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum FileSlotError {
    #[error("name slot I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("name slot is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SlotDocument {
    player_name: PlayerName,
}

/// Slot persisted as `{ "player_name": ... }` at a single path.
#[derive(Debug, Clone)]
pub struct FileNameSlot {
    path: PathBuf,
}

impl FileNameSlot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NameSlot for FileNameSlot {
    type Error = FileSlotError;

    fn load(&self) -> Result<Option<PlayerName>, Self::Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let doc: SlotDocument = serde_json::from_str(&raw)?;
        Ok(Some(doc.player_name))
    }

    fn store(&self, name: &PlayerName) -> Result<(), Self::Error> {
        let doc = SlotDocument {
            player_name: name.clone(),
        };
        fs::write(&self.path, serde_json::to_string(&doc)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
