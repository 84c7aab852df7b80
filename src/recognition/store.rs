//! Persistent storage for named profiles

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::recognition::Profile;

/// Profile database with an explicit open / mutate / flush lifecycle.
///
/// The store is plain data owned by whoever opened it; nothing in the
/// crate holds one globally. Writes only reach disk on `flush` (or
/// `close`), never on individual mutations.
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
    dirty: bool,
}

impl ProfileStore {
    /// Open a store file, or start an empty store when the file does not
    /// exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::info!("Profile store {} not found, starting empty", path.display());
            return Ok(Self {
                path,
                profiles: BTreeMap::new(),
                dirty: false,
            });
        }

        let bytes = std::fs::read(&path)?;
        let profiles: BTreeMap<String, Profile> = bincode::deserialize(&bytes)?;
        log::info!(
            "Loaded {} profile(s) from {}",
            profiles.len(),
            path.display()
        );
        Ok(Self {
            path,
            profiles,
            dirty: false,
        })
    }

    /// Enroll a descriptor, creating the profile on first sight
    pub fn add_descriptor(&mut self, name: &str, descriptor: Vec<f32>) {
        self.profiles
            .entry(name.to_string())
            .or_insert_with(|| Profile::new(name))
            .descriptors
            .push(descriptor);
        self.dirty = true;
    }

    /// Remove a profile; returns whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.profiles.remove(name).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Iterate profiles in name order
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Write the store back to its file if anything changed
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let bytes = bincode::serialize(&self.profiles)?;
        std::fs::write(&self.path, bytes)?;
        self.dirty = false;
        log::debug!(
            "Wrote {} profile(s) to {}",
            self.profiles.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Flush and consume the store
    pub fn close(mut self) -> Result<()> {
        self.flush()
    }
}
