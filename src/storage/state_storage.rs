use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;

use crate::{notify::ReminderBook, routine::store::RoutineStore};

pub const STATE_FILE_NAME: &str = "state.json";
const LOCK_FILE_NAME: &str = "state.json.lock";
const TEMP_FILE_NAME: &str = "state.json.tmp";

/// Everything the application remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub routines: RoutineStore,
    #[serde(default)]
    pub reminders: ReminderBook,
}

/// Interface for abstracting storage of the application state.
pub trait StateStorage {
    /// Reads the current state. A missing state is an empty one.
    fn load(&self) -> impl Future<Output = Result<AppState>>;

    /// Applies `change` to the stored state. The state is only written back when `change`
    /// succeeds.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut AppState) -> Result<T>,
    ) -> impl Future<Output = Result<T>>;
}

/// The main realization of [StateStorage].
///
/// The state file is replaced by renaming a fully written temporary file over it, so a crash
/// mid-write leaves the previous state intact. Locks are taken on a separate lock file because
/// the rename swaps out the state file itself.
pub struct StateStorageImpl {
    path: PathBuf,
    lock_path: PathBuf,
    temp_path: PathBuf,
}

impl StateStorageImpl {
    pub fn new(dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(STATE_FILE_NAME),
            lock_path: dir.join(LOCK_FILE_NAME),
            temp_path: dir.join(TEMP_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open_lock(&self) -> Result<File> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .await
            .with_context(|| format!("Failed to open lock file {:?}", self.lock_path))?;
        Ok(file)
    }

    async fn read_state(&self) -> Result<AppState> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state at {:?}, starting empty", self.path);
                return Ok(AppState::default());
            }
            Err(e) => Err(e)?,
        };
        if content.trim().is_empty() {
            return Ok(AppState::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to read state from {:?}", self.path))
    }

    async fn write_state(&self, state: &AppState) -> Result<()> {
        let buffer = serde_json::to_vec_pretty(state)?;
        let mut temp = File::create(&self.temp_path).await?;
        temp.write_all(&buffer).await?;
        temp.sync_all().await?;
        drop(temp);
        tokio::fs::rename(&self.temp_path, &self.path).await?;
        debug!("Saved state into {:?}", self.path);
        Ok(())
    }

    async fn update_locked<T>(&self, change: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
        let mut state = self.read_state().await?;
        let result = change(&mut state)?;
        self.write_state(&state).await?;
        Ok(result)
    }
}

impl StateStorage for StateStorageImpl {
    async fn load(&self) -> Result<AppState> {
        let lock = self.open_lock().await?;
        lock.lock_shared()?;
        let state = self.read_state().await;
        lock.unlock_async().await?;
        state
    }

    async fn update<T>(&self, change: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
        let lock = self.open_lock().await?;

        // Semi-safe acquire-release for a file
        lock.lock_exclusive()?;
        let result = self.update_locked(change).await;
        lock.unlock_async().await?;
        result
    }
}
