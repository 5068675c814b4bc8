//! Stored editing state of the current directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use arnika_editor::{storage, Autosave, EditSession, FileStore, SaveStatus};
use tracing::debug;

use crate::config::Config;

pub struct Workspace {
    pub config: Config,
    store: Arc<FileStore>,
}

impl Workspace {
    pub fn open(cwd: &Path) -> Result<Self> {
        let config = Config::load(cwd)?;
        let store = Arc::new(FileStore::new(config.get_store_dir(cwd)));
        Ok(Self { config, store })
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store.dir().to_path_buf()
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Resume the stored session (possibly without a project)
    pub fn session(&self) -> EditSession {
        EditSession::from_restored(storage::restore(self.store.as_ref()))
    }

    /// Resume the stored session, failing when no project is open
    pub fn session_with_project(&self) -> Result<EditSession> {
        let session = self.session();
        if session.project().is_none() {
            return Err(anyhow!(
                "No project open. Run `arnika init` or `arnika import <file>` first"
            ));
        }
        Ok(session)
    }

    /// Write the session back through the autosave runner
    pub async fn persist(&self, session: &EditSession) -> Result<()> {
        let Some(project) = session.project() else {
            storage::save_history(self.store.as_ref(), session.history())?;
            return Ok(());
        };

        let autosave = Autosave::spawn(self.store.clone(), self.config.debounce());
        autosave.notify(Some(project), session.history());
        let status = autosave.shutdown().await;
        debug!(%status, "persisted session");

        if status != SaveStatus::Saved {
            bail!("Could not write to {}", self.store.dir().display());
        }
        Ok(())
    }
}
