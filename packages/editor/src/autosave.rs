//! Debounced autosave.
//!
//! Each committed change is handed to a background task through a `watch`
//! channel, so only the newest pending state is ever kept. The task waits
//! until no change has arrived for the debounce interval, then writes the
//! state it holds at that moment.

use std::time::Duration;

use arnika_model::Project;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::history::History;
use crate::persistence::{self, KeyValueStore, SaveStatus};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Project and history as of one committed change
#[derive(Debug, Clone)]
struct PendingState {
    project: Option<Project>,
    history: History,
}

/// Handle to the autosave task. Dropping it without calling
/// [`Autosave::shutdown`] still lets the task flush the last change.
pub struct Autosave {
    changes: watch::Sender<Option<PendingState>>,
    status: watch::Receiver<SaveStatus>,
    task: JoinHandle<()>,
}

impl Autosave {
    /// Start the autosave task on the current tokio runtime
    pub fn spawn<S>(store: S, debounce: Duration) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let (changes, rx) = watch::channel(None);
        let (status_tx, status) = watch::channel(SaveStatus::Saved);
        let task = tokio::spawn(run(store, debounce, rx, status_tx));

        Self {
            changes,
            status,
            task,
        }
    }

    /// Report a committed change. Restarts the debounce timer.
    pub fn notify(&self, project: Option<&Project>, history: &History) {
        self.changes.send_replace(Some(PendingState {
            project: project.cloned(),
            history: history.clone(),
        }));
    }

    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Flush any pending change and wait for the task to finish
    pub async fn shutdown(self) -> SaveStatus {
        let Autosave {
            changes,
            status,
            task,
        } = self;
        drop(changes);

        if let Err(e) = task.await {
            warn!(error = %e, "autosave task ended abnormally");
        }
        let last = *status.borrow();
        last
    }
}

async fn run<S: KeyValueStore>(
    store: S,
    debounce: Duration,
    mut changes: watch::Receiver<Option<PendingState>>,
    status: watch::Sender<SaveStatus>,
) {
    loop {
        if changes.changed().await.is_err() {
            break;
        }

        let has_project = changes
            .borrow()
            .as_ref()
            .is_some_and(|s| s.project.is_some());
        if has_project {
            status.send_replace(SaveStatus::Saving);
        }

        // Quiescence: every further change restarts the timer
        let mut closed = false;
        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        closed = true;
                        break;
                    }
                }
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        let pending = changes.borrow_and_update().clone();
        if let Some(PendingState {
            project: Some(project),
            history,
        }) = pending
        {
            match persistence::save(&store, &project, &history) {
                Ok(()) => {
                    status.send_replace(SaveStatus::Saved);
                }
                Err(e) => {
                    warn!(error = %e, "autosave failed, keeping state in memory");
                    status.send_replace(SaveStatus::Idle);
                }
            }
        } else {
            debug!("no project open, skipping autosave");
        }

        if closed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::persistence::{MemoryStore, PROJECT_KEY};
    use crate::store;
    use arnika_model::{template, Template};

    #[tokio::test(start_paused = true)]
    async fn test_debounce_writes_latest_state() {
        let storage = Arc::new(MemoryStore::new());
        let autosave = Autosave::spawn(storage.clone(), DEFAULT_DEBOUNCE);
        let history = History::new();

        let first = template(Template::Pitch);
        let second = store::update_slide_title(&first, "s1", "Latest");

        autosave.notify(Some(&first), &history);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(autosave.status(), SaveStatus::Saving);

        autosave.notify(Some(&second), &history);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(storage.get(PROJECT_KEY).unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(autosave.status(), SaveStatus::Saved);
        let saved = Project::from_json(&storage.get(PROJECT_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_failure_goes_idle() {
        let storage = Arc::new(MemoryStore::with_quota(32));
        let autosave = Autosave::spawn(storage.clone(), DEFAULT_DEBOUNCE);
        let project = template(Template::Pitch);

        autosave.notify(Some(&project), &History::new());
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(autosave.status(), SaveStatus::Idle);
        assert!(storage.get(PROJECT_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending_change() {
        let storage = Arc::new(MemoryStore::new());
        let autosave = Autosave::spawn(storage.clone(), DEFAULT_DEBOUNCE);

        autosave.notify(Some(&template(Template::Portfolio)), &History::new());
        let status = autosave.shutdown().await;

        assert_eq!(status, SaveStatus::Saved);
        assert!(storage.get(PROJECT_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_write_without_project() {
        let storage = Arc::new(MemoryStore::new());
        let autosave = Autosave::spawn(storage.clone(), DEFAULT_DEBOUNCE);

        autosave.notify(None, &History::new());
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(autosave.status(), SaveStatus::Saved);
        assert!(storage.get(PROJECT_KEY).unwrap().is_none());
    }
}
