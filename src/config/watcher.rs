//! Route table file watcher.
//!
//! # Responsibilities
//! - Notice every save of the config file, including editors that write a
//!   temporary file and rename it over the original
//! - Reload and validate on each save
//! - Report the outcome, good or bad, to whoever applies updates
//!
//! # Design Decisions
//! - The parent directory is watched, not the file: a rename-over replaces
//!   the inode and a file-level watch would go silent after the first save
//! - Events are filtered by file name, so siblings in the directory are ignored
//! - Failed reloads are sent too, so the receiver decides how to report them

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::DispatchConfig;

/// One reload attempt.
pub type ConfigUpdate = Result<DispatchConfig, ConfigError>;

/// Watches a route table file and sends every reload attempt.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<ConfigUpdate>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ConfigUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                updates,
            },
            rx,
        )
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_dir(&self.path).to_path_buf();
        let Some(file_name) = self.path.file_name().map(OsString::from) else {
            return Err(notify::Error::path_not_found().add_path(self.path));
        };

        let path = self.path.clone();
        let updates = self.updates;
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_save_of(&event, &file_name) => {
                    tracing::info!(path = ?path, kind = ?event.kind, "Route table changed, reloading");
                    let update = load_config(&path);
                    if let Err(e) = &update {
                        tracing::debug!(path = ?path, error = %e, "Reload attempt failed");
                    }
                    let _ = updates.send(update);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, dir = ?dir, "Route table watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// A content change, creation or rename that lands on the watched file.
fn is_save_of(event: &Event, file_name: &OsStr) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};
    use std::fs;

    const V1: &str = "[[routes]]\npath = \"/v1\"\nhandlers = [\"text:one\"]\n";
    const V2: &str = "[[routes]]\npath = \"/v2\"\nhandlers = [\"text:two\"]\n";

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_is_save_of_filters_by_name_and_kind() {
        let name = OsStr::new("routes.toml");
        let write = || EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert!(is_save_of(&event(write(), "/etc/app/routes.toml"), name));
        assert!(is_save_of(
            &event(EventKind::Create(CreateKind::File), "/etc/app/routes.toml"),
            name
        ));
        assert!(!is_save_of(&event(write(), "/etc/app/routes.toml.swp"), name));
        assert!(!is_save_of(
            &event(EventKind::Remove(RemoveKind::File), "/etc/app/routes.toml"),
            name
        ));
        assert!(!is_save_of(
            &event(EventKind::Access(AccessKind::Any), "/etc/app/routes.toml"),
            name
        ));
    }

    #[test]
    fn test_watch_dir_of_bare_file_name() {
        assert_eq!(watch_dir(Path::new("routes.toml")), Path::new("."));
        assert_eq!(watch_dir(Path::new("/etc/app/routes.toml")), Path::new("/etc/app"));
    }

    async fn next_routes_path(rx: &mut mpsc::UnboundedReceiver<ConfigUpdate>, want: &str) {
        let wait = async {
            loop {
                match rx.recv().await {
                    Some(Ok(config))
                        if config.routes.first().map(|r| r.path.as_str()) == Some(want) =>
                    {
                        return
                    }
                    Some(_) => continue,
                    None => panic!("watcher channel closed"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(10), wait)
            .await
            .expect("no matching config update");
    }

    #[tokio::test]
    async fn test_rename_over_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        fs::write(&path, V1).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _guard = watcher.run().unwrap();

        let staged = dir.path().join("routes.toml.tmp");
        fs::write(&staged, V2).unwrap();
        fs::rename(&staged, &path).unwrap();
        next_routes_path(&mut rx, "/v2").await;

        // The watch survives the inode swap.
        fs::write(&path, V1).unwrap();
        next_routes_path(&mut rx, "/v1").await;
    }

    #[tokio::test]
    async fn test_invalid_save_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.toml");
        fs::write(&path, V1).unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _guard = watcher.run().unwrap();

        fs::write(&path, "[[routes]]\npath = \"nope\"\nhandlers = []\n").unwrap();

        // A truncate-then-write save can report the empty file first.
        let wait = async {
            loop {
                match rx.recv().await {
                    Some(Err(e)) => return e,
                    Some(Ok(_)) => continue,
                    None => panic!("watcher channel closed"),
                }
            }
        };
        let err = tokio::time::timeout(Duration::from_secs(10), wait)
            .await
            .expect("no failed reload reported");
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
