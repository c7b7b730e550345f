use super::LoadError;
use crate::db::Database;
use log::{info, warn};
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use tokio::time::Instant;

/// Virtual machine steps between deadline checks while a script runs.
const PROGRESS_INTERVAL: i32 = 1_000;

/// Removes a staged script once its load has committed.
pub type Remover = fn(&Path) -> io::Result<()>;

fn remove_staged(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path)
}

/// Executes staged SQL scripts against the shared database, one transaction
/// per script.
#[derive(Clone)]
pub struct BulkLoader {
    db: Database,
    remove: Remover,
}

impl BulkLoader {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            remove: remove_staged,
        }
    }

    /// Replace how staged files are deleted after a committed load.
    pub fn with_remover(mut self, remove: Remover) -> Self {
        self.remove = remove;
        self
    }

    /// Load `path` on a blocking thread, giving up at `deadline`.
    ///
    /// The deadline only acts on this load's own transaction. A load that gets
    /// the connection after the deadline returns `Timeout` without running. A
    /// script still executing at the deadline is stopped by a progress handler
    /// and rolled back. Other callers' queries on the shared connection are
    /// never interrupted.
    pub async fn load(
        &self,
        path: PathBuf,
        delete_after: bool,
        deadline: Instant,
    ) -> Result<(), LoadError> {
        let loader = self.clone();
        let std_deadline = deadline.into_std();
        tokio::task::spawn_blocking(move || {
            loader.load_until(&path, delete_after, Some(std_deadline))
        })
        .await
        .map_err(|e| LoadError::Task(e.to_string()))?
    }

    /// Read the whole script and run it in one transaction; delete the file
    /// afterwards only if the transaction committed.
    pub fn load_blocking(&self, path: &Path, delete_after: bool) -> Result<(), LoadError> {
        self.load_until(path, delete_after, None)
    }

    fn load_until(
        &self,
        path: &Path,
        delete_after: bool,
        deadline: Option<std::time::Instant>,
    ) -> Result<(), LoadError> {
        let script = std::fs::read_to_string(path).map_err(|source| LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let script = normalize_script(&script);
        let expired = || deadline.is_some_and(|d| std::time::Instant::now() >= d);

        {
            let mut conn = self.db.lock();
            if expired() {
                warn!("Loading {} passed its deadline before it started", path.display());
                return Err(LoadError::Timeout {
                    path: path.to_path_buf(),
                });
            }
            let tx = conn.transaction().map_err(|source| LoadError::Exec {
                path: path.to_path_buf(),
                source,
            })?;
            if let Some(deadline) = deadline {
                tx.progress_handler(
                    PROGRESS_INTERVAL,
                    Some(move || std::time::Instant::now() >= deadline),
                );
            }
            let executed = tx.execute_batch(&script);
            tx.progress_handler(0, None::<fn() -> bool>);

            // Dropping `tx` on error rolls back everything the script did.
            executed.map_err(|source| {
                if expired() {
                    warn!("Loading {} passed its deadline, rolled back", path.display());
                    LoadError::Timeout {
                        path: path.to_path_buf(),
                    }
                } else {
                    LoadError::Exec {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;
            tx.commit().map_err(|source| LoadError::Commit {
                path: path.to_path_buf(),
                source,
            })?;
        }
        info!("{} executed successfully.", path.display());

        if delete_after {
            (self.remove)(path).map_err(|source| LoadError::Cleanup {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Removed staged {}", path.display());
        }
        Ok(())
    }
}

/// Drop standalone transaction-control lines so a `sqlite3 .dump` script can run
/// inside the loader's own transaction.
///
/// Only whole lines such as `BEGIN TRANSACTION;` or `COMMIT;` are removed. A bare
/// `END;` is kept since it closes trigger bodies.
pub fn normalize_script(script: &str) -> Cow<'_, str> {
    if !script.lines().any(is_transaction_control) {
        return Cow::Borrowed(script);
    }
    let kept: Vec<&str> = script
        .lines()
        .filter(|line| !is_transaction_control(line))
        .collect();
    Cow::Owned(kept.join("\n"))
}

fn is_transaction_control(line: &str) -> bool {
    let line = line.trim();
    let Some(stmt) = line.strip_suffix(';') else {
        return false;
    };
    let upper = stmt.to_ascii_uppercase();
    let words: Vec<&str> = upper.split_whitespace().collect();
    matches!(
        words.as_slice(),
        ["BEGIN"]
            | ["BEGIN", "TRANSACTION"]
            | ["BEGIN", "DEFERRED" | "IMMEDIATE" | "EXCLUSIVE"]
            | ["BEGIN", "DEFERRED" | "IMMEDIATE" | "EXCLUSIVE", "TRANSACTION"]
            | ["COMMIT"]
            | ["COMMIT", "TRANSACTION"]
            | ["END", "TRANSACTION"]
    )
}
