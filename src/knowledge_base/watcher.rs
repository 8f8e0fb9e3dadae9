//! Polling-based knowledge base file watcher.
//!
//! Checks the watched files' mtimes every `poll_interval`. When any changes,
//! debounces (to handle partial writes from editors), re-checks, then calls
//! `KnowledgeStore::reload()`. A failed reload keeps the previous snapshot.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::KnowledgeStore;

type MtimeMap = HashMap<PathBuf, Option<SystemTime>>;

/// Run the watcher loop until `cancel` fires.
pub async fn run_watcher(
    store: Arc<KnowledgeStore>,
    poll_interval: Duration,
    debounce: Duration,
    cancel: CancellationToken,
) {
    let paths = store.watched_paths();
    if paths.is_empty() {
        info!("Knowledge base source has no files to watch");
        return;
    }
    info!(files = paths.len(), "Knowledge base watcher started");

    let mut last_seen = scan(&paths);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("Knowledge base watcher stopping");
                return;
            }
            () = tokio::time::sleep(poll_interval) => {}
        }

        let current = scan(&paths);
        if current == last_seen {
            continue;
        }
        for (path, mtime) in &current {
            match (last_seen.get(path).copied().flatten(), mtime) {
                (_, None) => warn!(path = %path.display(), "Knowledge base file not accessible"),
                (None, Some(_)) => info!(path = %path.display(), "Knowledge base file appeared"),
                (Some(prev), Some(now)) if prev != *now => {
                    info!(path = %path.display(), "Knowledge base file modified");
                }
                _ => {}
            }
        }

        // Debounce: wait, then make sure the write has settled
        tokio::time::sleep(debounce).await;
        let settled = scan(&paths);
        if settled != current {
            continue;
        }
        last_seen = settled;

        // A missing file would only fail the reload; wait for it to come back.
        if last_seen.values().any(Option::is_none) {
            continue;
        }

        if let Err(e) = store.reload() {
            error!(error = %e, "Knowledge base reload failed — keeping previous snapshot");
        }
    }
}

fn scan(paths: &[PathBuf]) -> MtimeMap {
    paths.iter().map(|p| (p.clone(), mtime(p))).collect()
}

/// Modification time of a file, None on any error.
fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
}
