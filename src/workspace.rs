//! Per-request scratch directories.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// A directory owned by one request.
///
/// The directory is removed when the workspace is dropped, unless the
/// request finished successfully (`commit`) and the server keeps outputs.
/// A commit after the workspace's deadline does not count.
pub struct Workspace {
    id: Uuid,
    dir: PathBuf,
    retain: bool,
    deadline: Option<Instant>,
    committed: bool,
}

impl Workspace {
    pub fn create(root: &Path, retain: bool) -> io::Result<Self> {
        let id = Uuid::new_v4();
        let dir = root.join(id.to_string());
        std::fs::create_dir_all(&dir)?;
        debug!(session = %id, dir = %dir.display(), "created workspace");

        Ok(Workspace {
            id,
            dir,
            retain,
            deadline: None,
            committed: false,
        })
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save an uploaded input.
    pub fn stage(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.write(&format!("upload_{}", file_name(name)), bytes)
    }

    /// Save a produced file under the name reported to the client.
    pub fn write_output(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.write(file_name(name), bytes)
    }

    /// Mark the request as successful.
    pub fn commit(mut self) -> Uuid {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                debug!(session = %self.id, "deadline passed, discarding outputs");
            }
            _ => self.committed = true,
        }
        self.id
    }

    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.committed && self.retain {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            warn!(session = %self.id, error = %e, "failed to remove workspace");
        }
    }
}

/// Resolve `<root>/<session>/<name>` for a retained output, refusing
/// anything that would step outside the session directory.
pub fn retained_file(root: &Path, session: &str, name: &str) -> Option<PathBuf> {
    let session = Uuid::parse_str(session).ok()?;
    if name.is_empty() || file_name(name) != name || name.starts_with('.') {
        return None;
    }
    Some(root.join(session.to_string()).join(name))
}

/// Last path component of a client-supplied name.
fn file_name(name: &str) -> &str {
    name.rsplit(&['/', '\\'][..]).next().unwrap_or(name)
}
