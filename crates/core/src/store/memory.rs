//! In-memory content store.
//!
//! Same contract as the git store, without history. Used by tests and by callers that want a
//! scratch site.

use super::{
    check_revision, file_name, join, normalise_dir, normalise_path, CommitMessage, ContentStore,
    DirEntry, EntryKind, RepoEntry, RepositoryHost, Revision, StoredFile,
};
use crate::error::{CmsError, CmsResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug)]
struct MemoryFile {
    content: String,
    revision: Revision,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, MemoryFile>,
    log: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    state: Mutex<MemoryState>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit messages of every successful write, oldest first.
    pub fn commit_log(&self) -> Vec<String> {
        self.lock().log.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentStore for MemoryContentStore {
    fn get(&self, path: &str) -> CmsResult<StoredFile> {
        let path = normalise_path(path)?;
        let state = self.lock();
        let file = state
            .files
            .get(&path)
            .ok_or_else(|| CmsError::NotFound(path.clone()))?;

        Ok(StoredFile {
            content: file.content.clone(),
            revision: file.revision.clone(),
            path,
        })
    }

    fn put(
        &self,
        path: &str,
        content: &str,
        revision: Option<&Revision>,
        message: &CommitMessage,
    ) -> CmsResult<Revision> {
        let path = normalise_path(path)?;
        let mut state = self.lock();

        let prefix = format!("{path}/");
        if state.files.keys().any(|k| k.starts_with(&prefix)) {
            return Err(CmsError::InvalidInput(format!("'{path}' is a directory")));
        }
        let current = state.files.get(&path).map(|f| &f.revision);
        check_revision(&path, current, revision)?;

        let new_revision = Revision::of_content(content.as_bytes())?;
        state.files.insert(
            path,
            MemoryFile {
                content: content.to_string(),
                revision: new_revision.clone(),
            },
        );
        state.log.push(message.as_str().to_string());

        Ok(new_revision)
    }

    fn delete(&self, path: &str, revision: &Revision, message: &CommitMessage) -> CmsResult<()> {
        let path = normalise_path(path)?;
        let mut state = self.lock();

        let current = state
            .files
            .get(&path)
            .map(|f| &f.revision)
            .ok_or_else(|| CmsError::NotFound(path.clone()))?;
        check_revision(&path, Some(current), Some(revision))?;

        state.files.remove(&path);
        state.log.push(message.as_str().to_string());
        Ok(())
    }

    fn list(&self, dir: &str) -> CmsResult<Vec<DirEntry>> {
        let dir = normalise_dir(dir)?;
        let state = self.lock();
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        // BTreeMap keeps names ordered; a directory shows up once however many files it holds.
        let mut children: BTreeMap<String, DirEntry> = BTreeMap::new();
        for (path, file) in state.files.range(prefix.clone()..) {
            let Some(rest) = path.strip_prefix(&prefix) else {
                break;
            };
            match rest.split_once('/') {
                Some((child_dir, _)) => {
                    children
                        .entry(child_dir.to_string())
                        .or_insert_with(|| DirEntry {
                            name: child_dir.to_string(),
                            path: join(&dir, child_dir),
                            kind: EntryKind::Dir,
                            revision: None,
                        });
                }
                None => {
                    children.insert(
                        rest.to_string(),
                        DirEntry {
                            name: file_name(path).to_string(),
                            path: path.clone(),
                            kind: EntryKind::File,
                            revision: Some(file.revision.clone()),
                        },
                    );
                }
            }
        }

        if children.is_empty() && !dir.is_empty() {
            return Err(CmsError::NotFound(dir));
        }
        Ok(children.into_values().collect())
    }
}

/// A set of named in-memory repositories.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    repos: Mutex<BTreeMap<String, Arc<MemoryContentStore>>>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty repository, or return the existing one with that name.
    pub fn insert(&self, name: &str) -> Arc<MemoryContentStore> {
        let mut repos = self.repos.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(repos.entry(name.to_string()).or_default())
    }
}

impl RepositoryHost for MemoryWorkspace {
    fn list_repos(&self) -> CmsResult<Vec<RepoEntry>> {
        let repos = self.repos.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(repos
            .keys()
            .map(|name| RepoEntry {
                name: name.clone(),
                path: name.clone(),
            })
            .collect())
    }

    fn open(&self, name: &str) -> CmsResult<Arc<dyn ContentStore>> {
        let repos = self.repos.lock().unwrap_or_else(PoisonError::into_inner);
        let store = repos
            .get(name)
            .cloned()
            .ok_or_else(|| CmsError::NotFound(format!("repository '{name}'")))?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg() -> CommitMessage {
        CommitMessage::new("test").unwrap()
    }

    #[test]
    fn put_get_delete_follow_revision_rules() {
        let store = MemoryContentStore::new();
        let rev = store.put("a.md", "one", None, &msg()).unwrap();

        assert!(matches!(
            store.put("a.md", "two", None, &msg()),
            Err(CmsError::Conflict(_))
        ));
        let rev2 = store.put("a.md", "two", Some(&rev), &msg()).unwrap();
        assert_ne!(rev, rev2);
        assert!(matches!(
            store.delete("a.md", &rev, &msg()),
            Err(CmsError::Conflict(_))
        ));

        store.delete("a.md", &rev2, &msg()).unwrap();
        assert!(matches!(store.get("a.md"), Err(CmsError::NotFound(_))));
        assert!(matches!(
            store.delete("a.md", &rev2, &msg()),
            Err(CmsError::NotFound(_))
        ));
        assert_eq!(store.commit_log().len(), 3);
    }

    #[test]
    fn revisions_match_git_blob_ids() {
        let store = MemoryContentStore::new();
        let rev = store.put("a.md", "hello\n", None, &msg()).unwrap();
        assert_eq!(rev.as_str(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn list_groups_nested_files_into_directories() {
        let store = MemoryContentStore::new();
        for path in ["pages/b.md", "pages/a.md", "pages/sub/c.md", "pages/sub/d.md", "pagesx.md"] {
            store.put(path, "x", None, &msg()).unwrap();
        }

        let entries = store.list("pages").unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md", "sub"]);
        assert_eq!(entries[2].kind, EntryKind::Dir);
        assert_eq!(entries[2].path, "pages/sub");

        let root: Vec<_> = store
            .list("")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(root, vec!["pages", "pagesx.md"]);

        assert!(matches!(store.list("missing"), Err(CmsError::NotFound(_))));
    }

    #[test]
    fn workspace_opens_inserted_repositories_only() {
        let workspace = MemoryWorkspace::new();
        workspace.insert("site");

        assert_eq!(workspace.list_repos().unwrap().len(), 1);
        assert!(workspace.open("site").is_ok());
        assert!(matches!(workspace.open("other"), Err(CmsError::NotFound(_))));
    }
}
