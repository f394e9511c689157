//! Content store backed by a local git repository (`git2`/libgit2).
//!
//! Reads come from the tree of `HEAD`, never from the working directory, so uncommitted edits on
//! disk are invisible. Each `put` and `delete` writes the working file, stages exactly that path
//! and creates one commit on the current branch. If staging or committing fails, the working file
//! is restored to what `HEAD` holds.
//!
//! Repositories created here standardise on `refs/heads/main`.

use super::{
    check_revision, join, normalise_dir, normalise_path, CommitMessage, ContentStore,
    DirEntry, EntryKind, RepoEntry, RepositoryHost, Revision, StoredFile,
};
use crate::author::CommitAuthor;
use crate::constants::MAIN_REF;
use crate::error::{CmsError, CmsResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A single git repository used as a content store.
///
/// The repository handle sits behind a mutex: writers to one store are serialised, and the
/// revision check and the commit happen under the same lock.
pub struct GitContentStore {
    repo: Mutex<git2::Repository>,
    workdir: PathBuf,
    author: CommitAuthor,
}

impl GitContentStore {
    /// Create a new repository at `workdir` with `HEAD` pointing at an unborn `main`.
    pub fn init(workdir: &Path, author: CommitAuthor) -> CmsResult<Self> {
        let repo = git2::Repository::init(workdir).map_err(CmsError::GitInit)?;
        repo.set_head(MAIN_REF).map_err(CmsError::GitSetHead)?;
        Self::from_repo(repo, author, CmsError::GitInit)
    }

    /// Open the repository whose working directory is exactly `workdir`.
    ///
    /// Parent directories are not searched, so a content root nested inside another checkout
    /// never resolves to the outer repository.
    pub fn open(workdir: &Path, author: CommitAuthor) -> CmsResult<Self> {
        let repo = git2::Repository::open_ext(
            workdir,
            git2::RepositoryOpenFlags::NO_SEARCH,
            std::iter::empty::<&std::ffi::OsStr>(),
        )
        .map_err(CmsError::GitOpen)?;
        Self::from_repo(repo, author, CmsError::GitOpen)
    }

    fn from_repo(
        repo: git2::Repository,
        author: CommitAuthor,
        on_bare: fn(git2::Error) -> CmsError,
    ) -> CmsResult<Self> {
        // git2 may canonicalise the path; use its view so relative paths line up.
        let workdir = repo
            .workdir()
            .ok_or_else(|| on_bare(git2::Error::from_str("repository has no working directory")))?
            .to_path_buf();

        Ok(Self {
            repo: Mutex::new(repo),
            workdir,
            author,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn lock(&self) -> MutexGuard<'_, git2::Repository> {
        self.repo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tree of the commit `HEAD` points at, or `None` before the first commit.
    fn head_tree(repo: &git2::Repository) -> CmsResult<Option<git2::Tree<'_>>> {
        match repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit().map_err(CmsError::GitPeel)?;
                commit.tree().map(Some).map_err(CmsError::GitFindTree)
            }
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(CmsError::GitHead(e)),
        }
    }

    /// Committed tree entry at `path`, if any.
    fn head_entry(
        repo: &git2::Repository,
        path: &str,
    ) -> CmsResult<Option<git2::TreeEntry<'static>>> {
        let Some(tree) = Self::head_tree(repo)? else {
            return Ok(None);
        };
        match tree.get_path(Path::new(path)) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(CmsError::GitFindTree(e)),
        }
    }

    /// Current revision of the file at `path`; directories and missing paths yield `None`.
    fn current_revision(repo: &git2::Repository, path: &str) -> CmsResult<Option<Revision>> {
        Ok(Self::head_entry(repo, path)?
            .filter(|entry| entry.kind() == Some(git2::ObjectType::Blob))
            .map(|entry| Revision::from(entry.id())))
    }

    fn resolve_head_parents(repo: &git2::Repository) -> CmsResult<Vec<git2::Commit<'_>>> {
        match repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit().map_err(CmsError::GitPeel)?;
                Ok(vec![commit])
            }
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(vec![]),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(vec![]),
            Err(e) => Err(CmsError::GitHead(e)),
        }
    }

    /// Stage the working file at `path` and commit it. Returns the staged blob id.
    fn stage_and_commit(
        &self,
        repo: &git2::Repository,
        path: &str,
        message: &CommitMessage,
    ) -> CmsResult<Revision> {
        let mut index = repo.index().map_err(CmsError::GitIndex)?;
        index.add_path(Path::new(path)).map_err(CmsError::GitAdd)?;
        let staged = index
            .get_path(Path::new(path), 0)
            .map(|entry| Revision::from(entry.id))
            .ok_or_else(|| {
                CmsError::GitIndex(git2::Error::from_str("staged file missing from index"))
            })?;
        self.commit_index(repo, &mut index, message)?;
        Ok(staged)
    }

    fn unstage_and_commit(
        &self,
        repo: &git2::Repository,
        path: &str,
        message: &CommitMessage,
    ) -> CmsResult<git2::Oid> {
        let mut index = repo.index().map_err(CmsError::GitIndex)?;
        index
            .remove_path(Path::new(path))
            .map_err(CmsError::GitRemove)?;
        self.commit_index(repo, &mut index, message)
    }

    /// Write the index as a tree and commit it on `HEAD`.
    fn commit_index(
        &self,
        repo: &git2::Repository,
        index: &mut git2::Index,
        message: &CommitMessage,
    ) -> CmsResult<git2::Oid> {
        index.write().map_err(CmsError::GitIndex)?;
        let tree_id = index.write_tree().map_err(CmsError::GitWriteTree)?;
        let tree = repo.find_tree(tree_id).map_err(CmsError::GitFindTree)?;
        let sig = self.author.signature()?;

        let parents = Self::resolve_head_parents(repo)?;
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message.as_str(), &tree, &parent_refs)
            .map_err(CmsError::GitCommit)
    }

    /// Put the working file at `path` back to its committed content (or remove it).
    fn restore_working_file(&self, repo: &git2::Repository, path: &str) {
        let full = self.workdir.join(path);
        let committed = Self::head_entry(repo, path)
            .ok()
            .flatten()
            .and_then(|entry| repo.find_blob(entry.id()).ok().map(|b| b.content().to_vec()));

        let result = match committed {
            Some(bytes) => fs::write(&full, bytes),
            None => match fs::remove_file(&full) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            tracing::error!("failed to restore {} after a failed commit: {e}", full.display());
        }

        // The index may already hold the failed change; reset it to HEAD.
        let reset = repo.index().and_then(|mut index| {
            match Self::head_tree(repo) {
                Ok(Some(tree)) => index.read_tree(&tree)?,
                _ => index.clear()?,
            }
            index.write()
        });
        if let Err(e) = reset {
            tracing::error!("failed to reset git index after a failed commit: {e}");
        }
    }
}

impl ContentStore for GitContentStore {
    fn get(&self, path: &str) -> CmsResult<StoredFile> {
        let path = normalise_path(path)?;
        let repo = self.lock();

        let entry = Self::head_entry(&repo, &path)?
            .filter(|entry| entry.kind() == Some(git2::ObjectType::Blob))
            .ok_or_else(|| CmsError::NotFound(path.clone()))?;
        let blob = repo.find_blob(entry.id()).map_err(CmsError::GitBlob)?;
        let content = String::from_utf8(blob.content().to_vec())
            .map_err(|_| CmsError::NotText(path.clone()))?;

        Ok(StoredFile {
            path,
            content,
            revision: Revision::from(entry.id()),
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
        let repo = self.lock();

        if matches!(
            Self::head_entry(&repo, &path)?.and_then(|e| e.kind()),
            Some(git2::ObjectType::Tree)
        ) {
            return Err(CmsError::InvalidInput(format!("'{path}' is a directory")));
        }
        let current = Self::current_revision(&repo, &path)?;
        check_revision(&path, current.as_ref(), revision)?;

        let full = self.workdir.join(&path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(CmsError::FileWrite)?;
        }
        fs::write(&full, content).map_err(CmsError::FileWrite)?;

        let result = self.stage_and_commit(&repo, &path, message);

        match result {
            Ok(new_revision) => {
                tracing::debug!(path = %path, revision = %new_revision, "committed file");
                Ok(new_revision)
            }
            Err(e) => {
                self.restore_working_file(&repo, &path);
                Err(e)
            }
        }
    }

    fn delete(&self, path: &str, revision: &Revision, message: &CommitMessage) -> CmsResult<()> {
        let path = normalise_path(path)?;
        let repo = self.lock();

        let current = Self::current_revision(&repo, &path)?
            .ok_or_else(|| CmsError::NotFound(path.clone()))?;
        check_revision(&path, Some(&current), Some(revision))?;

        let full = self.workdir.join(&path);
        match fs::remove_file(&full) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CmsError::FileWrite(e)),
        }

        let result = self.unstage_and_commit(&repo, &path, message);

        match result {
            Ok(_) => {
                tracing::debug!(path = %path, "deleted file");
                Ok(())
            }
            Err(e) => {
                self.restore_working_file(&repo, &path);
                Err(e)
            }
        }
    }

    fn list(&self, dir: &str) -> CmsResult<Vec<DirEntry>> {
        let dir = normalise_dir(dir)?;
        let repo = self.lock();

        let Some(root) = Self::head_tree(&repo)? else {
            return if dir.is_empty() {
                Ok(Vec::new())
            } else {
                Err(CmsError::NotFound(dir))
            };
        };

        let tree = if dir.is_empty() {
            root
        } else {
            let entry = match root.get_path(Path::new(&dir)) {
                Ok(entry) => entry,
                Err(e) if e.code() == git2::ErrorCode::NotFound => {
                    return Err(CmsError::NotFound(dir))
                }
                Err(e) => return Err(CmsError::GitFindTree(e)),
            };
            if entry.kind() != Some(git2::ObjectType::Tree) {
                return Err(CmsError::NotFound(dir));
            }
            repo.find_tree(entry.id()).map_err(CmsError::GitFindTree)?
        };

        let mut entries: Vec<DirEntry> = tree
            .iter()
            .filter_map(|entry| {
                let kind = match entry.kind() {
                    Some(git2::ObjectType::Blob) => EntryKind::File,
                    Some(git2::ObjectType::Tree) => EntryKind::Dir,
                    _ => return None,
                };
                let name = entry.name()?.to_string();
                Some(DirEntry {
                    path: join(&dir, &name),
                    name,
                    kind,
                    revision: Some(Revision::from(entry.id())),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(entries)
    }
}

/// A directory whose immediate subdirectories are git content repositories.
pub struct GitWorkspace {
    root: PathBuf,
    author: CommitAuthor,
    open_stores: Mutex<HashMap<String, Arc<GitContentStore>>>,
}

impl GitWorkspace {
    pub fn new(root: impl Into<PathBuf>, author: CommitAuthor) -> Self {
        Self {
            root: root.into(),
            author,
            open_stores: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new, empty repository named `name` under the root.
    pub fn init_repo(&self, name: &str) -> CmsResult<Arc<GitContentStore>> {
        validate_repo_name(name)?;
        let workdir = self.root.join(name);
        if workdir.exists() {
            return Err(CmsError::Conflict(format!("repository '{name}' already exists")));
        }
        fs::create_dir_all(&workdir).map_err(CmsError::StorageDirCreation)?;

        let store = Arc::new(GitContentStore::init(&workdir, self.author.clone())?);
        tracing::info!(repo = name, "initialised content repository");

        self.open_stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Open (or reuse) the store for `name`.
    ///
    /// All callers going through one workspace share a store, and so share its write lock.
    pub fn open_git(&self, name: &str) -> CmsResult<Arc<GitContentStore>> {
        validate_repo_name(name)?;
        let mut stores = self
            .open_stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(name) {
            return Ok(Arc::clone(store));
        }

        let workdir = self.root.join(name);
        if !workdir.join(".git").exists() {
            return Err(CmsError::NotFound(format!("repository '{name}'")));
        }
        let store = Arc::new(GitContentStore::open(&workdir, self.author.clone())?);
        stores.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

impl RepositoryHost for GitWorkspace {
    fn list_repos(&self) -> CmsResult<Vec<RepoEntry>> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CmsError::FileRead(e)),
        };

        let mut repos = Vec::new();
        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.join(".git").exists() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if validate_repo_name(name).is_err() {
                continue;
            }
            repos.push(RepoEntry {
                name: name.to_string(),
                path: path.display().to_string(),
            });
        }
        repos.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(repos)
    }

    fn open(&self, name: &str) -> CmsResult<Arc<dyn ContentStore>> {
        let store: Arc<dyn ContentStore> = self.open_git(name)?;
        Ok(store)
    }
}

/// Repository names are single directory names made of `[A-Za-z0-9._-]`.
pub(crate) fn validate_repo_name(name: &str) -> CmsResult<()> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if ok {
        Ok(())
    } else {
        Err(CmsError::InvalidInput(format!(
            "repository name '{name}' must be made of letters, digits, '.', '_' or '-'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageService;
    use cms_codec::{serialize_to_markdown, PageContent};
    use cms_types::Slug;
    use tempfile::TempDir;

    fn author() -> CommitAuthor {
        CommitAuthor::new("Test Editor", "editor@example.com").unwrap()
    }

    fn new_store() -> (TempDir, GitContentStore) {
        let dir = TempDir::new().unwrap();
        let store = GitContentStore::init(dir.path(), author()).unwrap();
        (dir, store)
    }

    fn commit_count(store: &GitContentStore) -> usize {
        let repo = store.lock();
        let mut walk = repo.revwalk().unwrap();
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }

    #[test]
    fn put_then_get_returns_committed_content() {
        let (_dir, store) = new_store();

        let rev = store
            .put("content/pages/home.md", "hello\n", None, &CommitMessage::create("x"))
            .unwrap();
        let file = store.get("content/pages/home.md").unwrap();

        assert_eq!(file.content, "hello\n");
        assert_eq!(file.revision, rev);
        assert_eq!(rev, Revision::of_content(b"hello\n").unwrap());
    }

    #[test]
    fn each_write_is_one_commit_on_main() {
        let (_dir, store) = new_store();
        let rev = store
            .put("a.md", "one", None, &CommitMessage::create("a.md"))
            .unwrap();
        let rev = store
            .put("a.md", "two", Some(&rev), &CommitMessage::update("a.md"))
            .unwrap();
        store
            .delete("a.md", &rev, &CommitMessage::delete("a.md"))
            .unwrap();

        assert_eq!(commit_count(&store), 3);

        let repo = store.lock();
        let head = repo.head().unwrap();
        assert_eq!(head.name(), Some(MAIN_REF));
        let commit = head.peel_to_commit().unwrap();
        assert_eq!(commit.message(), Some("Delete a.md"));
        assert_eq!(commit.author().name(), Some("Test Editor"));
    }

    #[test]
    fn put_without_revision_on_existing_file_conflicts() {
        let (_dir, store) = new_store();
        store
            .put("a.md", "one", None, &CommitMessage::create("a.md"))
            .unwrap();

        let err = store
            .put("a.md", "two", None, &CommitMessage::create("a.md"))
            .unwrap_err();
        assert!(matches!(err, CmsError::Conflict(_)));
        assert_eq!(store.get("a.md").unwrap().content, "one");
        assert_eq!(commit_count(&store), 1);
    }

    #[test]
    fn put_with_stale_revision_conflicts() {
        let (_dir, store) = new_store();
        let first = store
            .put("a.md", "one", None, &CommitMessage::create("a.md"))
            .unwrap();
        store
            .put("a.md", "two", Some(&first), &CommitMessage::update("a.md"))
            .unwrap();

        let err = store
            .put("a.md", "three", Some(&first), &CommitMessage::update("a.md"))
            .unwrap_err();
        assert!(matches!(err, CmsError::Conflict(_)));
        assert_eq!(store.get("a.md").unwrap().content, "two");
    }

    #[test]
    fn put_with_revision_for_missing_file_conflicts() {
        let (_dir, store) = new_store();
        let err = store
            .put(
                "a.md",
                "one",
                Some(&Revision::new("deadbeef")),
                &CommitMessage::update("a.md"),
            )
            .unwrap_err();
        assert!(matches!(err, CmsError::Conflict(_)));
    }

    #[test]
    fn delete_checks_revision_and_existence() {
        let (_dir, store) = new_store();
        let rev = store
            .put("a.md", "one", None, &CommitMessage::create("a.md"))
            .unwrap();

        let err = store
            .delete("a.md", &Revision::new("stale"), &CommitMessage::delete("a.md"))
            .unwrap_err();
        assert!(matches!(err, CmsError::Conflict(_)));

        store
            .delete("a.md", &rev, &CommitMessage::delete("a.md"))
            .unwrap();
        assert!(matches!(store.get("a.md"), Err(CmsError::NotFound(_))));

        let err = store
            .delete("a.md", &rev, &CommitMessage::delete("a.md"))
            .unwrap_err();
        assert!(matches!(err, CmsError::NotFound(_)));
    }

    fn commit_raw_file(dir: &Path, store: &GitContentStore, path: &str, bytes: &[u8]) {
        let full = dir.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, bytes).unwrap();

        let repo = store.lock();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(path)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parent = repo.head().unwrap().peel_to_commit().unwrap();
        let sig = git2::Signature::now("Test Editor", "editor@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "binary", &tree, &[&parent])
            .unwrap();
    }

    #[test]
    fn binary_page_file_is_skipped_by_page_listing() {
        let (dir, store) = new_store();
        let home = serialize_to_markdown(&PageContent::new("Home", "/")).unwrap();
        store
            .put("content/pages/home.md", &home, None, &CommitMessage::create("home"))
            .unwrap();
        commit_raw_file(dir.path(), &store, "content/pages/bin.md", &[0xff, 0xfe, 0x00]);

        assert!(matches!(
            store.get("content/pages/bin.md"),
            Err(CmsError::NotText(_))
        ));

        let service = PageService::new(Arc::new(store), "content/pages").unwrap();
        let titles: Vec<_> = service
            .list_pages()
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Home"]);
        assert_eq!(
            service.find_by_slug(&Slug::root()).unwrap().unwrap().path,
            "content/pages/home.md"
        );
        assert!(service.slug_conflicts().unwrap().is_empty());
    }

    #[test]
    fn reads_ignore_uncommitted_working_files() {
        let (dir, store) = new_store();
        std::fs::write(dir.path().join("draft.md"), "not committed").unwrap();

        assert!(matches!(store.get("draft.md"), Err(CmsError::NotFound(_))));
        assert!(store.list("").unwrap().is_empty());
    }

    #[test]
    fn list_returns_sorted_children_with_kinds() {
        let (_dir, store) = new_store();
        for path in ["content/pages/b.md", "content/pages/a.md", "content/pages/nested/c.md"] {
            store
                .put(path, "x", None, &CommitMessage::create(path))
                .unwrap();
        }

        let entries = store.list("content/pages").unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md", "nested"]);
        assert_eq!(entries[0].path, "content/pages/a.md");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[2].kind, EntryKind::Dir);

        assert!(matches!(store.list("content/missing"), Err(CmsError::NotFound(_))));
        assert!(matches!(store.list("content/pages/a.md"), Err(CmsError::NotFound(_))));
    }

    #[test]
    fn rejects_paths_outside_the_repository() {
        let (_dir, store) = new_store();
        for bad in ["../escape.md", "/abs.md", ".git/config"] {
            let err = store
                .put(bad, "x", None, &CommitMessage::create(bad))
                .unwrap_err();
            assert!(matches!(err, CmsError::InvalidPath { .. }), "{bad}");
        }
        assert_eq!(commit_count(&store), 0);
    }

    #[test]
    fn reopened_store_sees_previous_commits() {
        let (dir, store) = new_store();
        let rev = store
            .put("a.md", "one", None, &CommitMessage::create("a.md"))
            .unwrap();
        store
            .put("b.md", "two", None, &CommitMessage::create("b.md"))
            .unwrap();
        drop(store);

        let reopened = GitContentStore::open(dir.path(), author()).unwrap();
        assert_eq!(reopened.get("a.md").unwrap().revision, rev);
        reopened
            .put("c.md", "three", None, &CommitMessage::create("c.md"))
            .unwrap();

        let names: Vec<_> = reopened
            .list("")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn workspace_initialises_lists_and_opens_repositories() {
        let root = TempDir::new().unwrap();
        let workspace = GitWorkspace::new(root.path(), author());

        workspace.init_repo("site-b").unwrap();
        workspace.init_repo("site-a").unwrap();
        std::fs::create_dir(root.path().join("not-a-repo")).unwrap();

        let names: Vec<_> = workspace
            .list_repos()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["site-a", "site-b"]);

        let store = workspace.open("site-a").unwrap();
        store
            .put("a.md", "x", None, &CommitMessage::create("a.md"))
            .unwrap();
        assert_eq!(workspace.open("site-a").unwrap().get("a.md").unwrap().content, "x");

        assert!(matches!(workspace.open("not-a-repo"), Err(CmsError::NotFound(_))));
        assert!(matches!(workspace.init_repo("site-a"), Err(CmsError::Conflict(_))));
    }

    #[test]
    fn workspace_rejects_bad_repository_names() {
        let root = TempDir::new().unwrap();
        let workspace = GitWorkspace::new(root.path(), author());
        for bad in ["", "..", "a/b", ".hidden", "white space"] {
            assert!(
                matches!(workspace.init_repo(bad), Err(CmsError::InvalidInput(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn missing_workspace_root_lists_no_repositories() {
        let root = TempDir::new().unwrap();
        let workspace = GitWorkspace::new(root.path().join("absent"), author());
        assert!(workspace.list_repos().unwrap().is_empty());
    }
}
