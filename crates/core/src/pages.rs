//! Pages stored as Markdown files in a content store.
//!
//! A page's address (its slug) lives inside the file; the file name is only a storage key. Slug
//! lookup therefore scans and parses every page file in the pages directory.

use crate::constants::{NEW_PAGE_FILE_PREFIX, PAGE_FILE_EXTENSION};
use crate::editor::PageEditor;
use crate::error::{CmsError, CmsResult};
use crate::store::{normalise_dir, CommitMessage, ContentStore, EntryKind, Revision};
use chrono::{DateTime, Utc};
use cms_codec::{parse_markdown, serialize_to_markdown, PageContent};
use cms_types::Slug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A parsed page together with where it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoadedPage {
    pub path: String,
    pub revision: Revision,
    pub content: PageContent,
}

/// Listing row for a page file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub path: String,
    pub revision: Revision,
    pub title: String,
    pub slug: String,
    pub block_count: usize,
}

/// A slug claimed by more than one page file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlugConflict {
    pub slug: String,
    pub paths: Vec<String>,
}

/// Page operations over one content store.
#[derive(Clone)]
pub struct PageService {
    store: Arc<dyn ContentStore>,
    pages_dir: String,
}

impl PageService {
    /// Create a page service for `store`, keeping pages under `pages_dir`.
    pub fn new(store: Arc<dyn ContentStore>, pages_dir: &str) -> CmsResult<Self> {
        let pages_dir = normalise_dir(pages_dir)?;
        Ok(Self { store, pages_dir })
    }

    pub fn pages_dir(&self) -> &str {
        &self.pages_dir
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Path for a page created at `now`: `<pages_dir>/page-<unix-millis>.md`.
    pub fn new_page_path(&self, now: DateTime<Utc>) -> String {
        let name = format!(
            "{NEW_PAGE_FILE_PREFIX}{}.{PAGE_FILE_EXTENSION}",
            now.timestamp_millis()
        );
        if self.pages_dir.is_empty() {
            name
        } else {
            format!("{}/{name}", self.pages_dir)
        }
    }

    pub fn load(&self, path: &str) -> CmsResult<LoadedPage> {
        let file = self.store.get(path)?;
        let content = parse_markdown(&file.content)?;
        Ok(LoadedPage {
            path: file.path,
            revision: file.revision,
            content,
        })
    }

    /// Every page in the pages directory, in file-name order.
    ///
    /// Files that are not text or fail to parse are skipped with a warning. A missing directory
    /// has no pages.
    pub fn load_all(&self) -> CmsResult<Vec<LoadedPage>> {
        let entries = match self.store.list(&self.pages_dir) {
            Ok(entries) => entries,
            Err(CmsError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut pages = Vec::new();
        for entry in entries {
            if entry.kind != EntryKind::File || !is_page_file(&entry.name) {
                continue;
            }
            match self.load(&entry.path) {
                Ok(page) => pages.push(page),
                Err(e @ (CmsError::Codec(_) | CmsError::NotText(_))) => {
                    tracing::warn!("skipping unreadable page {}: {e}", entry.path);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(pages)
    }

    pub fn list_pages(&self) -> CmsResult<Vec<PageSummary>> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|page| PageSummary {
                path: page.path,
                revision: page.revision,
                title: page.content.title,
                slug: page.content.slug,
                block_count: page.content.blocks.len(),
            })
            .collect())
    }

    /// The first page (by file name) whose `slug` equals `slug`.
    pub fn find_by_slug(&self, slug: &Slug) -> CmsResult<Option<LoadedPage>> {
        let mut matches = self
            .load_all()?
            .into_iter()
            .filter(|page| page.content.slug == slug.as_str());

        let first = matches.next();
        if let Some(page) = &first {
            let others: Vec<String> = matches.map(|p| p.path).collect();
            if !others.is_empty() {
                tracing::warn!(
                    "slug {slug} is claimed by {} and also by {}; using the first",
                    page.path,
                    others.join(", ")
                );
            }
        }

        Ok(first)
    }

    /// Every slug claimed by more than one page file, sorted by slug.
    pub fn slug_conflicts(&self) -> CmsResult<Vec<SlugConflict>> {
        let mut by_slug: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for page in self.load_all()? {
            by_slug.entry(page.content.slug).or_default().push(page.path);
        }

        Ok(by_slug
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(slug, paths)| SlugConflict { slug, paths })
            .collect())
    }

    /// Serialise the editor's page and write it with the revision the editor was opened at.
    ///
    /// A new page gets a generated path. On success the editor is pointed at the saved path and
    /// revision, so saving again updates the same file.
    pub fn save(&self, editor: &mut PageEditor, message: Option<&str>) -> CmsResult<Revision> {
        let text = serialize_to_markdown(editor.content())?;

        let path = match editor.path() {
            Some(path) => path.to_string(),
            None => self.new_page_path(Utc::now()),
        };
        let fallback = if editor.is_new() {
            CommitMessage::create(&path)
        } else {
            CommitMessage::update(&path)
        };
        let message = CommitMessage::or_default(message, fallback)?;

        let revision = self
            .store
            .put(&path, &text, editor.revision(), &message)?;
        tracing::info!(path = %path, slug = %editor.content().slug, "saved page");

        editor.mark_saved(path, revision.clone());
        Ok(revision)
    }

    pub fn delete(&self, path: &str, revision: &Revision, message: Option<&str>) -> CmsResult<()> {
        let message = CommitMessage::or_default(message, CommitMessage::delete(path))?;
        self.store.delete(path, revision, &message)
    }
}

fn is_page_file(name: &str) -> bool {
    name.strip_suffix(PAGE_FILE_EXTENSION)
        .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
}
