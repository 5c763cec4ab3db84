//! The work entity and its lazily-loaded metadata record.

use archivist_client::{Document, PageSource};
use archivist_core::{Result, WorkId, ARCHIVE_URL};
use archivist_extract::{WorkExtractor, WorkFields};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Metadata record of a work.
///
/// Every field has a deterministic default and is only ever replaced
/// wholesale by [`WorkMetadata::absorb`] during a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct WorkMetadata {
    pub title: String,
    pub author: String,
    pub summary: Option<String>,
    pub language: String,
    pub words: u64,
    pub chapters_published: u32,
    pub chapters_expected: Option<u32>,
    pub is_completed: bool,
    pub kudos: u64,
    pub comments: u64,
    pub bookmarks: u64,
    pub hits: u64,
    pub published: Option<NaiveDate>,
    pub updated: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub relationships: Vec<(String, String)>,
    pub characters: Vec<String>,
    pub fandoms: Vec<String>,
    pub categories: Vec<String>,
    pub ratings: Vec<String>,
    pub warnings: Vec<String>,
    pub series: Option<String>,
    pub is_restricted: bool,
}

impl Default for WorkMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: "Anonymous".to_string(),
            summary: None,
            language: String::new(),
            words: 0,
            chapters_published: 0,
            chapters_expected: None,
            is_completed: false,
            kudos: 0,
            comments: 0,
            bookmarks: 0,
            hits: 0,
            published: None,
            updated: None,
            tags: Vec::new(),
            relationships: Vec::new(),
            characters: Vec::new(),
            fandoms: Vec::new(),
            categories: Vec::new(),
            ratings: Vec::new(),
            warnings: Vec::new(),
            series: None,
            is_restricted: false,
        }
    }
}

impl WorkMetadata {
    /// Overwrite every field from a freshly extracted record.
    ///
    /// The extractor's record is exhaustive, so this is a full replacement;
    /// unrecognized fields cannot exist by construction.
    pub fn absorb(&mut self, fields: WorkFields) {
        self.title = fields.title;
        self.author = fields.author;
        self.summary = fields.summary;
        self.language = fields.language;
        self.words = fields.words;
        self.chapters_published = fields.chapters_published;
        self.chapters_expected = fields.chapters_expected;
        self.is_completed = fields.is_completed;
        self.kudos = fields.kudos;
        self.comments = fields.comments;
        self.bookmarks = fields.bookmarks;
        self.hits = fields.hits;
        self.published = fields.published;
        self.updated = fields.updated;
        self.tags = fields.tags;
        self.relationships = fields.relationships;
        self.characters = fields.characters;
        self.fandoms = fields.fandoms;
        self.categories = fields.categories;
        self.ratings = fields.ratings;
        self.warnings = fields.warnings;
        self.series = fields.series;
        self.is_restricted = fields.is_restricted;
    }
}

/// A work on the archive, loaded lazily on first field access.
///
/// The identity (the work ID) is immutable; everything else lives in the
/// metadata record and is populated by [`Work::reload`] at most once until
/// an explicit reload is requested. Accessors block until the record is
/// available, so no accessor ever returns a default merely because loading
/// hadn't happened yet.
pub struct Work {
    id: WorkId,
    source: Arc<dyn PageSource>,
    data: RwLock<WorkMetadata>,
    loaded: AtomicBool,
    reload_lock: Mutex<()>,
}

impl Work {
    /// Create an unloaded work handle for `id`.
    ///
    /// `source` is the shared session; hand every entity a clone of the
    /// same `Arc` so the whole process honors one rate limit and one
    /// cookie jar.
    #[must_use]
    pub fn new(id: WorkId, source: Arc<dyn PageSource>) -> Self {
        Self {
            id,
            source,
            data: RwLock::new(WorkMetadata::default()),
            loaded: AtomicBool::new(false),
            reload_lock: Mutex::new(()),
        }
    }

    /// The work ID. Never fetches.
    #[must_use]
    pub fn id(&self) -> &WorkId {
        &self.id
    }

    /// Canonical URL of the work, derived from the identity. Never fetches.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{ARCHIVE_URL}/works/{}", self.id)
    }

    /// Whether the metadata record has been populated.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Fetch the work page and replace the metadata record.
    ///
    /// The record is committed in one store after the whole page has been
    /// extracted; concurrent readers see either the old record or the new
    /// one, never a mix. On failure the previous record and loaded state
    /// are untouched.
    ///
    /// # Errors
    /// [`archivist_core::ArchiveError::NotFound`] if the work does not
    /// exist, [`archivist_core::ArchiveError::Authorization`] if it is
    /// restricted to registered users, [`archivist_core::ArchiveError::Parse`]
    /// for an unrecognizable page.
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.reload_lock.lock().await;
        self.reload_locked().await
    }

    /// Reload body; caller must hold `reload_lock`.
    async fn reload_locked(&self) -> Result<()> {
        debug!(id = %self.id, "reloading work");

        let path = format!("/works/{}", self.id);
        let document = self.source.fetch_document(&path, None).await?;
        let fields = extract_fields(&document)?;

        let mut record = WorkMetadata::default();
        record.absorb(fields);

        *self.data.write().await = record;
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Load the metadata record if it hasn't been loaded yet.
    ///
    /// Concurrent first reads share a single fetch: whoever takes the
    /// reload lock first performs it, everyone else re-checks and returns.
    async fn ensure_loaded(&self) -> Result<()> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }

        let _guard = self.reload_lock.lock().await;
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        self.reload_locked().await
    }

    /// Snapshot of the whole metadata record.
    pub async fn metadata(&self) -> Result<WorkMetadata> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.clone())
    }

    /// The title of the work.
    pub async fn title(&self) -> Result<String> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.title.clone())
    }

    /// The author(s) of the work, `Anonymous` when unattributed.
    pub async fn author(&self) -> Result<String> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.author.clone())
    }

    /// The work summary, if one was given.
    pub async fn summary(&self) -> Result<Option<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.summary.clone())
    }

    /// The language the work is written in.
    pub async fn language(&self) -> Result<String> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.language.clone())
    }

    /// The word count.
    pub async fn words(&self) -> Result<u64> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.words)
    }

    /// The number of published chapters.
    pub async fn chapters_published(&self) -> Result<u32> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.chapters_published)
    }

    /// The expected total number of chapters, if the author has said.
    pub async fn chapters_expected(&self) -> Result<Option<u32>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.chapters_expected)
    }

    /// Whether the work is marked complete.
    pub async fn is_completed(&self) -> Result<bool> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.is_completed)
    }

    /// The number of kudos.
    pub async fn kudos(&self) -> Result<u64> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.kudos)
    }

    /// The number of comments.
    pub async fn comments(&self) -> Result<u64> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.comments)
    }

    /// The number of bookmarks.
    pub async fn bookmarks(&self) -> Result<u64> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.bookmarks)
    }

    /// The number of hits.
    pub async fn hits(&self) -> Result<u64> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.hits)
    }

    /// The publication date.
    pub async fn published(&self) -> Result<Option<NaiveDate>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.published)
    }

    /// The date of the last update.
    pub async fn updated(&self) -> Result<Option<NaiveDate>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.updated)
    }

    /// The freeform tags.
    pub async fn tags(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.tags.clone())
    }

    /// The relationship tags, split into pairs.
    pub async fn relationships(&self) -> Result<Vec<(String, String)>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.relationships.clone())
    }

    /// The character tags.
    pub async fn characters(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.characters.clone())
    }

    /// The fandom tags.
    pub async fn fandoms(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.fandoms.clone())
    }

    /// The category tags.
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.categories.clone())
    }

    /// The rating tags.
    pub async fn ratings(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.ratings.clone())
    }

    /// The archive warning tags.
    pub async fn warnings(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.warnings.clone())
    }

    /// The series this work belongs to, if any.
    pub async fn series(&self) -> Result<Option<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.series.clone())
    }

    /// Best-effort guess at whether the work is access-restricted.
    pub async fn is_restricted(&self) -> Result<bool> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.is_restricted)
    }
}

impl std::fmt::Debug for Work {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Work")
            .field("id", &self.id)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

/// Parse and extract inside one synchronous scope; the parsed tree is not
/// `Send` and must not live across an await point.
fn extract_fields(document: &Document) -> Result<WorkFields> {
    let html = document.html();
    WorkExtractor::new(&html).extract()
}
