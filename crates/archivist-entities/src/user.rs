//! The user entity and its lazily-loaded profile record.

use archivist_client::{Document, PageSource};
use archivist_core::{Result, Username, ARCHIVE_URL};
use archivist_extract::{UserExtractor, UserFields};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Profile record of a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct UserMetadata {
    pub user_id: Option<String>,
    pub bio: String,
    pub location: Option<String>,
    pub joined: Option<NaiveDate>,
    pub email: Option<String>,
    pub pseuds: Vec<String>,
}

impl UserMetadata {
    /// Overwrite every field from a freshly extracted record.
    pub fn absorb(&mut self, fields: UserFields) {
        self.user_id = fields.user_id;
        self.bio = fields.bio;
        self.location = fields.location;
        self.joined = fields.joined;
        self.email = fields.email;
        self.pseuds = fields.pseuds;
    }
}

/// A user on the archive, loaded lazily on first field access.
///
/// Identity (the username, and for pseudonyms the parent account) is fixed
/// at construction; the profile record is fetched at most once until an
/// explicit reload.
pub struct User {
    name: Username,
    pseud_of: Option<Username>,
    source: Arc<dyn PageSource>,
    data: RwLock<UserMetadata>,
    loaded: AtomicBool,
    reload_lock: Mutex<()>,
}

impl User {
    /// Create an unloaded handle for the account `name`.
    #[must_use]
    pub fn new(name: Username, source: Arc<dyn PageSource>) -> Self {
        Self {
            name,
            pseud_of: None,
            source,
            data: RwLock::new(UserMetadata::default()),
            loaded: AtomicBool::new(false),
            reload_lock: Mutex::new(()),
        }
    }

    /// Create a handle for the pseudonym `name` of the account `parent`.
    ///
    /// The pseudonym's canonical page lives under the parent account
    /// (`/users/{parent}/pseuds/{name}`).
    #[must_use]
    pub fn pseudonym(parent: &Username, name: Username, source: Arc<dyn PageSource>) -> Self {
        Self {
            name,
            pseud_of: Some(parent.clone()),
            source,
            data: RwLock::new(UserMetadata::default()),
            loaded: AtomicBool::new(false),
            reload_lock: Mutex::new(()),
        }
    }

    /// The username. Never fetches.
    #[must_use]
    pub fn name(&self) -> &Username {
        &self.name
    }

    /// Whether this handle is a pseudonym of another account. Never fetches.
    #[must_use]
    pub fn is_pseudonym(&self) -> bool {
        self.pseud_of.is_some()
    }

    /// The parent account, for pseudonyms. Never fetches.
    #[must_use]
    pub fn parent(&self) -> Option<&Username> {
        self.pseud_of.as_ref()
    }

    /// Canonical URL of the profile page, derived from the identity.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{ARCHIVE_URL}{}", self.profile_path())
    }

    /// Whether the profile record has been populated.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Fetch the profile page and replace the profile record.
    ///
    /// Same commit and failure semantics as `Work::reload`: the record is
    /// replaced in one store, or not at all.
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.reload_lock.lock().await;
        self.reload_locked().await
    }

    async fn reload_locked(&self) -> Result<()> {
        debug!(name = %self.name, "reloading user profile");

        let path = self.profile_path();
        let document = self.source.fetch_document(&path, None).await?;
        let fields = extract_fields(&document)?;

        let mut record = UserMetadata::default();
        record.absorb(fields);

        *self.data.write().await = record;
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

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

    fn profile_path(&self) -> String {
        match &self.pseud_of {
            Some(parent) => format!("/users/{parent}/pseuds/{}", self.name),
            None => format!("/users/{}/profile", self.name),
        }
    }

    /// Snapshot of the whole profile record.
    pub async fn metadata(&self) -> Result<UserMetadata> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.clone())
    }

    /// The numeric account ID, when the profile publishes it.
    pub async fn user_id(&self) -> Result<Option<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.user_id.clone())
    }

    /// The profile bio, empty when none is set.
    pub async fn bio(&self) -> Result<String> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.bio.clone())
    }

    /// The self-reported location.
    pub async fn location(&self) -> Result<Option<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.location.clone())
    }

    /// The date the account joined the archive.
    pub async fn joined(&self) -> Result<Option<NaiveDate>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.joined)
    }

    /// The public email address, when published.
    pub async fn email(&self) -> Result<Option<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.email.clone())
    }

    /// Names of the account's pseudonyms.
    pub async fn pseuds(&self) -> Result<Vec<String>> {
        self.ensure_loaded().await?;
        Ok(self.data.read().await.pseuds.clone())
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

fn extract_fields(document: &Document) -> Result<UserFields> {
    let html = document.html();
    UserExtractor::new(&html).extract()
}
