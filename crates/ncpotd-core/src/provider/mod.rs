//! The picture-of-the-day provider: a one-shot asynchronous pipeline.
//!
//! `Provider::start` runs enumerate -> invalidate host cache -> select -> fetch
//! on a tokio task and hands back an [`Activation`] that resolves exactly once.
//! The host is expected to drop the provider soon after; dropping aborts the
//! task and any late completion is discarded. The enumeration step runs on a
//! task of its own: an activation superseded by `refresh` leaves it running
//! and the new activation waits for it, so a provider never has two listing
//! requests outstanding.

mod channel;
mod phase;

pub use channel::{Activation, Outcome, ResultChannel};
pub use phase::{Completion, Phase};

use crate::cache_defeat;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::fetcher;
use crate::metadata::{identifier_for, ImageMetadata};
use crate::selector::{self, Selection};
use crate::source::{self, CandidateSet};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;

/// Success payload: the decoded bitmap and its metadata.
pub struct PotdImage {
    pub image: DynamicImage,
    pub metadata: ImageMetadata,
}

impl std::fmt::Debug for PotdImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PotdImage")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("metadata", &self.metadata)
            .finish()
    }
}

struct State {
    phase: Phase,
    /// Bumped on every activation; stale tasks compare against it.
    generation: u64,
    /// Retained after enumeration so `refresh` can re-select without listing again.
    candidates: Option<CandidateSet>,
    metadata: Option<ImageMetadata>,
}

/// Enumeration running on its own task, so aborting an activation does not
/// orphan its listing request and a later activation can join it.
type PendingListing = JoinHandle<Result<CandidateSet, ProviderError>>;

struct Inner {
    config: ProviderConfig,
    cache_path: Option<PathBuf>,
    state: RwLock<State>,
    /// At most one enumeration in flight per provider.
    listing: tokio::sync::Mutex<Option<PendingListing>>,
}

pub struct Provider {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Provider {
    /// Creates an idle provider. `cache_path` is the host's cache file to
    /// backdate before each selection; `None` skips that step.
    pub fn new(config: ProviderConfig, cache_path: Option<PathBuf>) -> Self {
        tracing::debug!(
            local = config.use_local_source,
            "provider constructed with {:?}",
            config
        );
        Self {
            inner: Arc::new(Inner {
                config,
                cache_path,
                state: RwLock::new(State {
                    phase: Phase::Constructed,
                    generation: 0,
                    candidates: None,
                    metadata: None,
                }),
                listing: tokio::sync::Mutex::new(None),
            }),
            task: Mutex::new(None),
        }
    }

    /// Creates a provider and starts its first activation.
    /// Must be called from within a tokio runtime.
    pub fn start(config: ProviderConfig, cache_path: Option<PathBuf>) -> (Self, Activation) {
        let provider = Self::new(config, cache_path);
        let activation = provider.activate();
        (provider, activation)
    }

    /// Starts a new activation: re-selects from the retained candidates, or
    /// enumerates again if none are retained. Supersedes a running activation,
    /// whose [`Activation`] then resolves to `Cancelled`.
    pub fn refresh(&self) -> Activation {
        self.activate()
    }

    fn activate(&self) -> Activation {
        let (tx, activation) = channel::channel();
        let generation = self.inner.begin();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(run(inner, generation, tx));
        let previous = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
        activation
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.inner.config
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.inner.cache_path.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.inner.read().phase
    }

    /// `nextcloud`, or `nextcloud_<hash>` once an image is selected.
    pub fn identifier(&self) -> String {
        let state = self.inner.read();
        identifier_for(state.metadata.as_ref().map(|m| m.content_hash.as_str()))
    }

    pub fn metadata(&self) -> Option<ImageMetadata> {
        self.inner.read().metadata.clone()
    }

    pub fn remote_url(&self) -> Option<String> {
        self.metadata_field(|m| &m.remote_url)
    }

    pub fn info_url(&self) -> Option<String> {
        self.metadata_field(|m| &m.info_url)
    }

    pub fn title(&self) -> Option<String> {
        self.metadata_field(|m| &m.title)
    }

    pub fn author(&self) -> Option<String> {
        self.metadata_field(|m| &m.author)
    }

    /// Size of the retained candidate set, if enumeration has completed.
    pub fn candidate_count(&self) -> Option<usize> {
        self.inner.read().candidates.as_ref().map(CandidateSet::len)
    }

    fn metadata_field(&self, field: impl Fn(&ImageMetadata) -> &String) -> Option<String> {
        self.inner.read().metadata.as_ref().map(|m| field(m).clone())
    }
}

impl Drop for Provider {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

async fn run(inner: Arc<Inner>, generation: u64, tx: ResultChannel) {
    let outcome = inner.activate(generation).await;
    let completion = match &outcome {
        Ok(_) => Completion::Succeeded,
        Err(_) => Completion::Failed,
    };
    if !inner.finish(generation, completion) {
        tracing::debug!("discarding result of superseded activation {}", generation);
        return;
    }
    match &outcome {
        Ok(potd) => tracing::info!(
            title = %potd.metadata.title,
            remote_url = %potd.metadata.remote_url,
            "emitting finished"
        ),
        Err(e) => match std::error::Error::source(e) {
            Some(cause) => tracing::warn!("emitting error: {}: {}", e, cause),
            None => tracing::warn!("emitting error: {}", e),
        },
    }
    tx.emit(outcome);
}

impl Inner {
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        let mut state = self.write();
        state.generation += 1;
        state.phase = Phase::Constructed;
        state.generation
    }

    /// Locks state for `generation`, or fails with `Cancelled` if it was superseded.
    fn current(&self, generation: u64) -> Result<RwLockWriteGuard<'_, State>, ProviderError> {
        let state = self.write();
        if state.generation != generation {
            return Err(ProviderError::Cancelled);
        }
        Ok(state)
    }

    fn advance(&self, generation: u64, phase: Phase) -> Result<(), ProviderError> {
        self.current(generation)?.phase = phase;
        tracing::debug!("activation {} -> {}", generation, phase);
        Ok(())
    }

    fn finish(&self, generation: u64, completion: Completion) -> bool {
        self.advance(generation, Phase::Done(completion)).is_ok()
    }

    fn has_candidates(&self) -> bool {
        self.read().candidates.is_some()
    }

    async fn activate(&self, generation: u64) -> Result<PotdImage, ProviderError> {
        if !self.has_candidates() {
            self.advance(generation, Phase::Enumerating)?;
            self.enumerate(generation).await?;
        }

        // Before selecting: the host may run its freshness check as soon as
        // it sees the result.
        self.invalidate_cache();
        self.advance(generation, Phase::CacheInvalidated)?;

        self.advance(generation, Phase::Selecting)?;
        let selection = self.select(generation)?;

        // Published before the download so concurrent queries see final values.
        let metadata = ImageMetadata::derive(&selection, &self.config);
        {
            let mut state = self.current(generation)?;
            state.metadata = Some(metadata.clone());
            state.phase = Phase::Fetching;
        }

        let image = fetcher::fetch(&selection.location, &self.config).await?;
        Ok(PotdImage { image, metadata })
    }

    /// Fills the retained candidate set, joining an enumeration started by a
    /// superseded activation instead of issuing a second listing request.
    async fn enumerate(&self, generation: u64) -> Result<(), ProviderError> {
        let mut pending = self.listing.lock().await;
        if self.has_candidates() {
            return Ok(());
        }
        if pending.is_some() {
            tracing::debug!("activation {} joins the running enumeration", generation);
        }
        let handle = pending.get_or_insert_with(|| {
            let config = self.config.clone();
            tokio::spawn(async move { source::enumerate(&config).await })
        });
        let joined = handle.await;
        *pending = None;

        // Kept even if this activation was superseded meanwhile: the next one reuses it.
        let candidates = joined??;
        self.write().candidates = Some(candidates);
        self.current(generation).map(drop)
    }

    fn select(&self, generation: u64) -> Result<Selection, ProviderError> {
        let mut state = self.current(generation)?;
        match state.candidates.as_mut() {
            Some(candidates) => selector::select(candidates),
            None => Err(ProviderError::EmptyResult),
        }
    }

    fn invalidate_cache(&self) {
        let Some(path) = &self.cache_path else {
            return;
        };
        match cache_defeat::invalidate(path) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("no host cache file at {}", path.display()),
            Err(e) => tracing::warn!("could not invalidate {}: {}", path.display(), e),
        }
    }
}
