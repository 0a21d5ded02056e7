//! Install / activate / fetch lifecycle of the asset cache worker.
//!
//! A worker is bound to one [`CacheManifest`]. Installing populates the cache
//! named after the manifest version; activating deletes every other cache.
//! Once active, the worker routes each intercepted request:
//!
//! * static assets inside the scope: cache first, network on a miss
//! * navigations: network first, the cached entry point when offline
//! * anything else: not intercepted

use std::sync::{Arc, Mutex, RwLock};

use reqwest::Url;

use crate::model::manifest::CacheManifest;
use crate::worker::error::WorkerError;
use crate::worker::network::Network;
use crate::worker::request::{AssetRequest, AssetResponse};
use crate::worker::storage::CacheStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    /// Installed and waiting to take over from the active worker.
    Installed,
    Activating,
    Activated,
    Redundant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRoute {
    Respond(AssetResponse),
    /// The worker does not handle this request.
    Passthrough,
}

pub struct AssetCacheWorker {
    manifest: CacheManifest,
    scope: Url,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    state: Mutex<WorkerState>,
}

impl AssetCacheWorker {
    pub fn new(
        manifest: CacheManifest,
        scope: Url,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Result<Self, WorkerError> {
        manifest.validate().map_err(WorkerError::InvalidManifest)?;
        Ok(Self {
            manifest,
            scope,
            storage,
            network,
            state: Mutex::new(WorkerState::Installing),
        })
    }

    pub fn version(&self) -> &str {
        &self.manifest.cache_version
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn resolve(&self, asset: &str) -> Result<String, WorkerError> {
        self.scope
            .join(asset)
            .map(String::from)
            .map_err(|_| WorkerError::InvalidUrl(asset.to_string()))
    }

    pub fn entry_point_url(&self) -> Result<String, WorkerError> {
        self.resolve(&self.manifest.entry_point)
    }

    /// Fetch every manifest asset and store them under the version's cache.
    /// One failed asset fails the install and nothing is stored.
    pub fn install(&self) -> Result<usize, WorkerError> {
        self.set_state(WorkerState::Installing);

        let fetched = self.fetch_manifest_assets();
        let stored = fetched.and_then(|responses| -> Result<usize, WorkerError> {
            let count = responses.len();
            self.storage.open(self.version())?;
            self.storage.put_all(self.version(), responses)?;
            Ok(count)
        });

        match stored {
            Ok(count) => {
                self.set_state(WorkerState::Installed);
                tracing::info!(version = self.version(), assets = count, "Asset cache installed");
                Ok(count)
            }
            Err(e) => {
                self.set_state(WorkerState::Redundant);
                tracing::warn!(version = self.version(), error = %e, "Asset cache install failed");
                Err(e)
            }
        }
    }

    /// Take over a cache an earlier run already populated for this version.
    /// Returns false when any manifest asset is missing from it.
    pub fn adopt_existing(&self) -> bool {
        let Ok(stored) = self.storage.entries(self.version()) else {
            return false;
        };
        let complete = !stored.is_empty()
            && self.manifest.assets.iter().all(|asset| {
                self.resolve(asset)
                    .map(|url| stored.contains(&url))
                    .unwrap_or(false)
            });
        if complete {
            self.set_state(WorkerState::Installed);
            tracing::info!(version = self.version(), "Reusing populated asset cache");
        }
        complete
    }

    fn fetch_manifest_assets(&self) -> Result<Vec<AssetResponse>, WorkerError> {
        let mut responses = Vec::with_capacity(self.manifest.assets.len());
        for asset in &self.manifest.assets {
            let url = self.resolve(asset)?;
            let response = self.network.fetch(&AssetRequest::get(url.clone()))?;
            if !response.is_success() {
                return Err(WorkerError::BadStatus {
                    url,
                    status: response.status,
                });
            }
            responses.push(response);
        }
        Ok(responses)
    }

    /// Delete every cache not named after this worker's version. Returns the
    /// names that were evicted.
    pub fn activate(&self) -> Result<Vec<String>, WorkerError> {
        if self.state() != WorkerState::Installed {
            return Err(WorkerError::NotInstalled(self.version().to_string()));
        }
        self.set_state(WorkerState::Activating);

        let mut evicted = Vec::new();
        match self.storage.keys() {
            Ok(keys) => {
                for key in keys.into_iter().filter(|k| k != self.version()) {
                    match self.storage.delete(&key) {
                        Ok(true) => evicted.push(key),
                        Ok(false) => {}
                        Err(e) => tracing::warn!(cache = %key, error = %e, "Could not evict cache"),
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "Could not list caches during activation"),
        }

        self.set_state(WorkerState::Activated);
        tracing::info!(version = self.version(), evicted = ?evicted, "Asset cache worker active");
        Ok(evicted)
    }

    pub(crate) fn retire(&self) {
        self.set_state(WorkerState::Redundant);
    }

    pub fn handle_fetch(&self, request: &AssetRequest) -> Result<FetchRoute, WorkerError> {
        if self.state() != WorkerState::Activated {
            return Ok(FetchRoute::Passthrough);
        }

        if request.is_static_asset(self.scope.as_str()) {
            match self.storage.match_url(self.version(), &request.url) {
                Ok(Some(cached)) => {
                    tracing::trace!(url = %request.url, "Cache hit");
                    return Ok(FetchRoute::Respond(cached));
                }
                Ok(None) => tracing::trace!(url = %request.url, "Cache miss"),
                Err(e) => tracing::warn!(url = %request.url, error = %e, "Cache lookup failed, using network"),
            }
            return self.network.fetch(request).map(FetchRoute::Respond);
        }

        if request.is_navigation() {
            return match self.network.fetch(request) {
                Ok(response) => Ok(FetchRoute::Respond(response)),
                Err(e) => {
                    tracing::debug!(url = %request.url, error = %e, "Navigation offline, serving entry point");
                    let entry = self.entry_point_url()?;
                    self.storage
                        .match_url(self.version(), &entry)?
                        .map(FetchRoute::Respond)
                        .ok_or(WorkerError::Offline(request.url.clone()))
                }
            };
        }

        Ok(FetchRoute::Passthrough)
    }
}

/// The registration a client talks to. Holds the active worker (if any) and
/// a worker waiting to replace it.
pub struct WorkerRegistration {
    scope: Url,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    active: RwLock<Option<Arc<AssetCacheWorker>>>,
    waiting: RwLock<Option<Arc<AssetCacheWorker>>>,
}

impl WorkerRegistration {
    pub fn new(
        scope: &str,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Result<Self, WorkerError> {
        let normalized = if scope.ends_with('/') {
            scope.to_string()
        } else {
            format!("{scope}/")
        };
        let scope = Url::parse(&normalized).map_err(|_| WorkerError::InvalidUrl(scope.to_string()))?;

        Ok(Self {
            scope,
            storage,
            network,
            active: RwLock::new(None),
            waiting: RwLock::new(None),
        })
    }

    pub fn scope(&self) -> &str {
        self.scope.as_str()
    }

    /// Absolute URL of a scope-relative asset path.
    pub fn resolve(&self, asset: &str) -> Result<String, WorkerError> {
        self.scope
            .join(asset)
            .map(String::from)
            .map_err(|_| WorkerError::InvalidUrl(asset.to_string()))
    }

    pub fn active(&self) -> Option<Arc<AssetCacheWorker>> {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn waiting(&self) -> Option<Arc<AssetCacheWorker>> {
        self.waiting.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Install a worker for `manifest` and leave it waiting. The active
    /// worker keeps serving whether or not the install succeeds. A cache
    /// left complete by an earlier run is reused without refetching.
    pub fn install_update(&self, manifest: CacheManifest) -> Result<Arc<AssetCacheWorker>, WorkerError> {
        let worker = Arc::new(AssetCacheWorker::new(
            manifest,
            self.scope.clone(),
            self.storage.clone(),
            self.network.clone(),
        )?);
        if !worker.adopt_existing() {
            worker.install()?;
        }

        let mut waiting = self.waiting.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = waiting.replace(worker.clone()) {
            previous.retire();
        }
        Ok(worker)
    }

    /// Promote the waiting worker, if any, to active.
    pub fn activate_waiting(&self) -> Result<Option<Arc<AssetCacheWorker>>, WorkerError> {
        let Some(next) = self.waiting.write().unwrap_or_else(|e| e.into_inner()).take() else {
            return Ok(None);
        };
        next.activate()?;

        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.replace(next.clone()) {
            previous.retire();
        }
        Ok(Some(next))
    }

    /// Install and activate `manifest` unless its version is already active.
    pub fn register(&self, manifest: CacheManifest) -> Result<Arc<AssetCacheWorker>, WorkerError> {
        if let Some(current) = self.active() {
            if current.version() == manifest.cache_version {
                return Ok(current);
            }
        }

        self.install_update(manifest)?;
        self.activate_waiting()?
            .ok_or_else(|| WorkerError::Storage("installed worker vanished before activation".into()))
    }

    /// The interception boundary: every asset load of the app goes through here.
    pub fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, WorkerError> {
        if let Some(worker) = self.active() {
            if let FetchRoute::Respond(response) = worker.handle_fetch(request)? {
                return Ok(response);
            }
        }
        self.network.fetch(request)
    }
}

impl Network for WorkerRegistration {
    fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, WorkerError> {
        WorkerRegistration::fetch(self, request)
    }
}
