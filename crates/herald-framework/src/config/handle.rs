//! Versioned configuration snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use super::privilege::PrivilegeGrant;
use super::settings::Settings;
use crate::error::StoreResult;

/// Persistent storage for the settings and privilege documents.
pub trait ConfigStore: Send + Sync {
    /// Reads the settings document.
    fn load_settings(&self) -> StoreResult<Settings>;

    /// Reads the privilege document.
    fn load_privilege(&self) -> StoreResult<PrivilegeGrant>;

    /// Replaces the privilege document.
    fn save_privilege(&self, privilege: &PrivilegeGrant) -> StoreResult<()>;
}

/// An immutable view of the configuration at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    /// Monotonic version, starting at 1.
    pub version: u64,
    /// Global settings.
    pub settings: Settings,
    /// Privilege grants.
    pub privilege: PrivilegeGrant,
}

/// Shared access to the current [`ConfigSnapshot`].
///
/// Readers get an `Arc` to an immutable snapshot, so a reload never
/// exposes a half-updated view. Mutations go through
/// [`update_privilege`](Self::update_privilege), which persists the new
/// document and raises the reload flag; the next
/// [`snapshot`](Self::snapshot) call swaps in a freshly loaded snapshot.
pub struct ConfigHandle {
    store: Arc<dyn ConfigStore>,
    current: RwLock<Arc<ConfigSnapshot>>,
    reload: AtomicBool,
    write_lock: Mutex<()>,
}

impl ConfigHandle {
    /// Loads both documents and creates the handle at version 1.
    pub fn open(store: Arc<dyn ConfigStore>) -> StoreResult<Self> {
        let settings = store.load_settings()?;
        let privilege = store.load_privilege()?;
        info!(
            owner = settings.owner_id,
            managers = settings.manager_ids.len(),
            "Configuration loaded"
        );
        Ok(Self {
            store,
            current: RwLock::new(Arc::new(ConfigSnapshot {
                version: 1,
                settings,
                privilege,
            })),
            reload: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the current snapshot without checking the reload flag.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.current.read().clone()
    }

    /// Returns the current snapshot, reloading it first if requested.
    ///
    /// A failed reload keeps the previous snapshot and leaves the flag
    /// raised so the next call retries.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        if self.reload.load(Ordering::Acquire) {
            let _guard = self.write_lock.lock();
            if self.reload.load(Ordering::Acquire) {
                self.reload_locked();
            }
        }
        self.current()
    }

    fn reload_locked(&self) {
        let loaded = self
            .store
            .load_settings()
            .and_then(|settings| Ok((settings, self.store.load_privilege()?)));

        match loaded {
            Ok((settings, privilege)) => {
                let mut current = self.current.write();
                let version = current.version + 1;
                *current = Arc::new(ConfigSnapshot {
                    version,
                    settings,
                    privilege,
                });
                self.reload.store(false, Ordering::Release);
                debug!(version, "Configuration reloaded");
            }
            Err(e) => {
                error!(error = %e, "Configuration reload failed, keeping previous snapshot");
            }
        }
    }

    /// Marks the snapshot stale.
    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::Release);
    }

    /// Returns `true` if a reload has been requested and not yet applied.
    pub fn reload_pending(&self) -> bool {
        self.reload.load(Ordering::Acquire)
    }

    /// Returns the version of the current snapshot.
    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Reads the privilege document from the store, applies `f`, saves the
    /// whole document back and requests a reload.
    ///
    /// Concurrent updates are serialized, so no write is lost.
    pub fn update_privilege<R>(&self, f: impl FnOnce(&mut PrivilegeGrant) -> R) -> StoreResult<R> {
        let _guard = self.write_lock.lock();
        let mut privilege = self.store.load_privilege()?;
        let result = f(&mut privilege);
        self.store.save_privilege(&privilege)?;
        self.reload.store(true, Ordering::Release);
        Ok(result)
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigHandle")
            .field("version", &self.version())
            .field("reload_pending", &self.reload_pending())
            .finish_non_exhaustive()
    }
}
