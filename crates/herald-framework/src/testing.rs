//! In-memory doubles for the store and the gateway.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use herald_core::{Gateway, GatewayError, GatewayResult};
use parking_lot::Mutex;
use serde_json::Value;

use crate::config::{ConfigStore, PrivilegeGrant, Settings};
use crate::error::{StoreError, StoreResult};

pub(crate) struct MemoryStore {
    settings: Mutex<Settings>,
    privilege: Mutex<PrivilegeGrant>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            privilege: Mutex::new(PrivilegeGrant::new()),
            fail_loads: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_privilege(self, privilege: PrivilegeGrant) -> Self {
        *self.privilege.lock() = privilege;
        self
    }

    pub(crate) fn privilege(&self) -> PrivilegeGrant {
        self.privilege.lock().clone()
    }

    pub(crate) fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::io("memory", std::io::Error::other("injected failure")))
        } else {
            Ok(())
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load_settings(&self) -> StoreResult<Settings> {
        Self::check(&self.fail_loads)?;
        Ok(self.settings.lock().clone())
    }

    fn load_privilege(&self) -> StoreResult<PrivilegeGrant> {
        Self::check(&self.fail_loads)?;
        Ok(self.privilege.lock().clone())
    }

    fn save_privilege(&self, privilege: &PrivilegeGrant) -> StoreResult<()> {
        Self::check(&self.fail_saves)?;
        *self.privilege.lock() = privilege.clone();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingGateway {
    calls: Mutex<Vec<(String, Value)>>,
    responses: HashMap<String, Value>,
    fail: AtomicBool,
}

impl RecordingGateway {
    /// Answers `action` with `data` instead of `null`.
    pub(crate) fn with_response(mut self, action: &str, data: Value) -> Self {
        self.responses.insert(action.to_string(), data);
        self
    }

    pub(crate) fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail.store(true, Ordering::SeqCst);
        gateway
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    /// Messages sent to either chat endpoint.
    pub(crate) fn messages(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|(action, _)| action == "send_group_msg" || action == "send_private_msg")
            .filter_map(|(_, params)| params["message"].as_str().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn call_api(&self, action: &str, params: Value) -> GatewayResult<Value> {
        self.calls.lock().push((action.to_string(), params));
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Timeout(5000));
        }
        Ok(self.responses.get(action).cloned().unwrap_or(Value::Null))
    }
}
