//! Backend over a JSON inventory snapshot.
//!
//! Serves the capability triad from an in-memory copy of an inventory
//! file, with the same pagination, tag-cap, and validation rules a real
//! tagging API applies. Fault hooks let tests inject access denials,
//! per-resource failures, and throttling.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tagguard_core::config::defaults;
use tagguard_core::errors::{BackendError, SetupError};
use tagguard_core::models::{TagPayload, TagShape};
use tagguard_core::validation;
use tagguard_core::{ResourceDescriptor, ResourcePage, ResourceType, TagSet, TaggingBackend};

/// One resource in an inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryResource {
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_arn: String,
    /// `None` matches every region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: TagSet,
}

impl InventoryResource {
    pub fn new(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        resource_arn: impl Into<String>,
    ) -> Self {
        Self {
            resource_type,
            resource_id: resource_id.into(),
            resource_arn: resource_arn.into(),
            region: None,
            tags: TagSet::new(),
        }
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.resource_type, &self.resource_id, &self.resource_arn)
    }

    fn matches(&self, resource_type: ResourceType, region: &str) -> bool {
        self.resource_type == resource_type
            && self.region.as_deref().map_or(true, |r| r == region)
    }
}

/// On-disk format: `{"resources": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub resources: Vec<InventoryResource>,
}

#[derive(Debug, Default)]
struct Faults {
    denied_types: BTreeSet<ResourceType>,
    fetch_failures: BTreeMap<String, BackendError>,
    write_failures: BTreeMap<String, BackendError>,
    shape_overrides: BTreeMap<String, TagShape>,
    throttle_remaining: u32,
}

#[derive(Debug, Default)]
struct CallCounts {
    list: AtomicUsize,
    get: AtomicUsize,
    put: AtomicUsize,
}

/// In-memory [`TaggingBackend`] keyed by resource ARN.
#[derive(Debug)]
pub struct InventoryBackend {
    resources: RwLock<BTreeMap<String, InventoryResource>>,
    faults: Mutex<Faults>,
    calls: CallCounts,
    page_size: usize,
    max_tags: usize,
}

impl Default for InventoryBackend {
    fn default() -> Self {
        Self::from_snapshot(InventorySnapshot::default())
    }
}

impl InventoryBackend {
    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        let resources = snapshot
            .resources
            .into_iter()
            .map(|r| (r.resource_arn.clone(), r))
            .collect();
        Self {
            resources: RwLock::new(resources),
            faults: Mutex::new(Faults::default()),
            calls: CallCounts::default(),
            page_size: defaults::DEFAULT_PAGE_SIZE,
            max_tags: defaults::DEFAULT_MAX_TAGS_PER_RESOURCE,
        }
    }

    /// Read a snapshot file.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let content = fs::read_to_string(path).map_err(|_| SetupError::InventoryNotFound {
            path: path.display().to_string(),
        })?;
        let snapshot: InventorySnapshot =
            serde_json::from_str(&content).map_err(|e| SetupError::InventoryParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(
            path = %path.display(),
            resources = snapshot.resources.len(),
            "inventory loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the current state back out, ordered by ARN.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, json)
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            resources: self.read().values().cloned().collect(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    pub fn insert(&self, resource: InventoryResource) {
        self.write_lock().insert(resource.resource_arn.clone(), resource);
    }

    pub fn remove(&self, resource_arn: &str) -> Option<InventoryResource> {
        self.write_lock().remove(resource_arn)
    }

    /// Current tags of a resource, normalized.
    pub fn tags_of(&self, resource_arn: &str) -> Option<TagSet> {
        self.read().get(resource_arn).map(|r| r.tags.clone())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // ─── Fault hooks ───

    /// Every listing of `resource_type` fails with `AccessDenied`.
    pub fn deny_listing(&self, resource_type: ResourceType) {
        self.faults().denied_types.insert(resource_type);
    }

    /// Tag reads of `resource_arn` fail with `error`.
    pub fn fail_fetch(&self, resource_arn: impl Into<String>, error: BackendError) {
        self.faults().fetch_failures.insert(resource_arn.into(), error);
    }

    /// Tag writes to `resource_arn` fail with `error`.
    pub fn fail_writes(&self, resource_arn: impl Into<String>, error: BackendError) {
        self.faults().write_failures.insert(resource_arn.into(), error);
    }

    /// Tag reads of `resource_arn` come back in `shape` instead of the native one.
    pub fn override_shape(&self, resource_arn: impl Into<String>, shape: TagShape) {
        self.faults().shape_overrides.insert(resource_arn.into(), shape);
    }

    /// The next `calls` backend calls of any kind fail with `Throttled`.
    pub fn throttle_next(&self, calls: u32) {
        self.faults().throttle_remaining = calls;
    }

    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::Relaxed)
    }

    pub fn get_calls(&self) -> usize {
        self.calls.get.load(Ordering::Relaxed)
    }

    pub fn put_calls(&self) -> usize {
        self.calls.put.load(Ordering::Relaxed)
    }

    // ─── Internals ───

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, InventoryResource>> {
        self.resources.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, InventoryResource>> {
        self.resources.write().unwrap_or_else(|e| e.into_inner())
    }

    fn faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_throttle(&self) -> Result<(), BackendError> {
        let mut faults = self.faults();
        if faults.throttle_remaining > 0 {
            faults.throttle_remaining -= 1;
            return Err(BackendError::Throttled {
                reason: "rate exceeded".to_string(),
            });
        }
        Ok(())
    }

    fn find(&self, resource: &ResourceDescriptor) -> Result<InventoryResource, BackendError> {
        self.read()
            .get(&resource.resource_arn)
            .cloned()
            .ok_or_else(|| BackendError::NotFound {
                resource: resource.resource_arn.clone(),
            })
    }
}

impl TaggingBackend for InventoryBackend {
    fn name(&self) -> &str {
        "inventory"
    }

    fn list_resources(
        &self,
        resource_type: ResourceType,
        region: &str,
        next_token: Option<&str>,
    ) -> Result<ResourcePage, BackendError> {
        self.calls.list.fetch_add(1, Ordering::Relaxed);
        self.check_throttle()?;
        if self.faults().denied_types.contains(&resource_type) {
            return Err(BackendError::AccessDenied {
                reason: format!("not authorized to list {}", resource_type.label()),
            });
        }

        let offset = match next_token {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| BackendError::Protocol {
                reason: format!("invalid pagination token '{token}'"),
            })?,
        };

        let mut matching: Vec<ResourceDescriptor> = self
            .read()
            .values()
            .filter(|r| r.matches(resource_type, region))
            .map(InventoryResource::descriptor)
            .collect();
        matching.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));

        let end = offset.saturating_add(self.page_size).min(matching.len());
        let resources = matching.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_token = (end < matching.len()).then(|| end.to_string());
        Ok(ResourcePage {
            resources,
            next_token,
        })
    }

    fn get_tags(&self, resource: &ResourceDescriptor) -> Result<TagPayload, BackendError> {
        self.calls.get.fetch_add(1, Ordering::Relaxed);
        self.check_throttle()?;
        let (failure, shape_override) = {
            let faults = self.faults();
            (
                faults.fetch_failures.get(&resource.resource_arn).cloned(),
                faults.shape_overrides.get(&resource.resource_arn).copied(),
            )
        };
        if let Some(err) = failure {
            return Err(err);
        }
        let stored = self.find(resource)?;
        let shape = shape_override.unwrap_or_else(|| stored.resource_type.tag_shape());
        Ok(TagPayload::from_tag_set(shape, &stored.resource_arn, &stored.tags))
    }

    fn tag_resource(&self, resource: &ResourceDescriptor, tags: &TagSet) -> Result<(), BackendError> {
        self.calls.put.fetch_add(1, Ordering::Relaxed);
        self.check_throttle()?;
        if let Some(err) = self.faults().write_failures.get(&resource.resource_arn).cloned() {
            return Err(err);
        }
        validation::validate_tags(tags).map_err(|reason| BackendError::InvalidTag { reason })?;

        let mut resources = self.write_lock();
        let stored = resources
            .get_mut(&resource.resource_arn)
            .ok_or_else(|| BackendError::NotFound {
                resource: resource.resource_arn.clone(),
            })?;
        let merged = stored.tags.merged(tags);
        if merged.len() > self.max_tags {
            return Err(BackendError::TagLimitExceeded {
                attempted: merged.len(),
                limit: self.max_tags,
            });
        }
        stored.tags = merged;
        Ok(())
    }
}
