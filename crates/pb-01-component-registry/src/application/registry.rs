//! # Pane Registry
//!
//! Synchronous registry state on the render hot path. Every operation is
//! lock-guarded, non-async and non-panicking; a poisoned lock is recovered
//! rather than propagated so a panicked writer elsewhere cannot take the
//! registry down with it.
//!
//! Registrations are keyed by composite pane key: 2-part base keys cache
//! "how to build one of these", 3-part instance keys are live panes. Only
//! instance registrations broadcast change events.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use shared_types::{compose_key, ModuleDescriptor, ModuleType, ParsedPaneId, Renderable};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::{now_millis, ComponentRegistration, ErrorRecord};
use crate::events::{RegistryEvent, RegistryEvents};

/// In-memory registry of resolved renderable units.
///
/// Cheap to share: hold it in an `Arc` and hand clones of that `Arc` to the
/// resolver and the UI layer.
pub struct PaneRegistry {
    registrations: RwLock<HashMap<String, ComponentRegistration>>,
    descriptors: RwLock<BTreeMap<String, ModuleDescriptor>>,
    logo_urls: RwLock<HashMap<String, String>>,
    errors: RwLock<HashMap<String, ErrorRecord>>,
    events: RegistryEvents,
}

impl PaneRegistry {
    /// Empty registry with a default-capacity event bus.
    pub fn new() -> Self {
        Self::with_events(RegistryEvents::new())
    }

    /// Empty registry with an explicit event bus.
    pub fn with_events(events: RegistryEvents) -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            descriptors: RwLock::new(BTreeMap::new()),
            logo_urls: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Store a resolved unit under the given key.
    ///
    /// Returns `true` only for live instance registrations, which also
    /// broadcast a change event. Base keys are stored silently; keys that do
    /// not parse, or whose type segment names no known module type, are
    /// dropped. Never raises either way.
    pub fn register(&self, key: &str, unit: Arc<dyn Renderable>) -> bool {
        let Some(parsed) = ParsedPaneId::parse(key) else {
            debug!(key, "Dropping registration under unparseable key");
            return false;
        };
        let Some(module_type) = ModuleType::from_canonical(&parsed.module_type) else {
            debug!(key, "Dropping registration under unknown module type");
            return false;
        };
        let is_instance = parsed.is_instance();
        let registration = ComponentRegistration {
            key: key.to_string(),
            unit,
            module_type,
            static_identifier: parsed.static_identifier,
            is_instance,
            registered_at: now_millis(),
        };
        let replaced = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), registration)
            .is_some();
        if !is_instance {
            return false;
        }
        if replaced {
            warn!(key, "Replacing live pane registration");
            self.events.publish(RegistryEvent::InstanceReplaced {
                key: key.to_string(),
            });
        } else {
            self.events.publish(RegistryEvent::InstanceRegistered {
                key: key.to_string(),
            });
        }
        true
    }

    /// Look up the unit registered under a key.
    pub fn get(&self, key: &str) -> Option<Arc<dyn Renderable>> {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|registration| Arc::clone(&registration.unit))
    }

    /// Full registration record for a key.
    pub fn registration(&self, key: &str) -> Option<ComponentRegistration> {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Whether a key has a registration.
    pub fn contains(&self, key: &str) -> bool {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Remove a registration; `true` when something was removed.
    pub fn unregister(&self, key: &str) -> bool {
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// All registration keys, base keys included, sorted.
    pub fn list_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Keys registered under one module type, sorted.
    pub fn keys_of_type(&self, module_type: ModuleType) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|registration| registration.module_type == module_type)
            .map(|registration| registration.key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Keys of live pane instances, sorted for stable iteration.
    pub fn list_instance_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|registration| registration.is_instance)
            .map(|registration| registration.key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of live pane instances.
    pub fn instance_count(&self) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|registration| registration.is_instance)
            .count()
    }

    /// Total registrations, base keys included.
    pub fn registered_count(&self) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Replace the descriptor catalog with a defensive copy.
    ///
    /// Descriptor logo associations are indexed under their base keys so
    /// logo lookup stays O(1) on the render path.
    pub fn set_module_data(&self, descriptors: &BTreeMap<String, ModuleDescriptor>) {
        {
            let mut stored = self
                .descriptors
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *stored = descriptors.clone();
        }
        let mut logos = self
            .logo_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for descriptor in descriptors.values() {
            if let Some(url) = &descriptor.logo_url {
                let base = compose_key(
                    descriptor.module_type.as_str(),
                    &descriptor.static_identifier,
                    None,
                );
                if !base.is_empty() {
                    logos.insert(base, url.clone());
                }
            }
        }
    }

    /// Descriptor answering to the given static identifier.
    ///
    /// Exact catalog-key match first, then the descriptor's own matching
    /// rules (static identifier or display name).
    pub fn find_descriptor(&self, static_identifier: &str) -> Option<ModuleDescriptor> {
        let stored = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        stored.get(static_identifier).cloned().or_else(|| {
            stored
                .values()
                .find(|descriptor| descriptor.matches(static_identifier))
                .cloned()
        })
    }

    /// Associate a logo URL with a key directly.
    pub fn set_logo_url(&self, key: &str, url: impl Into<String>) {
        self.logo_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), url.into());
    }

    /// Logo URL for a key, falling back to the key's base form.
    pub fn logo_url(&self, key: &str) -> Option<String> {
        let logos = self.logo_urls.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(url) = logos.get(key) {
            return Some(url.clone());
        }
        let parsed = ParsedPaneId::parse(key)?;
        let base = compose_key(&parsed.module_type, &parsed.static_identifier, None);
        logos.get(&base).cloned()
    }

    /// Record a load failure for a key, overwriting any earlier record.
    pub fn record_error(&self, key: &str, message: impl Into<String>) {
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), ErrorRecord::new(message));
    }

    /// Most recent load failure recorded for a key.
    pub fn last_error(&self, key: &str) -> Option<ErrorRecord> {
        self.errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Snapshot of every recorded failure, keyed by pane key.
    pub fn errors(&self) -> BTreeMap<String, ErrorRecord> {
        self.errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    /// Number of keys with a recorded failure.
    pub fn error_count(&self) -> usize {
        self.errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop all registrations and error records.
    ///
    /// The descriptor catalog and logo index survive a clear; they describe
    /// what can exist, not what currently does.
    pub fn clear(&self) {
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Subscribe to registration change events.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// The underlying event bus.
    pub fn events(&self) -> &RegistryEvents {
        &self.events
    }
}

impl Default for PaneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StaticUnit;

    #[test]
    fn base_registration_is_stored_but_silent() {
        let registry = PaneRegistry::new();
        assert!(!registry.register("SYSTEM-Super", StaticUnit::shared("super")));
        assert!(registry.contains("SYSTEM-Super"));
        assert!(registry.list_instance_keys().is_empty());
        assert_eq!(registry.events().events_published(), 0);
    }

    #[test]
    fn instance_registration_emits_and_lists() {
        let registry = PaneRegistry::new();
        registry.register("SYSTEM-Super", StaticUnit::shared("super"));
        assert!(registry.register("SYSTEM-Super-a1b2", StaticUnit::shared("super")));
        assert_eq!(registry.list_instance_keys(), vec!["SYSTEM-Super-a1b2"]);
        assert_eq!(registry.instance_count(), 1);
        assert_eq!(registry.registered_count(), 2);
        assert_eq!(
            registry.list_keys(),
            vec!["SYSTEM-Super", "SYSTEM-Super-a1b2"]
        );
        assert_eq!(
            registry.keys_of_type(ModuleType::System),
            vec!["SYSTEM-Super", "SYSTEM-Super-a1b2"]
        );
        assert!(registry.keys_of_type(ModuleType::Service).is_empty());
        assert_eq!(registry.events().events_published(), 1);
    }

    #[tokio::test]
    async fn replacing_an_instance_broadcasts_replaced() {
        let registry = PaneRegistry::new();
        let mut rx = registry.subscribe();
        registry.register("SERVICE-Nvidia-z9", StaticUnit::shared("first"));
        registry.register("SERVICE-Nvidia-z9", StaticUnit::shared("second"));
        assert_eq!(
            rx.recv().await.unwrap(),
            RegistryEvent::InstanceRegistered {
                key: "SERVICE-Nvidia-z9".to_string()
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            RegistryEvent::InstanceReplaced {
                key: "SERVICE-Nvidia-z9".to_string()
            }
        );
        assert_eq!(
            registry.get("SERVICE-Nvidia-z9").unwrap().unit_name(),
            "second"
        );
    }

    #[test]
    fn malformed_keys_are_dropped_without_panic() {
        let registry = PaneRegistry::new();
        assert!(!registry.register("", StaticUnit::shared("x")));
        assert!(!registry.register("garbage", StaticUnit::shared("x")));
        assert!(!registry.register("PLASMA-Thing", StaticUnit::shared("x")));
        assert_eq!(registry.registered_count(), 0);
    }

    #[test]
    fn module_data_indexes_logos_under_base_keys() {
        let registry = PaneRegistry::new();
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "Nvidia".to_string(),
            ModuleDescriptor::new(ModuleType::Service, "Nvidia")
                .with_name("GPU Monitor")
                .with_logo_url("https://assets.example/nvidia.svg"),
        );
        registry.set_module_data(&catalog);

        assert_eq!(
            registry.logo_url("SERVICE-Nvidia-z9").as_deref(),
            Some("https://assets.example/nvidia.svg")
        );
        let by_name = registry.find_descriptor("GPU Monitor").unwrap();
        assert_eq!(by_name.static_identifier, "Nvidia");
    }

    #[test]
    fn error_records_overwrite_per_key() {
        let registry = PaneRegistry::new();
        registry.record_error("SYSTEM-Super-a", "first failure");
        registry.record_error("SYSTEM-Super-a", "second failure");
        assert_eq!(registry.error_count(), 1);
        assert_eq!(
            registry.last_error("SYSTEM-Super-a").unwrap().message,
            "second failure"
        );
        assert!(registry.errors().contains_key("SYSTEM-Super-a"));
    }

    #[test]
    fn clear_keeps_the_catalog() {
        let registry = PaneRegistry::new();
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "Super".to_string(),
            ModuleDescriptor::new(ModuleType::System, "Super"),
        );
        registry.set_module_data(&catalog);
        registry.register("SYSTEM-Super-a", StaticUnit::shared("super"));
        registry.record_error("SYSTEM-Super-b", "boom");

        registry.clear();
        assert_eq!(registry.registered_count(), 0);
        assert_eq!(registry.error_count(), 0);
        assert!(registry.find_descriptor("Super").is_some());
    }
}
