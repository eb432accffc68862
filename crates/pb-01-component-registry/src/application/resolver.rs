//! # Resolver Service
//!
//! Single-flight asynchronous resolution in front of [`PaneRegistry`].
//!
//! Concurrent requests for the same key share one in-flight future. The
//! future removes its own map entry as it settles, so cleanup never depends
//! on any particular caller surviving to completion and failures stay
//! retryable on the next call rather than blacklisted.
//!
//! Strategy order per resolution: injected [`GlobalResolver`] override
//! first, descriptor-supplied loader second. An override returning
//! `Ok(None)` falls through; an override error fails the attempt.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use shared_types::{compose_key, ModuleType, ParsedPaneId, Renderable};
use tracing::debug;

use crate::application::registry::PaneRegistry;
use crate::domain::ResolveError;
use crate::ports::GlobalResolver;

/// Settled-or-pending outcome shared between concurrent callers of one key.
type ResolutionFuture = Shared<BoxFuture<'static, Result<Arc<dyn Renderable>, ResolveError>>>;

/// Asynchronous resolution front-end.
///
/// Holds its collaborators by `Arc`; construct once per shell session and
/// clone handles freely.
pub struct ResolverService {
    registry: Arc<PaneRegistry>,
    global_resolver: Option<Arc<dyn GlobalResolver>>,
    in_flight: Arc<Mutex<HashMap<String, ResolutionFuture>>>,
}

impl ResolverService {
    /// Resolver over the given registry, with no override strategy.
    pub fn new(registry: Arc<PaneRegistry>) -> Self {
        Self {
            registry,
            global_resolver: None,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Attach a host-supplied override strategy.
    #[must_use]
    pub fn with_global_resolver(mut self, resolver: Arc<dyn GlobalResolver>) -> Self {
        self.global_resolver = Some(resolver);
        self
    }

    /// The registry this resolver populates.
    pub fn registry(&self) -> &Arc<PaneRegistry> {
        &self.registry
    }

    /// Number of resolutions currently in flight.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolve a unit for the given type and identifier.
    ///
    /// When `pane_id` is supplied the unit is registered under that instance
    /// key; otherwise under the composed base key. Registry hits return
    /// immediately without touching any loader.
    pub async fn resolve(
        &self,
        module_type: &str,
        static_identifier: &str,
        pane_id: Option<&str>,
    ) -> Result<Arc<dyn Renderable>, ResolveError> {
        let key = match pane_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => compose_key(module_type, static_identifier, None),
        };
        if key.is_empty() {
            return Err(ResolveError::EmptyKey);
        }
        if let Some(unit) = self.registry.get(&key) {
            return Ok(unit);
        }

        let resolution = {
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    debug!(key = %key, "Starting component resolution");
                    let resolution = Self::run_resolution(
                        Arc::clone(&self.registry),
                        self.global_resolver.clone(),
                        key.clone(),
                        module_type.to_string(),
                        static_identifier.to_string(),
                    );
                    // The future clears its own entry when it settles, so a
                    // settled outcome is never replayed to later callers even
                    // if the caller that created the entry was dropped.
                    let map = Arc::clone(&self.in_flight);
                    let entry_key = key.clone();
                    let future = async move {
                        let outcome = resolution.await;
                        map.lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .remove(&entry_key);
                        outcome
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key.clone(), future.clone());
                    future
                }
            }
        };

        resolution.await
    }

    /// Resolve from a full pane identifier, parsing type and identifier out
    /// of the key itself.
    pub async fn resolve_pane(&self, pane_id: &str) -> Result<Arc<dyn Renderable>, ResolveError> {
        if pane_id.is_empty() {
            return Err(ResolveError::EmptyKey);
        }
        let parsed = ParsedPaneId::parse(pane_id).ok_or_else(|| ResolveError::InvalidKey {
            key: pane_id.to_string(),
        })?;
        self.resolve(&parsed.module_type, &parsed.static_identifier, Some(pane_id))
            .await
    }

    async fn run_resolution(
        registry: Arc<PaneRegistry>,
        global_resolver: Option<Arc<dyn GlobalResolver>>,
        key: String,
        module_type_raw: String,
        static_identifier: String,
    ) -> Result<Arc<dyn Renderable>, ResolveError> {
        let Some(module_type) = ModuleType::from_canonical(&module_type_raw) else {
            let error = ResolveError::UnknownModuleType(module_type_raw);
            registry.record_error(&key, error.to_string());
            return Err(error);
        };

        if let Some(resolver) = &global_resolver {
            match resolver.resolve(&static_identifier, module_type).await {
                Ok(Some(unit)) => {
                    registry.register(&key, Arc::clone(&unit));
                    debug!(key = %key, "Resolved via injected resolver");
                    return Ok(unit);
                }
                Ok(None) => {}
                Err(cause) => {
                    let error = ResolveError::LoadFailed {
                        identifier: static_identifier,
                        message: cause.0,
                    };
                    registry.record_error(&key, error.to_string());
                    return Err(error);
                }
            }
        }

        let loader = registry
            .find_descriptor(&static_identifier)
            .and_then(|descriptor| descriptor.loader);
        let Some(loader) = loader else {
            let error = ResolveError::NoResolver {
                identifier: static_identifier,
            };
            registry.record_error(&key, error.to_string());
            return Err(error);
        };

        match loader.load().await {
            Ok(unit) => {
                registry.register(&key, Arc::clone(&unit));
                debug!(key = %key, "Resolved via descriptor loader");
                Ok(unit)
            }
            Err(cause) => {
                let error = ResolveError::LoadFailed {
                    identifier: static_identifier,
                    message: cause.0,
                };
                registry.record_error(&key, error.to_string());
                Err(error)
            }
        }
    }
}
