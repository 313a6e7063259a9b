//! Request dispatcher
//!
//! One generic path for every content fetch: derive the cache key, serve a
//! cache hit without touching the network, otherwise call the gateway under
//! the retry policy, validate the payload, write it to the cache and return it.

pub mod degrade;
pub mod request;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use serde::{Serialize, de::DeserializeOwned};

use crate::cache::CacheStore;
use crate::error::{ConfigError, GatewayError, Result};
use crate::gateway::Gateway;
use crate::retry::{RetryPolicy, retry};

pub use degrade::{Degradation, propagate};
pub use request::{Operation, RequestDescriptor, normalize_text};

type FlightLock = Arc<tokio::sync::Mutex<()>>;

/// Ties the cache, the retry policy and the gateway together
pub struct Dispatcher<G: Gateway> {
    gateway: Arc<G>,
    cache: CacheStore,
    retry: RetryPolicy,
    /// Per-operation expiry; operations not listed never expire
    expiry: HashMap<Operation, Duration>,
    /// Per-key locks for in-flight deduplication; `None` when disabled
    in_flight: Option<Mutex<HashMap<String, FlightLock>>>,
}

impl<G: Gateway> Dispatcher<G> {
    pub fn new(gateway: G, cache: CacheStore) -> Self {
        Self {
            gateway: Arc::new(gateway),
            cache,
            retry: RetryPolicy::default(),
            expiry: HashMap::new(),
            in_flight: Some(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_expiry(mut self, expiry: HashMap<Operation, Duration>) -> Self {
        self.expiry = expiry;
        self
    }

    /// Toggle in-flight deduplication. When off, concurrent callers for the
    /// same key each hit the gateway and the last write wins.
    pub fn with_dedupe(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    #[allow(dead_code)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[allow(dead_code)]
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Run one request end to end.
    ///
    /// A successful `null` result (e.g. no image produced) is returned but
    /// never cached. Failures are never cached either.
    pub async fn dispatch<T>(&self, descriptor: &RequestDescriptor) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        let key = descriptor.cache_key();
        let ttl = self.expiry.get(&descriptor.operation).copied();

        if let Some(hit) = self.cached::<T>(&key, ttl) {
            debug!("Cache hit: {}", descriptor.operation);
            return Ok(hit);
        }

        let Some(lock) = self.flight_lock(&key) else {
            return self.fetch_and_store(descriptor, &key).await;
        };

        let result = {
            let _guard = lock.lock().await;
            // Another caller may have filled the cache while we waited
            match self.cached::<T>(&key, ttl) {
                Some(hit) => {
                    debug!("Cache hit after waiting on in-flight request: {}", descriptor.operation);
                    Ok(hit)
                }
                None => self.fetch_and_store(descriptor, &key).await,
            }
        };

        self.release_flight_lock(&key, lock);
        result
    }

    fn cached<T: DeserializeOwned>(&self, key: &str, ttl: Option<Duration>) -> Option<T> {
        let entry = self.cache.get(key, ttl)?;
        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Cached value for {} no longer matches its type: {}", key, e);
                None
            }
        }
    }

    async fn fetch_and_store<T>(&self, descriptor: &RequestDescriptor, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        debug!("Cache miss: {}", descriptor.operation);

        if !self.gateway.is_configured() {
            return Err(ConfigError::MissingGateway.into());
        }

        let request = descriptor.to_gateway_request();
        let operation = descriptor.operation;

        let value: T = retry(self.retry, || async {
            let payload = self.gateway.generate(&request).await?;
            let payload = operation.normalize_payload(payload);
            serde_json::from_value::<T>(payload).map_err(|e| {
                GatewayError::InvalidResponse(format!("Unexpected {} payload: {}", operation, e))
            })
        })
        .await?;

        match serde_json::to_value(&value) {
            Ok(json) if !json.is_null() => {
                self.cache.set(key, &json);
                info!("Fetched and cached {}", operation);
            }
            Ok(_) => debug!("Empty {} result, not caching", operation),
            Err(e) => log::warn!("Could not serialize {} for caching: {}", operation, e),
        }

        Ok(value)
    }

    fn flight_lock(&self, key: &str) -> Option<FlightLock> {
        let in_flight = self.in_flight.as_ref()?;
        let mut locks = in_flight.lock().ok()?;
        Some(locks.entry(key.to_string()).or_default().clone())
    }

    fn release_flight_lock(&self, key: &str, lock: FlightLock) {
        let Some(in_flight) = self.in_flight.as_ref() else {
            return;
        };
        if let Ok(mut locks) = in_flight.lock() {
            // Held by the map and by us only: nobody else is waiting
            if Arc::strong_count(&lock) <= 2 {
                locks.remove(key);
            }
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .as_ref()
            .map(|m| m.lock().unwrap().len())
            .unwrap_or(0)
    }
}
