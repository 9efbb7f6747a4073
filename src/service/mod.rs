//! Shared store service
//!
//! The store runs inside a dedicated task with exclusive ownership of
//! the map. Callers hold a cloneable handle and talk to the task over a
//! channel, one oneshot reply per request. Saves are therefore atomic
//! with respect to every other operation, and each scan runs against a
//! consistent snapshot of the store.

use crate::config::StoreConfig;
use crate::query::age::{AgeAbove, AgeBelow};
use crate::query::{And, Predicate};
use crate::store::{Person, PersonStore, StoreStats};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// A request sent to the store task
enum StoreRequest {
    Save {
        person: Person,
        reply: oneshot::Sender<Result<bool, crate::error::StoreError>>,
    },
    FindByName {
        name: String,
        reply: oneshot::Sender<Option<Person>>,
    },
    Query {
        predicate: Box<dyn Predicate>,
        reply: oneshot::Sender<Vec<Person>>,
    },
    Remove {
        name: String,
        reply: oneshot::Sender<Option<Person>>,
    },
    Stats {
        reply: oneshot::Sender<StoreStats>,
    },
}

impl StoreRequest {
    /// Get the request kind (for debugging/logging)
    fn kind(&self) -> &'static str {
        match self {
            StoreRequest::Save { .. } => "save",
            StoreRequest::FindByName { .. } => "find_by_name",
            StoreRequest::Query { .. } => "query",
            StoreRequest::Remove { .. } => "remove",
            StoreRequest::Stats { .. } => "stats",
        }
    }
}

/// Cloneable async handle to a store owned by its own task.
///
/// Dropping the last handle closes the channel; the task drains pending
/// requests and exits. There is no other resource to release.
#[derive(Clone)]
pub struct StoreHandle {
    request_tx: mpsc::UnboundedSender<StoreRequest>,
}

impl StoreHandle {
    /// Spawn the store task and return a handle to it.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context; the store
    /// task is spawned onto the current runtime.
    pub fn spawn(config: StoreConfig) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_store_loop(config, request_rx));

        StoreHandle { request_tx }
    }

    /// Send a request to the store task
    fn send(&self, request: StoreRequest) -> anyhow::Result<()> {
        self.request_tx
            .send(request)
            .map_err(|_| anyhow::anyhow!("store task channel closed"))
    }

    /// Insert or replace a record; returns whether the name was new
    pub async fn save(&self, person: Person) -> anyhow::Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Save { person, reply })?;

        let result = rx
            .await
            .map_err(|_| anyhow::anyhow!("store task did not respond"))?;
        Ok(result?)
    }

    /// Exact lookup by name
    pub async fn find_by_name(&self, name: impl Into<String>) -> anyhow::Result<Option<Person>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::FindByName {
            name: name.into(),
            reply,
        })?;

        rx.await
            .map_err(|_| anyhow::anyhow!("store task did not respond"))
    }

    /// Full scan with an arbitrary predicate, in insertion order
    pub async fn query(&self, predicate: impl Predicate + 'static) -> anyhow::Result<Vec<Person>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Query {
            predicate: Box::new(predicate),
            reply,
        })?;

        rx.await
            .map_err(|_| anyhow::anyhow!("store task did not respond"))
    }

    /// All records with `age > threshold` (strict)
    pub async fn find_by_age_greater_than(&self, threshold: u32) -> anyhow::Result<Vec<Person>> {
        self.query(AgeAbove(threshold)).await
    }

    /// All records with `age < threshold` (strict)
    pub async fn find_by_age_less_than(&self, threshold: u32) -> anyhow::Result<Vec<Person>> {
        self.query(AgeBelow(threshold)).await
    }

    /// All records with `low < age < high` (both bounds strict)
    pub async fn find_by_age_greater_than_and_less_than(
        &self,
        low: u32,
        high: u32,
    ) -> anyhow::Result<Vec<Person>> {
        self.query(And(AgeAbove(low), AgeBelow(high))).await
    }

    /// Delete a record by name, returning it if it existed
    pub async fn remove(&self, name: impl Into<String>) -> anyhow::Result<Option<Person>> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Remove {
            name: name.into(),
            reply,
        })?;

        rx.await
            .map_err(|_| anyhow::anyhow!("store task did not respond"))
    }

    /// Get statistics from the store
    pub async fn stats(&self) -> anyhow::Result<StoreStats> {
        let (reply, rx) = oneshot::channel();
        self.send(StoreRequest::Stats { reply })?;

        rx.await
            .map_err(|_| anyhow::anyhow!("store task did not respond"))
    }
}

/// The main loop that runs in the store's task
async fn run_store_loop(config: StoreConfig, mut request_rx: mpsc::UnboundedReceiver<StoreRequest>) {
    info!("store task starting");

    let mut store = PersonStore::with_config(config);

    while let Some(request) = request_rx.recv().await {
        debug!("store task received {}", request.kind());

        match request {
            StoreRequest::Save { person, reply } => {
                let _ = reply.send(store.save(person));
            }
            StoreRequest::FindByName { name, reply } => {
                let _ = reply.send(store.find_by_name(&name));
            }
            StoreRequest::Query { predicate, reply } => {
                debug!("running {} scan", predicate.name());
                let _ = reply.send(store.query(predicate.as_ref()));
            }
            StoreRequest::Remove { name, reply } => {
                let _ = reply.send(store.remove(&name));
            }
            StoreRequest::Stats { reply } => {
                let _ = reply.send(store.stats());
            }
        }
    }

    info!("store task shutting down");
}
