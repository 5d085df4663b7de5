//! # Vector Service
//!
//! The six-operation facade an RPC layer (or the CLI) calls: Upsert,
//! Delete, Fetch, Query, Update and DescribeIndexStats. Each namespace owns
//! an independent [`VectorStore`]; the empty name is the default namespace.
//!
//! ## Locking
//!
//! ```text
//!   namespaces: RwLock<BTreeMap<name, Arc<VectorStore>>>
//!        │  lookup / create, then released
//!        ▼
//!   VectorStore: RwLock<state>   (one store lock held per operation)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use gvp_core::config::IndexConfig;
use gvp_core::error::{Error, Result};
use gvp_core::metrics::{Metrics, MetricsSnapshot, Timer};
use gvp_core::{DistanceMetric, IndexStats, QueryMatch, UpdateMode, Vector, VectorId};
use gvp_index::{metric, QueryEngine, StatsCollector, VectorIndex, VectorStore};

// ========== API Types ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertResponse {
    pub upserted_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub ids: Vec<VectorId>,
    /// Drop every vector in the namespace, including its adopted dimension
    #[serde(default)]
    pub delete_all: bool,
}

impl DeleteRequest {
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<VectorId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            delete_all: false,
        }
    }

    pub fn all() -> Self {
        Self {
            ids: Vec::new(),
            delete_all: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Found vectors keyed by id; missing ids are omitted
    pub vectors: BTreeMap<VectorId, Vector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub vector: Vec<f32>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Falls back to the configured default metric
    #[serde(default)]
    pub metric: Option<DistanceMetric>,
    #[serde(default)]
    pub include_values: bool,
}

fn default_top_k() -> usize {
    10
}

impl QueryRequest {
    pub fn new(vector: Vec<f32>, top_k: usize) -> Self {
        Self {
            vector,
            top_k,
            metric: None,
            include_values: false,
        }
    }

    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn include_values(mut self, include: bool) -> Self {
        self.include_values = include;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub namespace: String,
    pub metric: DistanceMetric,
    pub matches: Vec<QueryMatch>,
}

// ========== Service ==========

pub struct VectorService {
    config: IndexConfig,
    namespaces: RwLock<BTreeMap<String, Arc<VectorStore>>>,
    engine: QueryEngine,
    stats: StatsCollector,
    metrics: Metrics,
}

impl Default for VectorService {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl VectorService {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            namespaces: RwLock::new(BTreeMap::new()),
            engine: QueryEngine::new(),
            stats: StatsCollector::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Operation counters since construction
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Every namespace with a store, including ones emptied by `delete_all`
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.read().keys().cloned().collect()
    }

    fn namespace(&self, name: &str) -> Option<Arc<VectorStore>> {
        self.namespaces.read().get(name).cloned()
    }

    fn namespace_or_create(&self, name: &str) -> Arc<VectorStore> {
        if let Some(store) = self.namespace(name) {
            return store;
        }
        let mut namespaces = self.namespaces.write();
        namespaces
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(VectorStore::with_update_mode(self.config.update_mode)))
            .clone()
    }

    /// Insert or replace a batch of vectors. The batch is applied atomically.
    /// A namespace is only created by a batch it can accept.
    pub fn upsert(&self, namespace: &str, vectors: Vec<Vector>) -> Result<UpsertResponse> {
        let count = vectors.len();
        debug!(namespace, count, "upsert");

        let store = match self.namespace(namespace) {
            Some(store) => store,
            None if vectors.is_empty() => return Ok(UpsertResponse { upserted_count: 0 }),
            None => {
                VectorStore::check_batch(&vectors)?;
                self.namespace_or_create(namespace)
            }
        };
        let upserted_count = store.upsert_batch(vectors)?;
        self.metrics.record_upsert(upserted_count as u64);
        Ok(UpsertResponse { upserted_count })
    }

    /// Delete ids, or the whole namespace with `delete_all`. Deleting absent
    /// ids or an unknown namespace succeeds.
    pub fn delete(&self, namespace: &str, request: DeleteRequest) -> Result<()> {
        self.metrics.record_delete();
        let Some(store) = self.namespace(namespace) else {
            debug!(namespace, "delete on unknown namespace");
            return Ok(());
        };

        if request.delete_all {
            debug!(namespace, "delete all");
            store.clear();
        } else {
            let removed = store.delete_many(&request.ids);
            debug!(namespace, requested = request.ids.len(), removed, "delete");
        }
        Ok(())
    }

    /// Stored values for one id
    pub fn fetch(&self, namespace: &str, id: &str) -> Result<Vec<f32>> {
        let values = match self.namespace(namespace) {
            Some(store) => store.fetch(id)?,
            None => return Err(Error::NotFound { id: id.to_string() }),
        };
        self.metrics.record_fetch();
        Ok(values)
    }

    /// Every listed id that is present, read from one snapshot
    pub fn fetch_many<S: AsRef<str>>(&self, namespace: &str, ids: &[S]) -> Result<FetchResponse> {
        self.metrics.record_fetch();
        let mut response = FetchResponse::default();
        let Some(store) = self.namespace(namespace) else {
            return Ok(response);
        };

        let snapshot = store.snapshot();
        for id in ids {
            let id: &str = id.as_ref();
            if let Some(values) = snapshot.get(id) {
                response
                    .vectors
                    .insert(id.to_string(), Vector::new(id, values.to_vec()));
            }
        }
        Ok(response)
    }

    /// Rank the namespace's vectors against `request.vector`
    pub fn query(&self, namespace: &str, request: QueryRequest) -> Result<QueryResponse> {
        let timer = Timer::new("query");

        let result = self.run_query(namespace, &request);
        match result {
            Ok(_) => self.metrics.record_query(),
            Err(_) => self.metrics.record_query_error(),
        }
        timer.stop();
        result
    }

    fn run_query(&self, namespace: &str, request: &QueryRequest) -> Result<QueryResponse> {
        if request.top_k > self.config.max_top_k {
            return Err(Error::invalid_argument(format!(
                "top_k {} exceeds the maximum of {}",
                request.top_k, self.config.max_top_k
            )));
        }
        let metric_name = request.metric.unwrap_or(self.config.default_metric);
        let metric = metric::resolve(metric_name);
        debug!(
            namespace,
            top_k = request.top_k,
            metric = metric.name(),
            include_values = request.include_values,
            "query"
        );

        let store = match self.namespace(namespace) {
            Some(store) => store,
            None if request.top_k == 0 => {
                return Err(Error::invalid_argument("top_k must be positive"))
            }
            None => return Err(Error::EmptyStore),
        };

        let matches = if request.include_values {
            self.engine
                .query_with_values(&store, &request.vector, request.top_k, metric)?
        } else {
            self.engine
                .query(&store, &request.vector, request.top_k, metric)?
        };

        Ok(QueryResponse {
            namespace: namespace.to_string(),
            metric: metric_name,
            matches,
        })
    }

    /// Replace the vector stored under `id`. Whether a missing id is created
    /// depends on the configured update mode; a failed update never creates
    /// the namespace.
    pub fn update(&self, namespace: &str, id: &str, values: &[f32]) -> Result<()> {
        debug!(namespace, id, "update");
        let store = match self.namespace(namespace) {
            Some(store) => store,
            None if values.is_empty() => return Err(Error::EmptyVector),
            None if self.config.update_mode == UpdateMode::RequireExisting => {
                return Err(Error::NotFound { id: id.to_string() })
            }
            None => self.namespace_or_create(namespace),
        };
        store.update(id, values)?;
        self.metrics.record_update();
        Ok(())
    }

    /// Totals plus a per-namespace breakdown. Namespaces that hold nothing
    /// and have no dimension (never written, or cleared) are omitted.
    pub fn describe_index_stats(&self) -> Result<IndexStats> {
        let stores: Vec<(String, Arc<VectorStore>)> = self
            .namespaces
            .read()
            .iter()
            .map(|(name, store)| (name.clone(), Arc::clone(store)))
            .collect();

        let live: Vec<(&str, &dyn VectorIndex)> = stores
            .iter()
            .filter(|(_, store)| store.dimension().is_some() || !store.is_empty())
            .map(|(name, store)| (name.as_str(), store.as_ref() as &dyn VectorIndex))
            .collect();

        self.stats.describe_namespaces(live)
    }
}
