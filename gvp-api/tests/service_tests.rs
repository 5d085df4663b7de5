//! # Service Scenarios
//!
//! End-to-end behaviour of `VectorService` as a transport would drive it:
//! 1. Basic upsert / query / fetch flow
//! 2. Namespace isolation and lifecycle
//! 3. Update modes and configuration limits
//! 4. Statistics and counters
//! 5. Concurrent clients

use std::sync::Arc;
use std::thread;

use gvp_api::{DeleteRequest, QueryRequest, VectorService};
use gvp_core::config::IndexConfig;
use gvp_core::{DistanceMetric, Error, UpdateMode, Vector};
use rand::Rng;

fn seeded() -> VectorService {
    let service = VectorService::default();
    service
        .upsert(
            "",
            vec![
                Vector::new("A", vec![1.0, 0.0]),
                Vector::new("B", vec![0.0, 1.0]),
                Vector::new("C", vec![0.7, 0.7]),
            ],
        )
        .unwrap();
    service
}

fn ids(response: &gvp_api::QueryResponse) -> Vec<&str> {
    response.matches.iter().map(|m| m.id.as_str()).collect()
}

// ============================================================================
// SCENARIO 1: Basic flow
// ============================================================================

#[test]
fn test_query_default_metric_is_cosine() {
    let service = seeded();
    let response = service
        .query("", QueryRequest::new(vec![1.0, 0.0], 2))
        .unwrap();

    assert_eq!(response.metric, DistanceMetric::Cosine);
    assert_eq!(ids(&response), vec!["A", "C"]);
    assert!((response.matches[0].score - 1.0).abs() < 1e-9);
    assert!((response.matches[1].score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert!(response.matches.iter().all(|m| m.values.is_none()));
}

#[test]
fn test_query_with_explicit_metric_and_values() {
    let service = seeded();
    let response = service
        .query(
            "",
            QueryRequest::new(vec![1.0, 0.0], 3)
                .metric(DistanceMetric::Euclidean)
                .include_values(true),
        )
        .unwrap();

    assert_eq!(ids(&response), vec!["A", "C", "B"]);
    assert_eq!(response.matches[0].score, 0.0);
    assert_eq!(response.matches[0].values.as_deref(), Some(&[1.0, 0.0][..]));
}

#[test]
fn test_upsert_reports_count_and_replaces() {
    let service = seeded();
    let response = service
        .upsert("", vec![Vector::new("A", vec![0.0, 1.0])])
        .unwrap();
    assert_eq!(response.upserted_count, 1);
    assert_eq!(service.fetch("", "A").unwrap(), vec![0.0, 1.0]);
    assert_eq!(service.describe_index_stats().unwrap().total_vector_count, 3);
}

#[test]
fn test_upsert_batch_is_all_or_nothing() {
    let service = seeded();
    let err = service
        .upsert(
            "",
            vec![
                Vector::new("D", vec![0.5, 0.5]),
                Vector::new("E", vec![0.5, 0.5, 0.5]),
            ],
        )
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));
    assert!(matches!(service.fetch("", "D"), Err(Error::NotFound { .. })));
}

#[test]
fn test_fetch_many_omits_missing() {
    let service = seeded();
    let response = service.fetch_many("", &["A", "missing", "C"]).unwrap();

    assert_eq!(response.vectors.len(), 2);
    assert_eq!(response.vectors["A"].values, vec![1.0, 0.0]);
    assert!(!response.vectors.contains_key("missing"));

    let unknown = service.fetch_many("nowhere", &["A"]).unwrap();
    assert!(unknown.vectors.is_empty());
}

#[test]
fn test_delete_ids_is_idempotent() {
    let service = seeded();
    service.delete("", DeleteRequest::ids(["A", "zzz"])).unwrap();
    service.delete("", DeleteRequest::ids(["A"])).unwrap();

    assert!(matches!(service.fetch("", "A"), Err(Error::NotFound { .. })));
    let response = service
        .query("", QueryRequest::new(vec![1.0, 0.0], 10))
        .unwrap();
    assert_eq!(ids(&response), vec!["C", "B"]);
}

// ============================================================================
// SCENARIO 2: Namespaces
// ============================================================================

#[test]
fn test_namespaces_are_isolated() {
    let service = seeded();
    service
        .upsert("tenant-a", vec![Vector::new("A", vec![1.0, 2.0, 3.0])])
        .unwrap();

    assert_eq!(service.fetch("", "A").unwrap(), vec![1.0, 0.0]);
    assert_eq!(service.fetch("tenant-a", "A").unwrap(), vec![1.0, 2.0, 3.0]);

    let err = service
        .query("tenant-a", QueryRequest::new(vec![1.0, 0.0], 1))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
}

#[test]
fn test_unknown_namespace() {
    let service = VectorService::default();

    assert!(matches!(
        service.query("ghost", QueryRequest::new(vec![1.0], 1)),
        Err(Error::EmptyStore)
    ));
    assert!(matches!(
        service.query("ghost", QueryRequest::new(vec![1.0], 0)),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        service.fetch("ghost", "x"),
        Err(Error::NotFound { .. })
    ));
    service.delete("ghost", DeleteRequest::all()).unwrap();
    assert!(service.describe_index_stats().unwrap().namespaces.is_empty());
}

#[test]
fn test_delete_all_resets_dimension() {
    let service = seeded();
    service.delete("", DeleteRequest::all()).unwrap();

    assert!(matches!(
        service.query("", QueryRequest::new(vec![1.0, 0.0], 1)),
        Err(Error::EmptyStore)
    ));
    assert!(service.describe_index_stats().unwrap().namespaces.is_empty());

    // A cleared namespace adopts whatever dimension arrives next
    service
        .upsert("", vec![Vector::new("wide", vec![1.0, 1.0, 1.0, 1.0])])
        .unwrap();
    let stats = service.describe_index_stats().unwrap();
    assert_eq!(stats.dimension, Some(4));
}

#[test]
fn test_delete_ids_keeps_dimension() {
    let service = seeded();
    service
        .delete("", DeleteRequest::ids(["A", "B", "C"]))
        .unwrap();

    let err = service
        .upsert("", vec![Vector::new("x", vec![1.0, 2.0, 3.0])])
        .unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, .. }));
    assert!(matches!(
        service.query("", QueryRequest::new(vec![1.0, 0.0, 0.0], 1)),
        Err(Error::DimensionMismatch { .. })
    ));
}

// ============================================================================
// SCENARIO 3: Update modes and limits
// ============================================================================

#[test]
fn test_update_replace_or_create() {
    let service = seeded();
    service.update("", "A", &[0.5, 0.5]).unwrap();
    service.update("", "new", &[0.1, 0.9]).unwrap();

    assert_eq!(service.fetch("", "A").unwrap(), vec![0.5, 0.5]);
    assert_eq!(service.fetch("", "new").unwrap(), vec![0.1, 0.9]);
    assert!(matches!(
        service.update("", "A", &[1.0]),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_update_require_existing() {
    let service = VectorService::new(IndexConfig {
        update_mode: UpdateMode::RequireExisting,
        ..IndexConfig::default()
    });
    service
        .upsert("", vec![Vector::new("A", vec![1.0, 0.0])])
        .unwrap();

    service.update("", "A", &[0.0, 1.0]).unwrap();
    assert!(matches!(
        service.update("", "missing", &[0.0, 1.0]),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        service.update("other", "missing", &[0.0, 1.0]),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        service.update("", "A", &[]),
        Err(Error::EmptyVector)
    ));

    let stats = service.describe_index_stats().unwrap();
    assert_eq!(stats.total_vector_count, 1);
    assert!(!stats.namespaces.contains_key("other"));
}

#[test]
fn test_top_k_limit_and_default_metric_from_config() {
    let service = VectorService::new(IndexConfig {
        default_metric: DistanceMetric::Euclidean,
        max_top_k: 2,
        ..IndexConfig::default()
    });
    service
        .upsert(
            "",
            vec![
                Vector::new("A", vec![1.0, 0.0]),
                Vector::new("B", vec![3.0, 0.0]),
            ],
        )
        .unwrap();

    let err = service
        .query("", QueryRequest::new(vec![0.0, 0.0], 3))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.is_client_error());

    let response = service
        .query("", QueryRequest::new(vec![0.0, 0.0], 2))
        .unwrap();
    assert_eq!(response.metric, DistanceMetric::Euclidean);
    assert_eq!(ids(&response), vec!["A", "B"]);
    assert_eq!(response.matches[1].score, 3.0);
}

#[test]
fn test_degenerate_query_rejected() {
    let service = seeded();
    let err = service
        .query("", QueryRequest::new(vec![0.0, 0.0], 1))
        .unwrap_err();
    assert!(matches!(err, Error::DegenerateVector));
    assert_eq!(err.error_code(), "DEGENERATE_VECTOR");
}

// ============================================================================
// SCENARIO 4: Statistics and counters
// ============================================================================

#[test]
fn test_describe_index_stats() {
    let service = seeded();
    service
        .upsert("wide", vec![Vector::new("w", vec![1.0, 2.0, 3.0])])
        .unwrap();

    let stats = service.describe_index_stats().unwrap();
    assert_eq!(stats.total_vector_count, 4);
    assert_eq!(stats.dimension, None, "namespaces disagree on dimension");
    assert_eq!(stats.namespaces[""].vector_count, 3);
    assert_eq!(stats.namespaces[""].dimension, Some(2));
    assert_eq!(stats.namespaces["wide"].dimension, Some(3));

    service.delete("wide", DeleteRequest::all()).unwrap();
    let stats = service.describe_index_stats().unwrap();
    assert_eq!(stats.dimension, Some(2));
    assert_eq!(stats.namespaces.len(), 1);
}

#[test]
fn test_metrics_track_operations() {
    let service = seeded();
    service
        .query("", QueryRequest::new(vec![1.0, 0.0], 1))
        .unwrap();
    let _ = service.query("", QueryRequest::new(vec![1.0], 1));
    service.fetch("", "A").unwrap();
    service.update("", "A", &[1.0, 1.0]).unwrap();
    service.delete("", DeleteRequest::ids(["B"])).unwrap();

    let snapshot = service.metrics();
    assert_eq!(snapshot.vectors_upserted, 3);
    assert_eq!(snapshot.vectors_updated, 1);
    assert_eq!(snapshot.delete_calls, 1);
    assert_eq!(snapshot.fetches, 1);
    assert_eq!(snapshot.queries_executed, 1);
    assert_eq!(snapshot.query_errors, 1);
}

#[test]
fn test_failed_calls_leave_counters_untouched() {
    let service = seeded();
    let before = service.metrics();

    let _ = service.upsert("", vec![Vector::new("x", vec![1.0])]);
    let _ = service.update("", "A", &[]);
    let _ = service.fetch("", "missing");
    let _ = service.fetch("ghost", "A");

    let after = service.metrics();
    assert_eq!(after, before);

    let _ = service.query("ghost", QueryRequest::new(vec![1.0, 0.0], 1));
    let after = service.metrics();
    assert_eq!(after.queries_executed, before.queries_executed);
    assert_eq!(after.query_errors, before.query_errors + 1);
}

#[test]
fn test_failed_writes_do_not_create_namespaces() {
    let service = VectorService::new(IndexConfig {
        update_mode: UpdateMode::RequireExisting,
        ..IndexConfig::default()
    });

    assert!(matches!(
        service.upsert("empty-member", vec![Vector::new("a", vec![])]),
        Err(Error::EmptyVector)
    ));
    assert!(matches!(
        service.upsert(
            "ragged",
            vec![
                Vector::new("a", vec![1.0, 2.0]),
                Vector::new("b", vec![1.0]),
            ],
        ),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(matches!(
        service.update("strict", "missing", &[1.0, 0.0]),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        service.update("strict", "missing", &[]),
        Err(Error::EmptyVector)
    ));
    assert_eq!(service.upsert("nothing", Vec::new()).unwrap().upserted_count, 0);
    assert!(service.namespaces().is_empty());

    service
        .upsert("real", vec![Vector::new("a", vec![1.0, 0.0])])
        .unwrap();
    assert_eq!(service.namespaces(), vec!["real".to_string()]);

    let relaxed = VectorService::default();
    assert!(matches!(
        relaxed.update("fresh", "a", &[]),
        Err(Error::EmptyVector)
    ));
    assert!(relaxed.namespaces().is_empty());
    relaxed.update("fresh", "a", &[1.0]).unwrap();
    assert_eq!(relaxed.namespaces(), vec!["fresh".to_string()]);
}

#[test]
fn test_request_types_deserialize_with_defaults() {
    let request: QueryRequest = serde_json::from_str(r#"{"vector":[1.0,0.0]}"#).unwrap();
    assert_eq!(request.top_k, 10);
    assert_eq!(request.metric, None);
    assert!(!request.include_values);

    let request: QueryRequest =
        serde_json::from_str(r#"{"vector":[1.0],"top_k":3,"metric":"dot-product"}"#).unwrap();
    assert_eq!(request.metric, Some(DistanceMetric::DotProduct));

    let delete: DeleteRequest = serde_json::from_str(r#"{"delete_all":true}"#).unwrap();
    assert_eq!(delete, DeleteRequest::all());
}

// ============================================================================
// SCENARIO 5: Concurrent clients
// ============================================================================

#[test]
fn test_concurrent_clients_across_namespaces() {
    const DIM: usize = 16;
    let service = Arc::new(VectorService::default());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let namespace = format!("ns{}", t % 2);
                for i in 0..100 {
                    let values: Vec<f32> = (0..DIM).map(|_| rng.gen_range(0.1..1.0)).collect();
                    let id = format!("t{}-{}", t, i);
                    service
                        .upsert(&namespace, vec![Vector::new(id.as_str(), values.clone())])
                        .unwrap();
                    let response = service
                        .query(&namespace, QueryRequest::new(values, 3))
                        .unwrap();
                    assert!(!response.matches.is_empty());
                    if i % 10 == 0 {
                        service.delete(&namespace, DeleteRequest::ids([id])).unwrap();
                    }
                    let _ = service.describe_index_stats().unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let stats = service.describe_index_stats().unwrap();
    assert_eq!(stats.total_vector_count, 4 * 90);
    assert_eq!(stats.dimension, Some(DIM));
    assert_eq!(stats.namespaces.len(), 2);
}
