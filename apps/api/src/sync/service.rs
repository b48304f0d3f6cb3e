//! Cache-aside reads and force-sync against the upstream job service.
//!
//! Reads consult the local store first and populate it only on a miss; there
//! is no TTL and no freshness check. Force-sync refreshes unconditionally.
//! No single-flight guard exists: concurrent misses for the same key may
//! both call upstream, which the primary-key upsert makes safe.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::{InventoryItemRow, JobRow};
use crate::sync::store::JobStore;
use crate::sync::transform::{has_inventory, inventory_from_upstream, job_from_upstream};
use crate::sync::upstream::UpstreamJobs;

/// Outcome of a force-sync. Each step reports independently; `errors`
/// carries the reason for any step that failed.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub job: bool,
    pub inventory: bool,
    pub inventory_count: usize,
    pub errors: Vec<String>,
}

impl SyncReport {
    /// The request as a whole fails only when both steps failed.
    pub fn failed(&self) -> bool {
        !self.job && !self.inventory
    }
}

/// Cache-aside job fetch. On a hit the upstream is never consulted. On a
/// miss the upstream payload is transformed, upserted, and the stored row
/// returned. Upstream 404 surfaces as not-found; any other upstream failure
/// stays distinguishable from absence.
pub async fn get_job(
    store: &dyn JobStore,
    upstream: &dyn UpstreamJobs,
    job_id: i64,
) -> Result<JobRow, AppError> {
    if let Some(job) = store.find_job(job_id).await? {
        return Ok(job);
    }

    info!("Job {job_id} not found in store, fetching from upstream");
    let raw = upstream.fetch_job(job_id).await?;
    let job = job_from_upstream(job_id, &raw);
    let stored = store.upsert_job(&job).await?;
    info!("Job {job_id} saved to store");
    Ok(stored)
}

/// Cache-aside inventory fetch. The miss condition is "no rows for the
/// job". Upstream absence of inventory data is a successful empty result,
/// and an upstream failure on this best-effort path degrades to an empty
/// result as well.
pub async fn get_inventory(
    store: &dyn JobStore,
    upstream: &dyn UpstreamJobs,
    job_id: i64,
) -> Result<Vec<InventoryItemRow>, AppError> {
    let existing = store.list_inventory(job_id).await?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    info!("Inventory for job {job_id} not found in store, fetching from upstream");
    let raw = match upstream.fetch_inventory(job_id).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!("Inventory fetch for job {job_id} failed, returning empty result: {err}");
            return Ok(Vec::new());
        }
    };

    let items = inventory_from_upstream(job_id, &raw);
    if items.is_empty() {
        info!("No inventory found upstream for job {job_id}");
        return Ok(Vec::new());
    }

    store.upsert_inventory(&items).await?;
    info!("Saved {} inventory items for job {job_id}", items.len());
    store.list_inventory(job_id).await
}

/// Unconditionally refreshes the job row and the job's inventory set from
/// upstream. The two steps are independently guarded: either may fail
/// without preventing the other, and each failure is recorded in the
/// report's `errors`.
pub async fn force_sync(
    store: &dyn JobStore,
    upstream: &dyn UpstreamJobs,
    job_id: i64,
) -> SyncReport {
    let mut report = SyncReport::default();

    info!("Syncing job {job_id} from upstream");
    match upstream.fetch_job(job_id).await {
        Ok(raw) => {
            let job = job_from_upstream(job_id, &raw);
            match store.upsert_job(&job).await {
                Ok(_) => {
                    report.job = true;
                    info!("Job {job_id} synced");
                }
                Err(err) => {
                    warn!("Failed to store job {job_id}: {err}");
                    report.errors.push(format!("Failed to sync job data: {err}"));
                }
            }
        }
        Err(err) => {
            warn!("Failed to fetch job {job_id} from upstream: {err}");
            report.errors.push(format!("Failed to sync job data: {err}"));
        }
    }

    info!("Syncing inventory for job {job_id} from upstream");
    match upstream.fetch_inventory(job_id).await {
        Ok(raw) if has_inventory(&raw) => {
            let items = inventory_from_upstream(job_id, &raw);
            match store.replace_inventory(job_id, &items).await {
                Ok(count) => {
                    report.inventory = true;
                    report.inventory_count = count;
                    info!("Synced {count} inventory items for job {job_id}");
                }
                Err(err) => {
                    warn!("Failed to store inventory for job {job_id}: {err}");
                    report
                        .errors
                        .push(format!("Failed to sync inventory data: {err}"));
                }
            }
        }
        Ok(_) => info!("No inventory data upstream for job {job_id}"),
        Err(err) => {
            warn!("Failed to fetch inventory for job {job_id} from upstream: {err}");
            report
                .errors
                .push(format!("Failed to sync inventory data: {err}"));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moveware::MovewareError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        jobs: Mutex<HashMap<i64, JobRow>>,
        inventory: Mutex<HashMap<i64, Vec<InventoryItemRow>>>,
    }

    #[async_trait]
    impl JobStore for MemoryStore {
        async fn find_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError> {
            Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
        }

        async fn upsert_job(&self, job: &JobRow) -> Result<JobRow, AppError> {
            self.jobs.lock().unwrap().insert(job.id, job.clone());
            Ok(job.clone())
        }

        async fn list_inventory(&self, job_id: i64) -> Result<Vec<InventoryItemRow>, AppError> {
            Ok(self
                .inventory
                .lock()
                .unwrap()
                .get(&job_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn upsert_inventory(&self, items: &[InventoryItemRow]) -> Result<(), AppError> {
            let mut inventory = self.inventory.lock().unwrap();
            for item in items {
                let existing = inventory.entry(item.job_id).or_default();
                match existing.iter_mut().find(|i| i.id == item.id) {
                    Some(slot) => *slot = item.clone(),
                    None => existing.push(item.clone()),
                }
            }
            Ok(())
        }

        async fn replace_inventory(
            &self,
            job_id: i64,
            items: &[InventoryItemRow],
        ) -> Result<usize, AppError> {
            self.inventory
                .lock()
                .unwrap()
                .insert(job_id, items.to_vec());
            Ok(items.len())
        }
    }

    /// Scripted upstream: each endpoint either returns a payload or an
    /// error, and counts its calls.
    struct StubUpstream {
        job: Result<Value, u16>,
        inventory: Result<Value, u16>,
        job_calls: AtomicUsize,
        inventory_calls: AtomicUsize,
    }

    impl StubUpstream {
        fn new(job: Result<Value, u16>, inventory: Result<Value, u16>) -> Self {
            Self {
                job,
                inventory,
                job_calls: AtomicUsize::new(0),
                inventory_calls: AtomicUsize::new(0),
            }
        }

        fn error(status: u16) -> MovewareError {
            MovewareError::Api {
                status,
                message: format!("upstream returned {status}"),
                code: None,
                details: None,
            }
        }
    }

    #[async_trait]
    impl UpstreamJobs for StubUpstream {
        async fn fetch_job(&self, _job_id: i64) -> Result<Value, MovewareError> {
            self.job_calls.fetch_add(1, Ordering::SeqCst);
            self.job.clone().map_err(Self::error)
        }

        async fn fetch_inventory(&self, _job_id: i64) -> Result<Value, MovewareError> {
            self.inventory_calls.fetch_add(1, Ordering::SeqCst);
            self.inventory.clone().map_err(Self::error)
        }

        async fn fetch_questions(&self, _job_id: i64) -> Result<Value, MovewareError> {
            Ok(json!([]))
        }
    }

    fn job_payload() -> Value {
        json!({
            "id": 111505,
            "firstName": "Leigh",
            "lastName": "Morrow",
            "jobValue": 2675.0,
            "brandCode": "MWB"
        })
    }

    fn inventory_payload(count: usize) -> Value {
        let items: Vec<Value> = (1..=count as i64)
            .map(|id| json!({ "id": id, "description": format!("Item {id}"), "quantity": 1 }))
            .collect();
        json!({ "inventoryUsage": items })
    }

    #[tokio::test]
    async fn test_get_job_cache_hit_never_calls_upstream() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Ok(inventory_payload(0)));

        // First read populates the cache, second must be served locally.
        get_job(&store, &upstream, 111505).await.unwrap();
        let job = get_job(&store, &upstream, 111505).await.unwrap();

        assert_eq!(job.id, 111505);
        assert_eq!(upstream.job_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_job_miss_fetches_and_stores() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Ok(json!({})));

        let job = get_job(&store, &upstream, 111505).await.unwrap();

        assert_eq!(job.first_name.as_deref(), Some("Leigh"));
        assert!(store.find_job(111505).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_job_upstream_404_is_not_found() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Err(404), Ok(json!({})));

        let err = get_job(&store, &upstream, 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_job_upstream_outage_is_not_conflated_with_absence() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Err(500), Ok(json!({})));

        let err = get_job(&store, &upstream, 999).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_get_inventory_miss_fetches_and_stores() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Ok(inventory_payload(20)));

        let items = get_inventory(&store, &upstream, 111505).await.unwrap();

        assert_eq!(items.len(), 20);
        assert_eq!(upstream.inventory_calls.load(Ordering::SeqCst), 1);

        // Second read is a cache hit.
        let again = get_inventory(&store, &upstream, 111505).await.unwrap();
        assert_eq!(again.len(), 20);
        assert_eq!(upstream.inventory_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_inventory_upstream_absence_is_empty_success() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Ok(json!({})));

        let items = get_inventory(&store, &upstream, 111505).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_get_inventory_upstream_failure_degrades_to_empty() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Err(503));

        let items = get_inventory(&store, &upstream, 111505).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_force_sync_is_idempotent_for_unchanged_payload() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Ok(inventory_payload(3)));

        let first = force_sync(&store, &upstream, 111505).await;
        let second = force_sync(&store, &upstream, 111505).await;

        assert!(first.job && second.job);
        assert_eq!(store.jobs.lock().unwrap().len(), 1);
        let job = store.find_job(111505).await.unwrap().unwrap();
        assert_eq!(job, job_from_upstream(111505, &job_payload()));
        assert_eq!(store.list_inventory(111505).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_force_sync_replaces_shrunken_inventory() {
        let store = MemoryStore::default();

        let upstream = StubUpstream::new(Ok(job_payload()), Ok(inventory_payload(5)));
        force_sync(&store, &upstream, 111505).await;
        assert_eq!(store.list_inventory(111505).await.unwrap().len(), 5);

        let upstream = StubUpstream::new(Ok(job_payload()), Ok(inventory_payload(2)));
        let report = force_sync(&store, &upstream, 111505).await;

        assert_eq!(report.inventory_count, 2);
        let remaining = store.list_inventory(111505).await.unwrap();
        assert_eq!(remaining.len(), 2);
    }

    #[tokio::test]
    async fn test_force_sync_partial_job_failure_still_syncs_inventory() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Err(500), Ok(inventory_payload(4)));

        let report = force_sync(&store, &upstream, 111505).await;

        assert!(!report.job);
        assert!(report.inventory);
        assert_eq!(report.inventory_count, 4);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("job"));
        assert!(!report.failed());
    }

    #[tokio::test]
    async fn test_force_sync_partial_inventory_failure_still_syncs_job() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Ok(job_payload()), Err(500));

        let report = force_sync(&store, &upstream, 111505).await;

        assert!(report.job);
        assert!(!report.inventory);
        assert_eq!(report.errors.len(), 1);
        assert!(!report.failed());
    }

    #[tokio::test]
    async fn test_force_sync_both_steps_failing_fails_overall() {
        let store = MemoryStore::default();
        let upstream = StubUpstream::new(Err(500), Err(503));

        let report = force_sync(&store, &upstream, 111505).await;

        assert!(report.failed());
        assert_eq!(report.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_force_sync_missing_upstream_inventory_leaves_store_untouched() {
        let store = MemoryStore::default();
        let seeded = inventory_from_upstream(111505, &inventory_payload(2));
        store.replace_inventory(111505, &seeded).await.unwrap();

        let upstream = StubUpstream::new(Ok(job_payload()), Ok(json!({})));
        let report = force_sync(&store, &upstream, 111505).await;

        assert!(report.job);
        assert!(!report.inventory);
        assert!(report.errors.is_empty());
        assert_eq!(store.list_inventory(111505).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_force_sync_overwrites_cached_job() {
        let store = MemoryStore::default();
        let stale = job_from_upstream(111505, &json!({ "id": 111505, "firstName": "Old" }));
        store.upsert_job(&stale).await.unwrap();

        let upstream = StubUpstream::new(Ok(job_payload()), Ok(json!({})));
        force_sync(&store, &upstream, 111505).await;

        let job = store.find_job(111505).await.unwrap().unwrap();
        assert_eq!(job.first_name.as_deref(), Some("Leigh"));
        assert_eq!(upstream.job_calls.load(Ordering::SeqCst), 1);
    }
}
