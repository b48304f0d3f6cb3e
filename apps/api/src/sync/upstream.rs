use async_trait::async_trait;
use serde_json::Value;

use crate::moveware::{CompanyId, Moveware, MovewareError};

/// The upstream job-data source, as the synchronization service sees it.
///
/// `CompanyUpstream` is the production implementation; tests substitute an
/// in-memory stub so the cache-aside and force-sync logic can be exercised
/// without a network.
#[async_trait]
pub trait UpstreamJobs: Send + Sync {
    async fn fetch_job(&self, job_id: i64) -> Result<Value, MovewareError>;
    async fn fetch_inventory(&self, job_id: i64) -> Result<Value, MovewareError>;
    async fn fetch_questions(&self, job_id: i64) -> Result<Value, MovewareError>;
}

/// Upstream access bound to one company. The authenticated client is built
/// per call, so configuration is validated at the first actual upstream
/// request; a cache hit never needs (or checks) the Moveware credentials.
pub struct CompanyUpstream {
    moveware: Moveware,
    company: CompanyId,
}

impl CompanyUpstream {
    pub fn new(moveware: Moveware, company: CompanyId) -> Self {
        Self { moveware, company }
    }

    async fn get_path(&self, path: &str) -> Result<Value, MovewareError> {
        let client = self.moveware.client(self.company.clone())?;
        client.get(path, None).await
    }
}

#[async_trait]
impl UpstreamJobs for CompanyUpstream {
    async fn fetch_job(&self, job_id: i64) -> Result<Value, MovewareError> {
        self.get_path(&format!("/jobs/{job_id}")).await
    }

    async fn fetch_inventory(&self, job_id: i64) -> Result<Value, MovewareError> {
        self.get_path(&format!("/jobs/{job_id}/inventory")).await
    }

    async fn fetch_questions(&self, job_id: i64) -> Result<Value, MovewareError> {
        self.get_path(&format!("/jobs/{job_id}/questions")).await
    }
}
