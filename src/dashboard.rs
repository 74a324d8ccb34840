//! State behind the dashboard view.
//!
//! Network calls and state changes are kept apart: the view runs the request
//! on the background runtime and applies the result here on the UI thread.

use crate::api::ApiClient;
use crate::api::models::{Conversation, Metrics, Overview};
use crate::error::ApiError;
use crate::status::ServiceStatus;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub status: ServiceStatus,
    pub overview: Overview,
}

impl DashboardState {
    /// Service status first, then the messages overview. The caller has already
    /// passed the session guard.
    pub async fn load(api: &ApiClient, now: &str) -> Result<Self, ApiError> {
        let remote = api.service_status().await?;
        let status = ServiceStatus::from_remote(remote, now);
        let overview = api.overview().await?;
        Ok(Self { status, overview })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.overview.metrics
    }

    /// Conversations still waiting for a human look.
    pub fn pending(&self) -> impl Iterator<Item = &Conversation> {
        self.overview.conversations.iter().filter(|c| !c.reviewed)
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.overview.conversations.iter().find(|c| c.id == id)
    }

    /// Call only after the backend accepted the new state.
    pub fn apply_status_change(&mut self, active: bool, now: &str) {
        self.status.apply_toggle(active, now);
    }

    /// Store the backend's copy. Reviewed stays set even if the reply says otherwise.
    pub fn apply_reviewed(&mut self, mut updated: Conversation) {
        updated.mark_reviewed();
        match self.overview.conversations.iter_mut().find(|c| c.id == updated.id) {
            Some(existing) => {
                if !existing.reviewed {
                    let pending = &mut self.overview.metrics.pending_review;
                    *pending = pending.saturating_sub(1);
                }
                *existing = updated;
            }
            None => self.overview.conversations.push(updated),
        }
    }
}
