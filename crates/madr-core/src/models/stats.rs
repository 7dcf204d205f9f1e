use serde::{Deserialize, Serialize};

/// Record counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_events: u64,
    pub total_banners: u64,
    pub total_gallery: u64,
    pub total_donations: u64,
}
