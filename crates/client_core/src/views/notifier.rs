use std::sync::Arc;

use async_trait::async_trait;
use shared::protocol::{NotificationStats, NotifierHealth, SentNotification};

use crate::{api::SportsApi, controller::ViewSource, error::ApiResult};

pub const RECENT_SENT_LIMIT: u32 = 20;

/// Operational view over the backend's match notifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifierOverview {
    pub recent: Vec<SentNotification>,
    pub stats: NotificationStats,
    pub health: NotifierHealth,
}

pub struct NotifierSource {
    api: Arc<dyn SportsApi>,
}

impl NotifierSource {
    pub fn new(api: Arc<dyn SportsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ViewSource for NotifierSource {
    type Data = NotifierOverview;

    const NAME: &'static str = "notifier";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch notification data";

    async fn fetch(&self) -> ApiResult<NotifierOverview> {
        let (recent, stats, health) = tokio::try_join!(
            self.api.recent_sent_notifications(RECENT_SENT_LIMIT),
            self.api.notifier_stats(),
            self.api.notifier_health(),
        )?;
        Ok(NotifierOverview {
            recent,
            stats,
            health,
        })
    }
}
