use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{NotificationId, UserKey},
    protocol::TennisNotification,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    api::SportsApi,
    controller::{EntryCollection, MountedView, ViewSource},
    error::ApiResult,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFeed {
    pub notifications: Vec<TennisNotification>,
    pub unread_count: u32,
}

impl EntryCollection for NotificationFeed {
    type Entry = TennisNotification;

    fn entries_mut(&mut self) -> &mut [TennisNotification] {
        &mut self.notifications
    }

    fn entries_changed(&mut self, changed: usize) {
        let changed = u32::try_from(changed).unwrap_or(u32::MAX);
        self.unread_count = self.unread_count.saturating_sub(changed);
    }
}

/// Whether a user action was accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Rejected,
}

/// Per-user tennis notification feed.
pub struct NotificationFeedSource {
    api: Arc<dyn SportsApi>,
    user: UserKey,
}

impl NotificationFeedSource {
    pub fn new(api: Arc<dyn SportsApi>, user: UserKey) -> Self {
        Self { api, user }
    }

    pub fn user(&self) -> &UserKey {
        &self.user
    }

    pub async fn mount(
        api: Arc<dyn SportsApi>,
        user: UserKey,
        poll: Duration,
    ) -> MountedView<Self> {
        MountedView::mount(Self::new(api, user), Some(poll)).await
    }
}

#[async_trait]
impl ViewSource for NotificationFeedSource {
    type Data = NotificationFeed;

    const NAME: &'static str = "tennis_notifications";
    const FAILURE_MESSAGE: &'static str = "Failed to load notifications";

    async fn fetch(&self) -> ApiResult<NotificationFeed> {
        let notifications = self.api.notifications(&self.user).await?;
        let count = self.api.unread_count(&self.user).await?;
        Ok(NotificationFeed {
            notifications,
            unread_count: count.unread_count,
        })
    }
}

impl MountedView<NotificationFeedSource> {
    /// Flips the entry to read locally right away and tells the backend in
    /// the background. A failed call is logged and the local flip stays
    /// until the next load. Returns the background call, or `None` when the
    /// entry was already read (or unknown) and nothing was sent.
    pub fn mark_read(&self, notification_id: &NotificationId) -> Option<JoinHandle<()>> {
        let changed = self.controller().apply_optimistic_update(
            |notification| &notification.id == notification_id,
            |notification| {
                if notification.read {
                    return false;
                }
                notification.read = true;
                true
            },
        );
        if changed == 0 {
            return None;
        }

        let api = Arc::clone(&self.source().api);
        let user = self.source().user.clone();
        let notification_id = notification_id.clone();
        Some(tokio::spawn(async move {
            if let Err(err) = api.mark_notification_read(&user, &notification_id).await {
                warn!(
                    view = NotificationFeedSource::NAME,
                    notification = %notification_id,
                    error = %err,
                    "failed to mark notification read"
                );
            }
        }))
    }

    /// Asks the backend for a batch of sample notifications, then reloads.
    pub async fn generate_sample(&self) -> MutationOutcome {
        let source = self.source();
        if let Err(err) = source.api.generate_sample_notifications(&source.user).await {
            warn!(
                view = NotificationFeedSource::NAME,
                error = %err,
                "failed to generate sample notifications"
            );
            return MutationOutcome::Rejected;
        }
        info!(view = NotificationFeedSource::NAME, "sample notifications generated");
        self.refresh().await;
        MutationOutcome::Applied
    }

    /// Clears the feed on the backend; local state is emptied only once the
    /// backend confirmed.
    pub async fn clear(&self) -> MutationOutcome {
        let source = self.source();
        if let Err(err) = source.api.clear_notifications(&source.user).await {
            warn!(
                view = NotificationFeedSource::NAME,
                error = %err,
                "failed to clear notifications"
            );
            return MutationOutcome::Rejected;
        }
        self.controller()
            .update_local(|feed| *feed = NotificationFeed::default());
        MutationOutcome::Applied
    }
}
