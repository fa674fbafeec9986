use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{domain::SportId, protocol::Match};
use tokio::sync::RwLock;

use crate::{
    api::SportsApi,
    controller::{MountedView, ViewSource},
    error::ApiResult,
    view_state::LoadOutcome,
    views::sports::SportsSource,
};

pub struct LiveMatchesSource {
    api: Arc<dyn SportsApi>,
}

impl LiveMatchesSource {
    pub fn new(api: Arc<dyn SportsApi>) -> Self {
        Self { api }
    }

    /// Mounts the live list with its auto-refresh running.
    pub async fn mount(api: Arc<dyn SportsApi>, poll: Duration) -> MountedView<Self> {
        MountedView::mount(Self::new(api), Some(poll)).await
    }
}

#[async_trait]
impl ViewSource for LiveMatchesSource {
    type Data = Vec<Match>;

    const NAME: &'static str = "live_matches";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch live matches";

    async fn fetch(&self) -> ApiResult<Vec<Match>> {
        self.api.live_matches().await
    }
}

pub struct UpcomingMatchesSource {
    api: Arc<dyn SportsApi>,
    selected_sport: RwLock<Option<SportId>>,
}

impl UpcomingMatchesSource {
    pub fn new(api: Arc<dyn SportsApi>, selected_sport: Option<SportId>) -> Self {
        Self {
            api,
            selected_sport: RwLock::new(selected_sport),
        }
    }

    pub async fn selected_sport(&self) -> Option<SportId> {
        *self.selected_sport.read().await
    }
}

#[async_trait]
impl ViewSource for UpcomingMatchesSource {
    type Data = Vec<Match>;

    const NAME: &'static str = "upcoming_matches";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch upcoming matches";

    async fn fetch(&self) -> ApiResult<Vec<Match>> {
        match self.selected_sport().await {
            Some(sport_id) => self.api.upcoming_matches_for_sport(sport_id).await,
            None => self.api.upcoming_matches().await,
        }
    }
}

impl MountedView<UpcomingMatchesSource> {
    /// Changes the sport filter (`None` shows every sport) and reloads.
    pub async fn select_sport(&self, sport: Option<SportId>) -> LoadOutcome {
        *self.source().selected_sport.write().await = sport;
        self.refresh().await
    }
}

/// Upcoming matches plus the sport list behind its filter. The two keep
/// separate state, so a failing sport list never shows up as a matches
/// error.
pub struct UpcomingMatchesScreen {
    pub matches: MountedView<UpcomingMatchesSource>,
    pub sport_options: MountedView<SportsSource>,
}

impl UpcomingMatchesScreen {
    pub async fn mount(api: Arc<dyn SportsApi>, selected_sport: Option<SportId>) -> Self {
        let (matches, sport_options) = tokio::join!(
            MountedView::mount(
                UpcomingMatchesSource::new(Arc::clone(&api), selected_sport),
                None
            ),
            MountedView::mount(SportsSource::new(api), None),
        );
        Self {
            matches,
            sport_options,
        }
    }

    /// Display name of the selected sport, once the sport list knows it.
    pub async fn selected_sport_name(&self) -> Option<String> {
        let selected = self.matches.source().selected_sport().await?;
        self.sport_options
            .state()
            .data
            .into_iter()
            .find(|sport| sport.id == selected)
            .map(|sport| sport.name)
    }
}

/// All matches of one sport.
pub struct SportMatchesSource {
    api: Arc<dyn SportsApi>,
    sport_id: SportId,
}

impl SportMatchesSource {
    pub fn new(api: Arc<dyn SportsApi>, sport_id: SportId) -> Self {
        Self { api, sport_id }
    }
}

#[async_trait]
impl ViewSource for SportMatchesSource {
    type Data = Vec<Match>;

    const NAME: &'static str = "sport_matches";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch matches";

    async fn fetch(&self) -> ApiResult<Vec<Match>> {
        self.api.matches_for_sport(self.sport_id).await
    }
}
