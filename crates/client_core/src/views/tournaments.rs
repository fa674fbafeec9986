use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::TournamentId,
    protocol::{Tournament, TournamentEvent},
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    api::SportsApi,
    controller::{MountedView, ViewSource},
    error::ApiResult,
    view_state::LoadOutcome,
};

pub struct TournamentsSource {
    api: Arc<dyn SportsApi>,
}

impl TournamentsSource {
    pub fn new(api: Arc<dyn SportsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ViewSource for TournamentsSource {
    type Data = Vec<Tournament>;

    const NAME: &'static str = "tournaments";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch tournaments";

    async fn fetch(&self) -> ApiResult<Vec<Tournament>> {
        self.api.list_tournaments().await
    }
}

/// Events of the selected tournament. With no tournament selected the
/// view is empty and no request goes out.
pub struct TournamentEventsSource {
    api: Arc<dyn SportsApi>,
    selected: RwLock<Option<TournamentId>>,
}

impl TournamentEventsSource {
    pub fn new(api: Arc<dyn SportsApi>, selected: Option<TournamentId>) -> Self {
        Self {
            api,
            selected: RwLock::new(selected),
        }
    }

    pub async fn selected(&self) -> Option<TournamentId> {
        self.selected.read().await.clone()
    }
}

#[async_trait]
impl ViewSource for TournamentEventsSource {
    type Data = Vec<TournamentEvent>;

    const NAME: &'static str = "tournament_events";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch tournament events";

    async fn fetch(&self) -> ApiResult<Vec<TournamentEvent>> {
        let Some(tournament_id) = self.selected().await else {
            debug!(view = Self::NAME, "no tournament selected");
            return Ok(Vec::new());
        };
        self.api.tournament_events(&tournament_id).await
    }
}

impl MountedView<TournamentEventsSource> {
    pub async fn select(&self, tournament: Option<TournamentId>) -> LoadOutcome {
        *self.source().selected.write().await = tournament;
        self.refresh().await
    }
}

/// Tournament picker with the event list of the picked tournament.
pub struct TournamentBrowser {
    pub tournaments: MountedView<TournamentsSource>,
    pub events: MountedView<TournamentEventsSource>,
}

impl TournamentBrowser {
    pub async fn mount(api: Arc<dyn SportsApi>, selected: Option<TournamentId>) -> Self {
        let (tournaments, events) = tokio::join!(
            MountedView::mount(TournamentsSource::new(Arc::clone(&api)), None),
            MountedView::mount(TournamentEventsSource::new(api, selected), None),
        );
        Self {
            tournaments,
            events,
        }
    }

    pub async fn select(&self, tournament: Option<TournamentId>) -> LoadOutcome {
        self.events.select(tournament).await
    }

    /// Refreshes the events of the selected tournament, or the tournament
    /// list when nothing is selected.
    pub async fn refresh(&self) -> LoadOutcome {
        if self.events.source().selected().await.is_some() {
            self.events.refresh().await
        } else {
            self.tournaments.refresh().await
        }
    }

    pub async fn selected_tournament(&self) -> Option<Tournament> {
        let selected = self.events.source().selected().await?;
        self.tournaments
            .state()
            .data
            .into_iter()
            .find(|tournament| tournament.tournament_id == selected)
    }
}
