use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::SportId,
    protocol::{Match, Sport},
};

use crate::{api::SportsApi, controller::ViewSource, error::ApiResult};

pub const FAVORITE_MATCHES_LEN: usize = 10;

pub struct SportsSource {
    api: Arc<dyn SportsApi>,
}

impl SportsSource {
    pub fn new(api: Arc<dyn SportsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ViewSource for SportsSource {
    type Data = Vec<Sport>;

    const NAME: &'static str = "sports";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch sports";

    async fn fetch(&self) -> ApiResult<Vec<Sport>> {
        self.api.list_sports().await
    }
}

pub fn active_count(sports: &[Sport]) -> usize {
    sports.iter().filter(|sport| sport.active).count()
}

pub struct SportDetailSource {
    api: Arc<dyn SportsApi>,
    sport_id: SportId,
}

impl SportDetailSource {
    pub fn new(api: Arc<dyn SportsApi>, sport_id: SportId) -> Self {
        Self { api, sport_id }
    }
}

#[async_trait]
impl ViewSource for SportDetailSource {
    type Data = Option<Sport>;

    const NAME: &'static str = "sport_detail";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch sport";

    async fn fetch(&self) -> ApiResult<Option<Sport>> {
        self.api.get_sport(self.sport_id).await.map(Some)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesData {
    pub sports: Vec<Sport>,
    /// First [`FAVORITE_MATCHES_LEN`] matches.
    pub matches: Vec<Match>,
}

/// There are no per-user favorites on the backend yet; the view shows every
/// sport and the head of the match list.
pub struct FavoritesSource {
    api: Arc<dyn SportsApi>,
}

impl FavoritesSource {
    pub fn new(api: Arc<dyn SportsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ViewSource for FavoritesSource {
    type Data = FavoritesData;

    const NAME: &'static str = "favorites";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch favorites";

    async fn fetch(&self) -> ApiResult<FavoritesData> {
        let (sports, mut matches) =
            tokio::try_join!(self.api.list_sports(), self.api.list_matches())?;
        matches.truncate(FAVORITE_MATCHES_LEN);
        Ok(FavoritesData { sports, matches })
    }
}
