use std::sync::Arc;

use async_trait::async_trait;
use shared::protocol::{Match, Sport};

use crate::{api::SportsApi, controller::ViewSource, error::ApiResult};

pub const UPCOMING_PREVIEW_LEN: usize = 5;
pub const LIVE_PREVIEW_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub live: Vec<Match>,
    /// Already cut down to [`UPCOMING_PREVIEW_LEN`].
    pub upcoming: Vec<Match>,
    pub sports: Vec<Sport>,
}

impl DashboardData {
    pub fn tennis_sports(&self) -> impl Iterator<Item = &Sport> {
        self.sports.iter().filter(|sport| sport.is_tennis())
    }

    pub fn live_preview(&self) -> &[Match] {
        &self.live[..self.live.len().min(LIVE_PREVIEW_LEN)]
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            live_matches: self.live.len(),
            upcoming_matches: self.upcoming.len(),
            sports: self.sports.len(),
            tennis_sports: self.tennis_sports().count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub live_matches: usize,
    pub upcoming_matches: usize,
    pub sports: usize,
    pub tennis_sports: usize,
}

pub struct DashboardSource {
    api: Arc<dyn SportsApi>,
}

impl DashboardSource {
    pub fn new(api: Arc<dyn SportsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ViewSource for DashboardSource {
    type Data = DashboardData;

    const NAME: &'static str = "dashboard";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch dashboard data";

    async fn fetch(&self) -> ApiResult<DashboardData> {
        let (live, mut upcoming, sports) = tokio::try_join!(
            self.api.live_matches(),
            self.api.upcoming_matches(),
            self.api.list_sports(),
        )?;
        upcoming.truncate(UPCOMING_PREVIEW_LEN);
        Ok(DashboardData {
            live,
            upcoming,
            sports,
        })
    }
}
