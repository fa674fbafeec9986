use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{MatchId, MatchStatus, NotificationId, SportId, TournamentId, UserKey},
    protocol::{
        Match, NotificationStats, NotifierHealth, ScoreUpdate, SentNotification, Sport,
        StatusUpdate, TennisNotification, Tournament, TournamentEvent, UnreadCount,
    },
};
use tracing::debug;
use url::Url;

use crate::error::{ApiResult, ClientError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read and mutation endpoints of the sports tracker backend.
#[async_trait]
pub trait SportsApi: Send + Sync {
    async fn list_sports(&self) -> ApiResult<Vec<Sport>>;
    async fn get_sport(&self, sport_id: SportId) -> ApiResult<Sport>;

    async fn list_matches(&self) -> ApiResult<Vec<Match>>;
    async fn live_matches(&self) -> ApiResult<Vec<Match>>;
    async fn upcoming_matches(&self) -> ApiResult<Vec<Match>>;
    async fn upcoming_matches_for_sport(&self, sport_id: SportId) -> ApiResult<Vec<Match>>;
    async fn matches_for_sport(&self, sport_id: SportId) -> ApiResult<Vec<Match>>;
    async fn update_match_score(&self, match_id: MatchId, score: ScoreUpdate)
        -> ApiResult<Match>;
    async fn update_match_status(&self, match_id: MatchId, status: MatchStatus)
        -> ApiResult<Match>;

    async fn list_tournaments(&self) -> ApiResult<Vec<Tournament>>;
    async fn tournament_events(&self, tournament_id: &TournamentId)
        -> ApiResult<Vec<TournamentEvent>>;

    async fn notifications(&self, user: &UserKey) -> ApiResult<Vec<TennisNotification>>;
    async fn unread_count(&self, user: &UserKey) -> ApiResult<UnreadCount>;
    async fn mark_notification_read(
        &self,
        user: &UserKey,
        notification_id: &NotificationId,
    ) -> ApiResult<()>;
    async fn generate_sample_notifications(&self, user: &UserKey) -> ApiResult<()>;
    async fn clear_notifications(&self, user: &UserKey) -> ApiResult<()>;

    async fn recent_sent_notifications(&self, limit: u32) -> ApiResult<Vec<SentNotification>>;
    async fn notifier_stats(&self) -> ApiResult<NotificationStats>;
    async fn notifier_health(&self) -> ApiResult<NotifierHealth>;
}

/// [`SportsApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpSportsApi {
    http: Client,
    base_url: Url,
}

impl HttpSportsApi {
    /// `base_url` points at the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, request: RequestBuilder) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(%url, %status, "api response");
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let request = self.http.get(url.clone());
        let response = self.send(url.clone(), request).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn patch_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.http.patch(url.clone()).json(body);
        let response = self.send(url.clone(), request).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn execute(&self, method: Method, url: Url) -> ApiResult<()> {
        let request = self.http.request(method, url.clone());
        self.send(url, request).await?;
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "url cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

#[async_trait]
impl SportsApi for HttpSportsApi {
    async fn list_sports(&self) -> ApiResult<Vec<Sport>> {
        self.get_json(self.endpoint(&["sports"])?).await
    }

    async fn get_sport(&self, sport_id: SportId) -> ApiResult<Sport> {
        let id = sport_id.to_string();
        self.get_json(self.endpoint(&["sports", id.as_str()])?).await
    }

    async fn list_matches(&self) -> ApiResult<Vec<Match>> {
        self.get_json(self.endpoint(&["matches"])?).await
    }

    async fn live_matches(&self) -> ApiResult<Vec<Match>> {
        self.get_json(self.endpoint(&["matches", "live"])?).await
    }

    async fn upcoming_matches(&self) -> ApiResult<Vec<Match>> {
        self.get_json(self.endpoint(&["matches", "upcoming"])?).await
    }

    async fn upcoming_matches_for_sport(&self, sport_id: SportId) -> ApiResult<Vec<Match>> {
        let id = sport_id.to_string();
        self.get_json(self.endpoint(&["matches", "upcoming", "sport", id.as_str()])?)
            .await
    }

    async fn matches_for_sport(&self, sport_id: SportId) -> ApiResult<Vec<Match>> {
        let id = sport_id.to_string();
        self.get_json(self.endpoint(&["matches", "sport", id.as_str()])?).await
    }

    async fn update_match_score(
        &self,
        match_id: MatchId,
        score: ScoreUpdate,
    ) -> ApiResult<Match> {
        let id = match_id.to_string();
        self.patch_json(self.endpoint(&["matches", id.as_str(), "score"])?, &score)
            .await
    }

    async fn update_match_status(
        &self,
        match_id: MatchId,
        status: MatchStatus,
    ) -> ApiResult<Match> {
        let id = match_id.to_string();
        self.patch_json(
            self.endpoint(&["matches", id.as_str(), "status"])?,
            &StatusUpdate { status },
        )
        .await
    }

    async fn list_tournaments(&self) -> ApiResult<Vec<Tournament>> {
        self.get_json(self.endpoint(&["tournaments"])?).await
    }

    async fn tournament_events(
        &self,
        tournament_id: &TournamentId,
    ) -> ApiResult<Vec<TournamentEvent>> {
        self.get_json(self.endpoint(&["tournaments", tournament_id.as_str(), "events"])?)
            .await
    }

    async fn notifications(&self, user: &UserKey) -> ApiResult<Vec<TennisNotification>> {
        self.get_json(self.endpoint(&["tennis", "notifications", user.as_str()])?)
            .await
    }

    async fn unread_count(&self, user: &UserKey) -> ApiResult<UnreadCount> {
        self.get_json(self.endpoint(&["tennis", "notifications", user.as_str(), "count"])?)
            .await
    }

    async fn mark_notification_read(
        &self,
        user: &UserKey,
        notification_id: &NotificationId,
    ) -> ApiResult<()> {
        let url = self.endpoint(&[
            "tennis",
            "notifications",
            user.as_str(),
            "mark-read",
            notification_id.as_str(),
        ])?;
        self.execute(Method::POST, url).await
    }

    async fn generate_sample_notifications(&self, user: &UserKey) -> ApiResult<()> {
        let url = self.endpoint(&["tennis", "notifications", user.as_str(), "generate-sample"])?;
        self.execute(Method::POST, url).await
    }

    async fn clear_notifications(&self, user: &UserKey) -> ApiResult<()> {
        let url = self.endpoint(&["tennis", "notifications", user.as_str(), "clear"])?;
        self.execute(Method::DELETE, url).await
    }

    async fn recent_sent_notifications(&self, limit: u32) -> ApiResult<Vec<SentNotification>> {
        let mut url = self.endpoint(&["notifications", "recent"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn notifier_stats(&self) -> ApiResult<NotificationStats> {
        self.get_json(self.endpoint(&["notifications", "stats"])?)
            .await
    }

    async fn notifier_health(&self) -> ApiResult<NotifierHealth> {
        self.get_json(self.endpoint(&["notifications", "health"])?)
            .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
