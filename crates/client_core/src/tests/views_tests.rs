use std::{collections::HashMap, sync::Arc, time::Duration};

use shared::{
    domain::{MatchStatus, NotificationId, SportId, TournamentId, UserKey},
    protocol::{NotificationStats, NotifierHealth, SentNotification, Tournament, TournamentEvent},
};

use crate::{
    api::SportsApi,
    controller::MountedView,
    fake_api::{game, games, notification, sport, FakeBackend, FakeSportsApi},
    view_state::LoadOutcome,
    views::{
        DashboardSource, FavoritesSource, LiveMatchesSource, MutationOutcome,
        NotificationFeedSource, NotifierSource, SportDetailSource, SportMatchesSource,
        TournamentBrowser, TournamentEventsSource, UpcomingMatchesScreen,
    },
};

const POLL: Duration = Duration::from_secs(30);

fn api(fake: &Arc<FakeSportsApi>) -> Arc<dyn SportsApi> {
    fake.clone()
}

fn demo_user() -> UserKey {
    UserKey::new("demo-user")
}

fn dashboard_backend() -> FakeBackend {
    FakeBackend {
        live: games(2, MatchStatus::Live),
        upcoming: games(7, MatchStatus::Scheduled),
        sports: vec![sport(1, "Cricket"), sport(2, "Tennis"), sport(3, "Football")],
        ..FakeBackend::default()
    }
}

fn feed_backend() -> FakeBackend {
    FakeBackend {
        notifications: vec![
            notification("n1", false),
            notification("n2", false),
            notification("n3", false),
            notification("n4", true),
        ],
        ..FakeBackend::default()
    }
}

fn is_read(view: &MountedView<NotificationFeedSource>, id: &str) -> bool {
    view.state()
        .data
        .notifications
        .iter()
        .any(|notification| notification.id.as_str() == id && notification.read)
}

#[tokio::test]
async fn dashboard_combines_three_endpoints() {
    let fake = FakeSportsApi::with(dashboard_backend());
    let view = MountedView::mount(DashboardSource::new(api(&fake)), None).await;

    let state = view.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    let backend = fake.backend();
    assert_eq!(state.data.live, backend.live);
    assert_eq!(state.data.upcoming, backend.upcoming[..5].to_vec());
    assert_eq!(state.data.sports, backend.sports);
    let upcoming_ids: Vec<i64> = state.data.upcoming.iter().map(|game| game.id.0).collect();
    assert_eq!(upcoming_ids, vec![1, 2, 3, 4, 5]);

    let stats = state.data.stats();
    assert_eq!(stats.upcoming_matches, 5);
    assert_eq!(stats.tennis_sports, 1);
    assert_eq!(state.data.live_preview().len(), 2);
}

#[tokio::test]
async fn dashboard_failure_keeps_last_good_data() {
    let fake = FakeSportsApi::with(dashboard_backend());
    let view = MountedView::mount(DashboardSource::new(api(&fake)), None).await;

    for endpoint in ["live", "upcoming", "sports"] {
        fake.fail(endpoint);
    }
    assert_eq!(view.refresh().await, LoadOutcome::Failed);

    let state = view.state();
    assert_eq!(state.error.as_deref(), Some("Failed to fetch dashboard data"));
    assert!(!state.loading);
    assert_eq!(state.data.live.len(), 2);
    assert_eq!(state.data.upcoming.len(), 5);
}

#[tokio::test]
async fn dashboard_fails_as_a_whole_when_one_endpoint_fails() {
    let fake = FakeSportsApi::with(dashboard_backend());
    fake.fail("sports");
    let view = MountedView::mount(DashboardSource::new(api(&fake)), None).await;

    let state = view.state();
    assert_eq!(state.error.as_deref(), Some("Failed to fetch dashboard data"));
    assert!(state.data.live.is_empty());
    assert!(state.last_updated.is_none());
}

#[tokio::test(start_paused = true)]
async fn live_matches_pick_up_backend_changes_on_next_poll() {
    let fake = FakeSportsApi::with(dashboard_backend());
    let view = LiveMatchesSource::mount(api(&fake), POLL).await;
    assert_eq!(view.state().data.len(), 2);

    fake.edit(|backend| backend.live.push(game(9, MatchStatus::Live)));
    assert_eq!(view.state().data.len(), 2);

    tokio::time::sleep(POLL + Duration::from_secs(1)).await;
    assert_eq!(view.state().data.len(), 3);
    assert_eq!(fake.call_count("live"), 2);
}

#[tokio::test]
async fn upcoming_filter_switches_endpoint() {
    let mut backend = dashboard_backend();
    backend.upcoming_by_sport = HashMap::from([(SportId(2), games(2, MatchStatus::Scheduled))]);
    let fake = FakeSportsApi::with(backend);
    let screen = UpcomingMatchesScreen::mount(api(&fake), None).await;
    assert_eq!(screen.matches.state().data.len(), 7);
    assert_eq!(screen.selected_sport_name().await, None);

    assert_eq!(screen.matches.select_sport(Some(SportId(2))).await, LoadOutcome::Ready);
    assert_eq!(screen.matches.state().data.len(), 2);
    assert_eq!(screen.selected_sport_name().await.as_deref(), Some("Tennis"));
    assert_eq!(fake.call_count("upcoming_for_sport"), 1);

    screen.matches.select_sport(None).await;
    assert_eq!(screen.matches.state().data.len(), 7);
}

#[tokio::test]
async fn upcoming_sport_list_failure_stays_out_of_matches_state() {
    let fake = FakeSportsApi::with(dashboard_backend());
    fake.fail("sports");
    let screen = UpcomingMatchesScreen::mount(api(&fake), None).await;

    assert_eq!(screen.matches.state().error, None);
    assert_eq!(screen.matches.state().data.len(), 7);
    assert_eq!(
        screen.sport_options.state().error.as_deref(),
        Some("Failed to fetch sports")
    );
}

#[tokio::test]
async fn sport_detail_and_matches() {
    let mut tennis_match = game(1, MatchStatus::Live);
    tennis_match.sport = Some(sport(2, "Tennis"));
    let mut backend = dashboard_backend();
    backend.matches = vec![tennis_match, game(2, MatchStatus::Scheduled)];
    let fake = FakeSportsApi::with(backend);

    let detail = MountedView::mount(SportDetailSource::new(api(&fake), SportId(2)), None).await;
    assert_eq!(detail.state().data.map(|sport| sport.name).as_deref(), Some("Tennis"));

    let matches = MountedView::mount(SportMatchesSource::new(api(&fake), SportId(2)), None).await;
    assert_eq!(matches.state().data.len(), 1);

    let missing = MountedView::mount(SportDetailSource::new(api(&fake), SportId(99)), None).await;
    assert_eq!(missing.state().data, None);
    assert_eq!(missing.state().error.as_deref(), Some("Failed to fetch sport"));
}

#[tokio::test]
async fn favorites_show_first_ten_matches() {
    let mut backend = dashboard_backend();
    backend.matches = games(14, MatchStatus::Scheduled);
    let fake = FakeSportsApi::with(backend);

    let view = MountedView::mount(FavoritesSource::new(api(&fake)), None).await;
    let state = view.state();
    assert_eq!(state.data.matches.len(), 10);
    assert_eq!(state.data.sports.len(), 3);
}

#[tokio::test]
async fn mark_read_updates_locally_then_tells_backend() {
    let fake = FakeSportsApi::with(feed_backend());
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;
    assert_eq!(view.state().data.unread_count, 3);

    let sent = view.mark_read(&NotificationId::new("n1"));
    assert!(is_read(&view, "n1"));
    assert_eq!(view.state().data.unread_count, 2);

    sent.expect("backend call").await.expect("mark-read task");
    assert_eq!(fake.call_count("mark_read"), 1);
    assert!(fake.backend().notifications[0].read);

    assert!(view.mark_read(&NotificationId::new("n1")).is_none());
    assert_eq!(view.state().data.unread_count, 2);
    assert_eq!(fake.call_count("mark_read"), 1);
}

#[tokio::test]
async fn mark_read_of_read_or_unknown_entry_sends_nothing() {
    let fake = FakeSportsApi::with(feed_backend());
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;

    assert!(view.mark_read(&NotificationId::new("n4")).is_none());
    assert!(view.mark_read(&NotificationId::new("missing")).is_none());
    assert_eq!(view.state().data.unread_count, 3);
    assert_eq!(fake.call_count("mark_read"), 0);
}

#[tokio::test]
async fn failed_mark_read_is_corrected_by_next_load() {
    let fake = FakeSportsApi::with(feed_backend());
    fake.fail("mark_read");
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;

    let sent = view.mark_read(&NotificationId::new("n2"));
    sent.expect("backend call").await.expect("mark-read task");
    assert!(is_read(&view, "n2"));
    assert_eq!(view.state().error, None);

    view.refresh().await;
    assert!(!is_read(&view, "n2"));
    assert_eq!(view.state().data.unread_count, 3);
}

#[tokio::test]
async fn generate_sample_reloads_feed() {
    let fake = FakeSportsApi::with(feed_backend());
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;

    assert_eq!(view.generate_sample().await, MutationOutcome::Applied);
    let state = view.state();
    assert_eq!(state.data.notifications.len(), 7);
    assert_eq!(state.data.unread_count, 6);
    assert_eq!(view.source().user().as_str(), "demo-user");
}

#[tokio::test]
async fn rejected_generate_sample_leaves_feed_alone() {
    let fake = FakeSportsApi::with(feed_backend());
    fake.fail("generate_sample");
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;

    assert_eq!(view.generate_sample().await, MutationOutcome::Rejected);
    assert_eq!(view.state().data.notifications.len(), 4);
    assert_eq!(fake.call_count("notifications"), 1);
}

#[tokio::test]
async fn clear_empties_feed_after_backend_confirms() {
    let fake = FakeSportsApi::with(feed_backend());
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;

    fake.fail("clear");
    assert_eq!(view.clear().await, MutationOutcome::Rejected);
    assert_eq!(view.state().data.notifications.len(), 4);

    fake.recover("clear");
    assert_eq!(view.clear().await, MutationOutcome::Applied);
    let state = view.state();
    assert!(state.data.notifications.is_empty());
    assert_eq!(state.data.unread_count, 0);
}

#[tokio::test]
async fn notification_feed_failure_uses_feed_message() {
    let fake = FakeSportsApi::with(feed_backend());
    fake.fail("unread_count");
    let view = NotificationFeedSource::mount(api(&fake), demo_user(), POLL).await;

    let state = view.state();
    assert_eq!(state.error.as_deref(), Some("Failed to load notifications"));
    assert!(state.data.notifications.is_empty());
}

#[tokio::test]
async fn notifier_overview_limits_recent_list() {
    let backend = FakeBackend {
        sent: (0..25)
            .map(|index| SentNotification {
                home_player: format!("Player {index}"),
                away_player: "Rival".to_string(),
                ..SentNotification::default()
            })
            .collect(),
        stats: NotificationStats {
            total_notifications_sent: 25,
            today_notifications: 4,
            total_scheduled_matches: 9,
            matches_with_notifications: 7,
        },
        health: NotifierHealth {
            status: "healthy".to_string(),
            scheduler_active: true,
            last_check: None,
        },
        ..FakeBackend::default()
    };
    let fake = FakeSportsApi::with(backend);

    let view = MountedView::mount(NotifierSource::new(api(&fake)), None).await;
    let state = view.state();
    assert_eq!(state.data.recent.len(), 20);
    assert_eq!(state.data.stats.today_notifications, 4);
    assert!(state.data.health.is_healthy());

    fake.fail("notifier_health");
    view.refresh().await;
    assert_eq!(
        view.state().error.as_deref(),
        Some("Failed to fetch notification data")
    );
}

fn tournament_backend() -> FakeBackend {
    let wimbledon = TournamentId::new("t1");
    FakeBackend {
        tournaments: vec![Tournament {
            tournament_id: wimbledon.clone(),
            name: "Wimbledon".to_string(),
            ..Tournament::default()
        }],
        events: HashMap::from([(
            wimbledon,
            vec![TournamentEvent {
                participants: vec!["Sinner".to_string(), "Alcaraz".to_string()],
                status: "live".to_string(),
                ..TournamentEvent::default()
            }],
        )]),
        ..FakeBackend::default()
    }
}

#[tokio::test]
async fn tournament_events_without_selection_issue_no_request() {
    let fake = FakeSportsApi::with(tournament_backend());
    let view = MountedView::mount(TournamentEventsSource::new(api(&fake), None), None).await;

    let state = view.state();
    assert!(state.data.is_empty());
    assert_eq!(state.error, None);
    assert!(!state.loading);
    assert_eq!(fake.call_count("tournament_events"), 0);
}

#[tokio::test]
async fn tournament_browser_loads_events_for_selection() {
    let fake = FakeSportsApi::with(tournament_backend());
    let browser = TournamentBrowser::mount(api(&fake), None).await;
    assert_eq!(browser.tournaments.state().data.len(), 1);
    assert!(browser.events.state().data.is_empty());

    assert_eq!(
        browser.select(Some(TournamentId::new("t1"))).await,
        LoadOutcome::Ready
    );
    assert_eq!(browser.events.state().data.len(), 1);
    assert_eq!(
        browser.selected_tournament().await.map(|t| t.name).as_deref(),
        Some("Wimbledon")
    );

    browser.refresh().await;
    assert_eq!(fake.call_count("tournament_events"), 2);
    assert_eq!(fake.call_count("tournaments"), 1);

    browser.select(None).await;
    assert!(browser.events.state().data.is_empty());
    browser.refresh().await;
    assert_eq!(fake.call_count("tournaments"), 2);
}
