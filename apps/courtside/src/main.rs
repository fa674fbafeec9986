use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client_core::{
    views::{
        DashboardSource, FavoritesSource, LiveMatchesSource, MutationOutcome,
        NotificationFeedSource, NotifierSource, SportDetailSource, SportMatchesSource,
        SportsSource, TournamentBrowser, TournamentsSource, UpcomingMatchesScreen,
    },
    HttpSportsApi, MountedView, SportsApi, ViewSource, ViewState,
};
use shared::{
    domain::{MatchId, MatchStatus, NotificationId, SportId, TournamentId},
    protocol::ScoreUpdate,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, ClientSettings, CliOverrides};

#[derive(Parser, Debug)]
#[command(name = "courtside", about = "Terminal client for the sports tracker API")]
struct Args {
    /// API root, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// User whose tennis notifications are shown
    #[arg(long, global = true)]
    user: Option<String>,
    /// Settings file (defaults to ./courtside.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Live, upcoming and sports overview
    Dashboard,
    /// Matches in progress
    Live {
        #[arg(long)]
        watch: bool,
    },
    /// Scheduled matches, optionally for one sport
    Upcoming {
        #[arg(long)]
        sport: Option<i64>,
    },
    Sports,
    Sport {
        id: i64,
    },
    SportMatches {
        id: i64,
    },
    Favorites,
    /// Tennis notification feed of the current user
    Notifications {
        #[arg(long)]
        watch: bool,
    },
    MarkRead {
        id: String,
    },
    GenerateSample,
    ClearNotifications,
    /// Match notifier health, stats and recent sends
    Notifier {
        #[arg(long)]
        watch: bool,
    },
    Tournaments,
    /// Events of a tournament; lists tournaments when none is given
    Events {
        tournament_id: Option<String>,
    },
    Score {
        match_id: i64,
        home: i32,
        away: i32,
    },
    Status {
        match_id: i64,
        status: MatchStatus,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(
        args.config.as_deref(),
        &CliOverrides {
            api_base_url: args.api_url.clone(),
            user_id: args.user.clone(),
        },
    )?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api: Arc<dyn SportsApi> = Arc::new(
        HttpSportsApi::new(&settings.api_base_url, settings.request_timeout())
            .context("failed to create api client")?,
    );
    info!(api = %settings.api_base_url, user = %settings.user_id, "courtside starting");

    run(args.command, api, &settings).await
}

async fn run(command: Command, api: Arc<dyn SportsApi>, settings: &ClientSettings) -> Result<()> {
    let poll = settings.poll_interval();
    match command {
        Command::Dashboard => {
            let view = MountedView::mount(DashboardSource::new(api), None).await;
            print_once(&view.state(), render::dashboard)
        }
        Command::Live { watch } => {
            let view =
                MountedView::mount(LiveMatchesSource::new(api), watch.then_some(poll)).await;
            if watch {
                watch_view(&view, |matches| render::match_list(matches)).await
            } else {
                print_once(&view.state(), |matches| render::match_list(matches))
            }
        }
        Command::Upcoming { sport } => {
            let screen = UpcomingMatchesScreen::mount(api, sport.map(SportId)).await;
            let sport_name = screen.selected_sport_name().await;
            print_once(&screen.matches.state(), |matches| {
                render::upcoming(matches, sport_name.as_deref())
            })
        }
        Command::Sports => {
            let view = MountedView::mount(SportsSource::new(api), None).await;
            print_once(&view.state(), |sports| render::sport_list(sports))
        }
        Command::Sport { id } => {
            let view = MountedView::mount(SportDetailSource::new(api, SportId(id)), None).await;
            print_once(&view.state(), |sport| render::sport_detail(sport.as_ref()))
        }
        Command::SportMatches { id } => {
            let view = MountedView::mount(SportMatchesSource::new(api, SportId(id)), None).await;
            print_once(&view.state(), |matches| render::match_list(matches))
        }
        Command::Favorites => {
            let view = MountedView::mount(FavoritesSource::new(api), None).await;
            print_once(&view.state(), render::favorites)
        }
        Command::Notifications { watch } => {
            let view = if watch {
                NotificationFeedSource::mount(api, settings.user(), poll).await
            } else {
                MountedView::mount(NotificationFeedSource::new(api, settings.user()), None).await
            };
            if watch {
                watch_view(&view, render_feed).await
            } else {
                print_once(&view.state(), render_feed)
            }
        }
        Command::MarkRead { id } => {
            let view =
                MountedView::mount(NotificationFeedSource::new(api, settings.user()), None).await;
            fail_on_error(&view.state())?;
            match view.mark_read(&NotificationId::new(id.as_str())) {
                Some(call) => {
                    call.await.context("mark-read task failed")?;
                    view.refresh().await;
                }
                None => println!("Notification {id} is already read or not in the feed."),
            }
            print_once(&view.state(), render_feed)
        }
        Command::GenerateSample => {
            let view =
                MountedView::mount(NotificationFeedSource::new(api, settings.user()), None).await;
            if view.generate_sample().await == MutationOutcome::Rejected {
                bail!("Failed to generate sample notifications");
            }
            print_once(&view.state(), render_feed)
        }
        Command::ClearNotifications => {
            let view =
                MountedView::mount(NotificationFeedSource::new(api, settings.user()), None).await;
            if view.clear().await == MutationOutcome::Rejected {
                bail!("Failed to clear notifications");
            }
            print_once(&view.state(), render_feed)
        }
        Command::Notifier { watch } => {
            let view = MountedView::mount(NotifierSource::new(api), watch.then_some(poll)).await;
            if watch {
                watch_view(&view, render::notifier).await
            } else {
                print_once(&view.state(), render::notifier)
            }
        }
        Command::Tournaments => {
            let view = MountedView::mount(TournamentsSource::new(api), None).await;
            print_once(&view.state(), |list| render::tournaments(list))
        }
        Command::Events { tournament_id } => {
            let browser = TournamentBrowser::mount(api, tournament_id.map(TournamentId::new)).await;
            if browser.events.source().selected().await.is_none() {
                return print_once(&browser.tournaments.state(), |list| render::tournaments(list));
            }
            let tournament = browser.selected_tournament().await;
            print_once(&browser.events.state(), |events| {
                render::events(tournament.as_ref(), events)
            })
        }
        Command::Score {
            match_id,
            home,
            away,
        } => {
            let updated = api
                .update_match_score(
                    MatchId(match_id),
                    ScoreUpdate {
                        home_score: home,
                        away_score: away,
                    },
                )
                .await
                .with_context(|| format!("failed to update score of match {match_id}"))?;
            println!("{}", render::match_line(&updated));
            Ok(())
        }
        Command::Status { match_id, status } => {
            let updated = api
                .update_match_status(MatchId(match_id), status)
                .await
                .with_context(|| format!("failed to update status of match {match_id}"))?;
            println!("{}", render::match_line(&updated));
            Ok(())
        }
    }
}

fn render_feed(feed: &client_core::views::NotificationFeed) -> String {
    render::notification_feed(feed, Local::now().naive_local())
}

fn fail_on_error<T>(state: &ViewState<T>) -> Result<()> {
    match &state.error {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

fn print_once<T>(state: &ViewState<T>, render: impl Fn(&T) -> String) -> Result<()> {
    fail_on_error(state)?;
    println!("{}", render(&state.data));
    Ok(())
}

/// Reprints the view after every settled load until Ctrl-C.
async fn watch_view<S: ViewSource>(
    view: &MountedView<S>,
    render: impl Fn(&S::Data) -> String,
) -> Result<()> {
    let mut updates = view.subscribe();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut state = updates.borrow_and_update().clone();
    loop {
        if !state.loading {
            println!("{}\n{}\n", render(&state.data), render::status_footer(&state));
        }
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                state = updates.borrow_and_update().clone();
            }
            signal = &mut shutdown => {
                signal.context("failed to listen for ctrl-c")?;
                info!(view = S::NAME, "watch stopped");
                break;
            }
        }
    }
    Ok(())
}
