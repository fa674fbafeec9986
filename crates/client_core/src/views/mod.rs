//! Concrete views. Each one is a [`ViewSource`](crate::controller::ViewSource)
//! mounted through [`MountedView`](crate::controller::MountedView); views
//! with extra user actions add them as inherent methods on their mounted
//! form.

pub mod dashboard;
pub mod matches;
pub mod notifications;
pub mod notifier;
pub mod sports;
pub mod tournaments;

pub use dashboard::{DashboardData, DashboardSource};
pub use matches::{
    LiveMatchesSource, SportMatchesSource, UpcomingMatchesScreen, UpcomingMatchesSource,
};
pub use notifications::{MutationOutcome, NotificationFeed, NotificationFeedSource};
pub use notifier::{NotifierOverview, NotifierSource};
pub use sports::{FavoritesData, FavoritesSource, SportDetailSource, SportsSource};
pub use tournaments::{TournamentBrowser, TournamentEventsSource, TournamentsSource};
