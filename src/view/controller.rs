//! View state controller.
//!
//! Owns the query, the theme and the two fetched result sets. A refresh fans
//! out the current and forecast reads, joins them and commits both in one
//! state mutation, or commits nothing. Each refresh takes a sequence token;
//! only the most recently issued token may commit, and starting a refresh
//! cancels the one in flight.

use crate::domain::{CurrentConditions, ForecastEntry, Theme, UnitSystem, WeatherQuery, FORECAST_WINDOW};
use crate::view::source::{FetchError, WeatherSource};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything the render layer reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: WeatherQuery,
    pub theme: Theme,
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastEntry>,
    /// Query the displayed `current` and `forecast` were fetched for.
    pub displayed_for: Option<WeatherQuery>,
    in_flight: usize,
}

impl ViewState {
    pub fn busy(&self) -> bool {
        self.in_flight > 0
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    /// Empty city; nothing was requested.
    Skipped,
    Applied,
    /// A newer refresh started before this one could commit.
    Superseded,
    Failed(FetchError),
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied)
    }
}

pub struct WeatherController {
    source: Arc<dyn WeatherSource>,
    state: watch::Sender<ViewState>,
    latest: AtomicU64,
    cancel: Mutex<CancellationToken>,
    timeout: Duration,
}

impl WeatherController {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            source,
            state,
            latest: AtomicU64::new(0),
            cancel: Mutex::new(CancellationToken::new()),
            timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_query(self, query: WeatherQuery) -> Self {
        self.state.send_modify(|s| s.query = query);
        self
    }

    pub fn with_theme(self, theme: Theme) -> Self {
        self.state.send_modify(|s| s.theme = theme);
        self
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn query(&self) -> WeatherQuery {
        self.state.borrow().query.clone()
    }

    pub fn current_conditions(&self) -> Option<CurrentConditions> {
        self.state.borrow().current.clone()
    }

    pub fn forecast_window(&self) -> Vec<ForecastEntry> {
        self.state.borrow().forecast.clone()
    }

    pub fn busy(&self) -> bool {
        self.state.borrow().busy()
    }

    pub fn theme(&self) -> Theme {
        self.state.borrow().theme
    }

    pub fn toggle_theme(&self) -> Theme {
        let mut theme = Theme::default();
        self.state.send_modify(|s| {
            s.theme = s.theme.toggled();
            theme = s.theme;
        });
        theme
    }

    /// Refresh with the current query (Enter / Go).
    pub async fn submit(&self) -> RefreshOutcome {
        self.refresh(self.query()).await
    }

    pub async fn set_city(&self, city: impl Into<String>) -> RefreshOutcome {
        let query = WeatherQuery::new(city, self.query().unit_system);
        self.refresh(query).await
    }

    pub async fn set_unit_system(&self, unit_system: UnitSystem) -> RefreshOutcome {
        let query = WeatherQuery::new(self.query().city, unit_system);
        self.refresh(query).await
    }

    pub async fn refresh(&self, query: WeatherQuery) -> RefreshOutcome {
        if !query.has_city() {
            debug!("refresh skipped: empty city");
            return RefreshOutcome::Skipped;
        }

        // Token order must match the order cancel tokens are installed and
        // the query is published, so all three happen under the same lock.
        let (token, cancel) = {
            let mut current = self.cancel.lock();
            let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            current.cancel();
            *current = CancellationToken::new();
            self.state.send_modify(|s| {
                s.query = query.clone();
                s.in_flight += 1;
            });
            (token, current.clone())
        };
        let _busy = BusyGuard { state: &self.state };

        let fetch = async {
            tokio::join!(self.source.current(&query), self.source.forecast(&query))
        };

        let joined = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("refresh #{} for {:?} cancelled", token, query.city);
                return RefreshOutcome::Superseded;
            }
            res = tokio::time::timeout(self.timeout, fetch) => res,
        };

        let (current, forecast) = match joined {
            Ok((Ok(current), Ok(forecast))) => (current, forecast),
            Ok((Err(e), _)) | Ok((_, Err(e))) => {
                error!("refresh for {:?} failed: {}", query.city, e);
                return RefreshOutcome::Failed(e);
            }
            Err(_) => {
                warn!("refresh for {:?} timed out after {:?}", query.city, self.timeout);
                return RefreshOutcome::Failed(FetchError::Timeout(self.timeout));
            }
        };

        let mut window = forecast;
        window.truncate(FORECAST_WINDOW);

        let mut applied = false;
        self.state.send_modify(|s| {
            if self.latest.load(Ordering::SeqCst) == token {
                s.current = Some(current);
                s.forecast = window;
                s.displayed_for = Some(query.clone());
                applied = true;
            }
        });

        if applied {
            info!("showing weather for {:?} ({})", query.city, query.unit_system);
            RefreshOutcome::Applied
        } else {
            debug!("refresh #{} for {:?} discarded as stale", token, query.city);
            RefreshOutcome::Superseded
        }
    }
}

/// Releases one in-flight slot however the refresh exits.
struct BusyGuard<'a> {
    state: &'a watch::Sender<ViewState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}
