use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::client::{DashboardClient, DashboardView};

/// Which halves of a refresh cycle succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub statistics_ok: bool,
    pub videos_ok: bool,
}

/// Counters returned when a poll loop stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub started: usize,
    pub skipped: usize,
    /// Cycles that finished before shutdown was requested
    pub completed: usize,
}

/// Fetch statistics and videos concurrently, applying each result as it
/// arrives. A failed fetch is logged and leaves its region untouched.
pub async fn refresh_cycle(client: &DashboardClient, view: &Mutex<DashboardView>) -> CycleReport {
    let statistics = async {
        match client.fetch_statistics().await {
            Ok(stats) => {
                view.lock().await.apply_statistics(stats);
                true
            }
            Err(e) => {
                tracing::warn!("Error fetching statistics: {}", e);
                false
            }
        }
    };

    let videos = async {
        match client.fetch_videos().await {
            Ok(videos) => {
                view.lock().await.apply_videos(videos);
                true
            }
            Err(e) => {
                tracing::warn!("Error fetching videos: {}", e);
                false
            }
        }
    };

    let (statistics_ok, videos_ok) = tokio::join!(statistics, videos);
    CycleReport {
        statistics_ok,
        videos_ok,
    }
}

/// Fixed-interval refresh loop driving a [`DashboardView`]
pub struct Poller {
    client: DashboardClient,
    view: Arc<Mutex<DashboardView>>,
    interval: Duration,
    single_flight: bool,
    echo: bool,
}

impl Poller {
    pub fn new(client: DashboardClient, interval: Duration, single_flight: bool) -> Self {
        Self {
            client,
            view: Arc::new(Mutex::new(DashboardView::new())),
            interval,
            single_flight,
            echo: false,
        }
    }

    /// Print the rendered frame to stdout after every cycle
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn view(&self) -> Arc<Mutex<DashboardView>> {
        self.view.clone()
    }

    fn spawn_cycle(&self, cycles: &mut JoinSet<CycleReport>) {
        let client = self.client.clone();
        let view = self.view.clone();
        let echo = self.echo;

        cycles.spawn(async move {
            let report = refresh_cycle(&client, &view).await;
            if echo {
                let frame = view.lock().await.render();
                // clear screen, cursor home
                print!("\x1b[2J\x1b[H{}", frame);
            }
            report
        });
    }

    /// Tick until `shutdown` resolves. With single-flight enabled a tick is
    /// skipped while the previous cycle is still running; otherwise cycles
    /// may overlap. Cycles still in flight at shutdown are awaited.
    pub async fn run_until<S>(&self, shutdown: S) -> PollSummary
    where
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut summary = PollSummary::default();
        let mut cycles = JoinSet::new();

        tracing::info!(
            "Polling {} every {:?} (single_flight={})",
            self.client.base_url(),
            self.interval,
            self.single_flight
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                    if log_join(joined) {
                        summary.completed += 1;
                    }
                }
                _ = ticker.tick() => {
                    if self.single_flight && !cycles.is_empty() {
                        tracing::debug!("Previous refresh still running, skipping tick");
                        summary.skipped += 1;
                        continue;
                    }
                    self.spawn_cycle(&mut cycles);
                    summary.started += 1;
                }
            }
        }

        while let Some(joined) = cycles.join_next().await {
            log_join(joined);
        }

        summary
    }
}

fn log_join(joined: Result<CycleReport, JoinError>) -> bool {
    match joined {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Refresh cycle failed to complete: {}", e);
            false
        }
    }
}
