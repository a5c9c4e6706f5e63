use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use packdash_core::config::PackdashConfig;
use packdash_core::{Dashboard, Refresher, Selector, events};

use super::{build_dashboard, runtime, selector_arg};
use crate::render;

pub(crate) fn handle_tv_command(
    matches: &ArgMatches,
    config: PackdashConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let selector = selector_arg(matches)?;
    let interval = matches
        .get_one::<u64>("interval")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or_else(|| config.refresh.interval());
    let tick = matches
        .get_one::<u64>("tick")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or_else(|| config.display.tick());

    info!(
        event = "cli.tv_started",
        selector = %selector,
        interval_secs = interval.as_secs(),
        tick_secs = tick.as_secs()
    );

    let dashboard = Arc::new(build_dashboard(&config)?);
    runtime()?.block_on(run_display(dashboard, selector, interval, tick))
}

/// Redraw until Ctrl-C. The refresher only ever touches the current shift;
/// a dated display is served from whatever the cache holds for that date.
async fn run_display(
    dashboard: Arc<Dashboard>,
    selector: Selector,
    interval: Duration,
    tick: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let cancel = CancellationToken::new();
    let refresher = Refresher::new(Arc::clone(&dashboard), interval);
    let stats = refresher.stats();
    let handle = refresher.spawn(cancel.clone());
    let color = render::use_color();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(event = "cli.tv_signal_failed", error = %e);
        }
    };
    let (dashboard_ref, stats_ref) = (&*dashboard, &*stats);
    let frames = redraw_until(shutdown, tick, move || async move {
        let payload = dashboard_ref.payload(selector).await;
        render::clear_screen();
        render::print_payload(&payload, color);
        println!(
            "Background refresh: {} cycles, {} failed. Press Ctrl-C to exit.",
            stats_ref.cycles(),
            stats_ref.failures()
        );
    })
    .await;

    events::log_app_shutdown();
    cancel.cancel();
    if let Err(e) = handle.await {
        warn!(event = "cli.tv_refresher_join_failed", error = %e);
    }

    info!(
        event = "cli.tv_completed",
        frames = frames,
        cycles = stats.cycles()
    );
    Ok(())
}

/// Run `draw` every `tick` until `shutdown` resolves, returning the number of
/// completed frames. A frame still building when shutdown arrives is dropped.
async fn redraw_until<S, D, F>(shutdown: S, tick: Duration, mut draw: D) -> u64
where
    S: Future<Output = ()>,
    D: FnMut() -> F,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut frames = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = draw() => frames += 1,
        }
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(tick) => {}
        }
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future;

    const TICK: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn test_ready_shutdown_draws_nothing() {
        let frames = redraw_until(future::ready(()), TICK, || async {}).await;
        assert_eq!(frames, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redraws_once_per_tick() {
        let shutdown = tokio::time::sleep(TICK * 2 + Duration::from_secs(1));
        let frames = redraw_until(shutdown, TICK, || async {}).await;
        assert_eq!(frames, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_slow_build() {
        let started = tokio::time::Instant::now();
        let shutdown = tokio::time::sleep(Duration::from_secs(1));
        let frames = redraw_until(shutdown, TICK, future::pending::<()>).await;

        assert_eq!(frames, 0);
        assert!(started.elapsed() < TICK);
    }
}
