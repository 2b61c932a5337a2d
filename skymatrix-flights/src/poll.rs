//! The poll loop: fetch, diff against the last snapshot, page through aircraft.
//!
//! A plain sequential loop. The snapshot is owned here and passed through
//! `skymatrix_core::diff` on every round.

use std::time::Duration;

use tracing::{info, warn};

use skymatrix_core::layout::{aircraft_page, format_miles, no_aircraft_page};
use skymatrix_core::{diff, FeedAircraft, Position, Resolution, Resolver, Snapshot};

use crate::feeder::FeederClient;
use crate::panel::{Panel, PanelError};

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub page_dwell: Duration,
}

/// Resolve an aircraft against the observer, if it has a usable position.
pub fn resolve_aircraft(
    resolver: &Resolver,
    observer: &Position,
    aircraft: &FeedAircraft,
) -> Option<Resolution> {
    let target = aircraft.position()?;
    match resolver.resolve(observer, &target) {
        Ok(r) => Some(r),
        Err(e) => {
            warn!(mode_s = %aircraft.mode_s, error = %e, "could not resolve bearing");
            None
        }
    }
}

/// Run until Ctrl-C.
pub async fn run(
    client: &FeederClient,
    resolver: &Resolver,
    observer: &Position,
    panel: &mut dyn Panel,
    settings: PollSettings,
) -> Result<(), PanelError> {
    panel.show_page(&no_aircraft_page())?;
    let mut snapshot = Snapshot::default();

    loop {
        let (next, finished) =
            poll_once(client, snapshot, resolver, observer, panel, settings.page_dwell).await?;
        snapshot = next;
        if !finished || !wait(settings.poll_interval).await {
            break;
        }
    }

    info!("Stopped");
    Ok(())
}

/// One fetch-and-display pass.
///
/// Returns the snapshot to keep and `false` if Ctrl-C cut the pages short.
/// A failed fetch keeps `snapshot` as is and draws nothing.
pub async fn poll_once(
    client: &FeederClient,
    snapshot: Snapshot,
    resolver: &Resolver,
    observer: &Position,
    panel: &mut dyn Panel,
    dwell: Duration,
) -> Result<(Snapshot, bool), PanelError> {
    info!(url = client.url(), "Getting aircraft");
    let fetched = match client.fetch().await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(error = %e, "fetch failed, keeping previous snapshot");
            return Ok((snapshot, true));
        }
    };

    let added = fetched.keys_not_in(&snapshot).count();
    let gone = snapshot.keys_not_in(&fetched).count();
    let (changed, next) = diff(&snapshot, fetched);
    if !changed {
        return Ok((next, true));
    }

    info!(aircraft = next.len(), added, gone, "Refreshing aircraft list");
    let finished = show_snapshot(&next, resolver, observer, panel, dwell).await?;
    Ok((next, finished))
}

/// Show one page per aircraft. Returns `false` if interrupted.
async fn show_snapshot(
    snapshot: &Snapshot,
    resolver: &Resolver,
    observer: &Position,
    panel: &mut dyn Panel,
    dwell: Duration,
) -> Result<bool, PanelError> {
    if snapshot.is_empty() {
        panel.show_page(&no_aircraft_page())?;
        return Ok(true);
    }

    for aircraft in snapshot.aircraft() {
        let resolution = resolve_aircraft(resolver, observer, aircraft);
        match &resolution {
            Some(r) => info!(
                aircraft = aircraft.label(),
                cardinal = %r.true_direction,
                arrow = %r.display_direction,
                distance = %format_miles(r.distance_miles()),
                "Showing aircraft"
            ),
            None => info!(aircraft = aircraft.label(), "Showing aircraft without position"),
        }
        panel.show_page(&aircraft_page(aircraft, resolution.as_ref()))?;

        if !wait(dwell).await {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Sleep for `duration`. Returns `false` if Ctrl-C arrived first.
async fn wait(duration: Duration) -> bool {
    tokio::select! {
        biased;
        _ = tokio::time::sleep(duration) => true,
        _ = tokio::signal::ctrl_c() => false,
    }
}
