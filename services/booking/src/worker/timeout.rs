use std::time::Duration;

use crate::domain::repository::BookingRepository;
use crate::domain::types::SWEEP_INTERVAL_SECS;
use crate::usecase::sweeper::SweepTimedOutBookingsUseCase;

/// Timeout sweep loop. Spawned from `main`; never returns.
pub async fn run_sweeper<B: BookingRepository>(bookings: B) {
    tracing::info!("saga timeout sweeper started");
    let usecase = SweepTimedOutBookingsUseCase { bookings };
    let mut tick = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
    loop {
        tick.tick().await;
        match usecase.execute().await {
            Ok(0) => {}
            Ok(count) => tracing::warn!(count, "swept timed-out bookings"),
            Err(e) => tracing::error!(error = %e, "timeout sweep failed"),
        }
    }
}
