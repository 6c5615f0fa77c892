//! Фоновый сервис истечения броней: раз в секунду тикает таймеры всех
//! активных сессий и периодически выбрасывает заброшенные сессии.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::AppState;

// Как часто проверять заброшенные сессии (в тиках по одной секунде)
const IDLE_SWEEP_EVERY_TICKS: u32 = 60;

pub struct ExpiryService {
    state: Arc<AppState>,
}

impl ExpiryService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Бесконечный цикл: запускается один раз при старте приложения.
    pub async fn run(self) {
        let mut ticker = interval(Duration::from_secs(1));
        let mut ticks: u32 = 0;

        loop {
            ticker.tick().await;

            let expired = self.state.sessions.tick_holds().await;
            for (session_id, released) in expired {
                info!(
                    "Seat hold expired for session {}: released {} seat(s) [{}]",
                    session_id,
                    released.len(),
                    released.join(", ")
                );
            }

            ticks += 1;
            if ticks >= IDLE_SWEEP_EVERY_TICKS {
                ticks = 0;
                let pruned = self.state.sessions.prune_idle().await;
                if pruned > 0 {
                    info!("Pruned {} idle booking session(s)", pruned);
                } else {
                    debug!("Idle sweep: nothing to prune");
                }
            }
        }
    }
}
