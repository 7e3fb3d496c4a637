use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

pub const TICK_PERIOD: Duration = Duration::from_millis(500);

/// The simulated bar never passes this until the attempt settles.
pub const PROGRESS_CEILING: u8 = 90;

/// Simulated progress for a generation attempt. The model call gives no real
/// progress signal, so the bar creeps up on a timer and jumps to 100 on finish.
pub struct ProgressTicker {
    sender: Arc<watch::Sender<u8>>,
    task: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn start() -> Self {
        Self::start_with(TICK_PERIOD)
    }

    pub fn start_with(period: Duration) -> Self {
        let (tx, _rx) = watch::channel(0u8);
        let sender = Arc::new(tx);

        let ticking = Arc::clone(&sender);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let increment = rand::rng().random_range(5..=14);
                ticking.send_modify(|value| *value = advance(*value, increment));
            }
        });

        Self { sender, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> u8 {
        *self.sender.borrow()
    }

    /// Stop ticking and report completion.
    pub fn finish(self) {
        self.task.abort();
        self.sender.send_replace(100);
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Next progress value, capped at the ceiling.
pub fn advance(current: u8, increment: u8) -> u8 {
    current.saturating_add(increment).min(PROGRESS_CEILING)
}
