use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::countdown::{ConfirmationState, Countdown, CountdownPhase};

pub const TICK: Duration = Duration::from_secs(1);

type CountdownState = Arc<Mutex<Countdown>>;

/// The one-second ticker behind an open confirmation view.
///
/// Owns the tick task for as long as the view is shown. The task is aborted
/// on `close` and on drop, so no tick lands after the view is gone.
pub struct ConfirmationTimer {
    countdown: CountdownState,
    updates: Arc<watch::Sender<ConfirmationState>>,
    restart: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl ConfirmationTimer {
    /// Open the countdown and start ticking. Must be called inside a tokio
    /// runtime.
    pub fn open(countdown: CountdownState, target_url: Option<String>, email: &str) -> Self {
        let initial = {
            let mut c = countdown.lock();
            c.open(target_url, email);
            c.state()
        };
        let (tx, _) = watch::channel(initial);
        let updates = Arc::new(tx);
        let restart = Arc::new(Notify::new());

        let task = tokio::spawn(tick_loop(
            countdown.clone(),
            updates.clone(),
            restart.clone(),
        ));

        Self {
            countdown,
            updates,
            restart,
            task: Some(task),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConfirmationState> {
        self.updates.subscribe()
    }

    pub fn state(&self) -> ConfirmationState {
        self.countdown.lock().state()
    }

    /// Redirect now. The view closes one full tick later.
    pub fn join_now(&self) {
        let waiting = matches!(
            self.countdown.lock().phase(),
            CountdownPhase::Counting | CountdownPhase::Cancelled
        );
        self.apply(Countdown::join_now);
        if waiting {
            self.restart.notify_one();
        }
    }

    pub fn cancel(&self) {
        self.apply(Countdown::cancel);
    }

    pub fn close(&mut self) {
        self.stop();
        self.apply(Countdown::close);
    }

    fn apply(&self, action: impl FnOnce(&mut Countdown)) {
        let state = {
            let mut c = self.countdown.lock();
            action(&mut c);
            c.state()
        };
        publish(&self.updates, state);
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ConfirmationTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_loop(
    countdown: CountdownState,
    updates: Arc<watch::Sender<ConfirmationState>>,
    restart: Arc<Notify>,
) {
    let mut interval = time::interval_at(Instant::now() + TICK, TICK);

    loop {
        // A manual redirect landing on a tick boundary must still wait a full tick.
        tokio::select! {
            biased;
            _ = restart.notified() => {
                interval.reset();
                continue;
            }
            _ = interval.tick() => {}
        }

        let (state, running) = {
            let mut c = countdown.lock();
            c.tick();
            (c.state(), c.is_running())
        };
        publish(&updates, state);

        if !running {
            log::debug!("Confirmation ticker finished");
            break;
        }
    }
}

/// Notify subscribers only when the snapshot differs, so a frozen countdown
/// stays quiet.
fn publish(updates: &watch::Sender<ConfirmationState>, state: ConfirmationState) {
    updates.send_if_modified(|current| {
        if *current == state {
            return false;
        }
        *current = state;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::countdown::tests::RecordingOpener;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const URL: &str = "https://chat.example/abc";

    fn countdown(opener: &RecordingOpener, closes: &Arc<AtomicUsize>) -> CountdownState {
        let counter = closes.clone();
        Arc::new(Mutex::new(Countdown::new(5, opener.clone()).with_on_close(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_redirect_and_close() {
        let opener = RecordingOpener::default();
        let closes = Arc::new(AtomicUsize::new(0));
        let timer = ConfirmationTimer::open(countdown(&opener, &closes), Some(URL.into()), "a@b.com");
        let updates = timer.subscribe();

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(updates.borrow().countdown_seconds, 3);

        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(timer.state().phase, CountdownPhase::Redirecting);
        assert_eq!(*opener.0.lock(), vec![URL.to_string()]);

        time::sleep(Duration::from_secs(1)).await;
        let state = updates.borrow().clone();
        assert_eq!(state.phase, CountdownPhase::Closed);
        assert!(!state.visible);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_pending_ticks() {
        let opener = RecordingOpener::default();
        let closes = Arc::new(AtomicUsize::new(0));
        let mut timer =
            ConfirmationTimer::open(countdown(&opener, &closes), Some(URL.into()), "a@b.com");

        time::sleep(Duration::from_millis(1500)).await;
        timer.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(30)).await;
        assert!(opener.0.lock().is_empty());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert_eq!(timer.state().phase, CountdownPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_stops_ticks() {
        let opener = RecordingOpener::default();
        let closes = Arc::new(AtomicUsize::new(0));
        let shared = countdown(&opener, &closes);
        let timer = ConfirmationTimer::open(shared.clone(), Some(URL.into()), "a@b.com");

        time::sleep(Duration::from_millis(1500)).await;
        drop(timer);

        time::sleep(Duration::from_secs(30)).await;
        assert!(opener.0.lock().is_empty());
        assert_eq!(shared.lock().seconds(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_then_join_now() {
        let opener = RecordingOpener::default();
        let closes = Arc::new(AtomicUsize::new(0));
        let timer = ConfirmationTimer::open(countdown(&opener, &closes), Some(URL.into()), "a@b.com");

        time::sleep(Duration::from_millis(2500)).await;
        timer.cancel();
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(timer.state().phase, CountdownPhase::Cancelled);
        assert!(opener.0.lock().is_empty());

        timer.join_now();
        assert_eq!(timer.state().phase, CountdownPhase::Redirecting);
        time::sleep(Duration::from_millis(900)).await;
        assert_eq!(timer.state().phase, CountdownPhase::Redirecting);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(timer.state().phase, CountdownPhase::Closed);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_publishes_nothing_further() {
        let opener = RecordingOpener::default();
        let closes = Arc::new(AtomicUsize::new(0));
        let timer = ConfirmationTimer::open(countdown(&opener, &closes), Some(URL.into()), "a@b.com");
        let mut updates = timer.subscribe();

        time::sleep(Duration::from_millis(1500)).await;
        timer.cancel();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().phase, CountdownPhase::Cancelled);

        let mut wakeups = 0;
        let quiet = time::sleep(Duration::from_secs(10));
        tokio::pin!(quiet);
        loop {
            tokio::select! {
                _ = &mut quiet => break,
                changed = updates.changed() => {
                    changed.unwrap();
                    updates.borrow_and_update();
                    wakeups += 1;
                }
            }
        }
        assert_eq!(wakeups, 0);
        assert_eq!(timer.state().phase, CountdownPhase::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn join_now_on_a_tick_boundary_still_waits_a_full_tick() {
        let opener = RecordingOpener::default();
        let closes = Arc::new(AtomicUsize::new(0));
        let timer = ConfirmationTimer::open(countdown(&opener, &closes), Some(URL.into()), "a@b.com");

        time::sleep(Duration::from_secs(2)).await;
        timer.join_now();
        assert_eq!(timer.state().phase, CountdownPhase::Redirecting);
        assert_eq!(*opener.0.lock(), vec![URL.to_string()]);

        time::sleep(Duration::from_millis(900)).await;
        assert_eq!(timer.state().phase, CountdownPhase::Redirecting);
        assert_eq!(closes.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(timer.state().phase, CountdownPhase::Closed);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
