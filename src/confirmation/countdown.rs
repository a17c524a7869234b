use serde::Serialize;

pub const DEFAULT_COUNTDOWN_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountdownPhase {
    Counting,
    /// Auto redirect stopped; the manual redirect is still available.
    Cancelled,
    /// The target has been opened; closes on the next tick.
    Redirecting,
    /// Not shown. Also the idle phase before the first `open`.
    Closed,
}

/// Snapshot of the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationState {
    pub phase: CountdownPhase,
    pub visible: bool,
    pub target_url: Option<String>,
    pub email: String,
    pub countdown_seconds: u32,
    pub redirecting: bool,
}

/// Where a redirect goes.
pub trait UrlOpener: Send {
    fn open_url(&mut self, url: &str);
}

/// Opens URLs in the desktop's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open_url(&mut self, url: &str) {
        if let Err(e) = open::that_detached(url) {
            log::error!("Failed to open {}: {}", url, e);
        }
    }
}

type CloseCallback = Box<dyn FnMut() + Send>;

/// Auto-redirect countdown shown after a successful signup. Driven one
/// second at a time by [`Countdown::tick`].
pub struct Countdown {
    phase: CountdownPhase,
    delay: u32,
    seconds: u32,
    target_url: Option<String>,
    email: String,
    opener: Box<dyn UrlOpener>,
    on_close: Option<CloseCallback>,
}

impl Countdown {
    pub fn new(delay: u32, opener: impl UrlOpener + 'static) -> Self {
        Self {
            phase: CountdownPhase::Closed,
            delay,
            seconds: delay,
            target_url: None,
            email: String::new(),
            opener: Box::new(opener),
            on_close: None,
        }
    }

    /// Runs every time the view closes, whichever way it closes. Must not
    /// touch the countdown itself.
    pub fn with_on_close(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Whether the view still expects ticks.
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            CountdownPhase::Counting | CountdownPhase::Cancelled | CountdownPhase::Redirecting
        )
    }

    pub fn state(&self) -> ConfirmationState {
        ConfirmationState {
            phase: self.phase,
            visible: self.phase != CountdownPhase::Closed,
            target_url: self.target_url.clone(),
            email: self.email.clone(),
            countdown_seconds: self.seconds,
            redirecting: self.phase == CountdownPhase::Redirecting,
        }
    }

    pub fn open(&mut self, target_url: Option<String>, email: impl Into<String>) {
        self.target_url = target_url;
        self.email = email.into();
        self.seconds = self.delay;
        self.phase = CountdownPhase::Counting;
        log::debug!("Confirmation opened, redirect in {}s", self.seconds);

        if self.seconds == 0 {
            self.redirect();
        }
    }

    pub fn tick(&mut self) -> CountdownPhase {
        match self.phase {
            CountdownPhase::Counting => {
                self.seconds = self.seconds.saturating_sub(1);
                if self.seconds == 0 {
                    self.redirect();
                }
            }
            CountdownPhase::Redirecting => self.finish(),
            CountdownPhase::Cancelled | CountdownPhase::Closed => {}
        }
        self.phase
    }

    /// The "join now" action.
    pub fn join_now(&mut self) {
        if matches!(
            self.phase,
            CountdownPhase::Counting | CountdownPhase::Cancelled
        ) {
            self.redirect();
        }
    }

    pub fn cancel(&mut self) {
        if self.phase == CountdownPhase::Counting {
            log::debug!("Auto redirect cancelled at {}s", self.seconds);
            self.seconds = 0;
            self.phase = CountdownPhase::Cancelled;
        }
    }

    /// Close without redirecting.
    pub fn close(&mut self) {
        if self.phase != CountdownPhase::Closed {
            self.finish();
        }
    }

    fn redirect(&mut self) {
        self.phase = CountdownPhase::Redirecting;
        match self.target_url.as_deref() {
            Some(url) => {
                log::info!("Redirecting to {}", url);
                self.opener.open_url(url);
            }
            None => log::warn!("No group URL to redirect to"),
        }
    }

    fn finish(&mut self) {
        self.phase = CountdownPhase::Closed;
        self.seconds = self.delay;
        self.target_url = None;
        self.email.clear();
        if let Some(callback) = self.on_close.as_mut() {
            callback();
        }
    }
}
