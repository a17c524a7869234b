pub mod countdown;
pub mod timer;

pub use countdown::{
    ConfirmationState, Countdown, CountdownPhase, SystemBrowser, UrlOpener, DEFAULT_COUNTDOWN_SECS,
};
pub use timer::ConfirmationTimer;
