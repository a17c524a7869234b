use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::api::LeadService;
use crate::config::AppConfig;
use crate::confirmation::{ConfirmationTimer, Countdown, UrlOpener};
use crate::form::{SignupForm, SubmitOutcome};
use crate::page::{self, PageContent};

/// Interactive landing page on a line-oriented terminal.
pub struct Session<S, O> {
    service: S,
    opener: O,
    content: PageContent,
    config: AppConfig,
}

impl<S, O> Session<S, O>
where
    S: LeadService,
    O: UrlOpener + Clone + 'static,
{
    pub fn new(service: S, opener: O, content: PageContent, config: AppConfig) -> Self {
        Self {
            service,
            opener,
            content,
            config,
        }
    }

    /// Show the page and collect leads until input ends. Returns how many
    /// leads were registered.
    pub async fn run<R>(&self, input: R) -> anyhow::Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut form = SignupForm::new(self.config.lead_source.clone());
        let mut registered = 0;

        println!("{}", page::render_page(&self.content));

        loop {
            println!("Email:");
            let Some(email) = lines.next_line().await? else {
                break;
            };
            form.set_email(email.trim_end_matches('\r'));

            println!("Phone with area code:");
            let Some(phone) = lines.next_line().await? else {
                break;
            };
            form.set_phone(&phone);
            println!("  {}", form.state().phone);

            let Some(lead) = form.begin_submit() else {
                if let Some(status) = page::render_form_status(form.state()) {
                    println!("{}", status);
                }
                continue;
            };

            if let Some(status) = page::render_form_status(form.state()) {
                println!("{}", status);
            }
            let result = self.service.submit_lead(&lead).await;

            match form.complete_submit(result) {
                Some(outcome) => {
                    registered += 1;
                    if !self.confirm(outcome, &mut lines).await? {
                        break;
                    }
                }
                None => {
                    if let Some(status) = page::render_form_status(form.state()) {
                        println!("{}", status);
                    }
                }
            }
        }

        Ok(registered)
    }

    /// Show the confirmation view until it closes. Returns false when input
    /// ended while it was open.
    async fn confirm<R>(&self, outcome: SubmitOutcome, lines: &mut Lines<R>) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
    {
        let countdown = Countdown::new(self.config.auto_redirect_secs, self.opener.clone())
            .with_on_close(|| log::info!("Confirmation view closed"));
        let mut timer = ConfirmationTimer::open(
            Arc::new(Mutex::new(countdown)),
            outcome.target_url,
            &outcome.email,
        );
        let mut updates = timer.subscribe();
        println!("{}", page::render_confirmation(&updates.borrow_and_update()));

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        return Ok(true);
                    }
                    let state = updates.borrow_and_update().clone();
                    println!("{}", page::render_confirmation(&state));
                    if !state.visible {
                        return Ok(true);
                    }
                }
                line = lines.next_line() => {
                    match line? {
                        Some(command) => match command.trim() {
                            "j" => timer.join_now(),
                            "c" => timer.cancel(),
                            "x" => timer.close(),
                            other => println!("Unknown command {:?}", other),
                        },
                        None => {
                            timer.close();
                            return Ok(false);
                        }
                    }
                }
            }
        }
    }
}
