//! The poll loop: fetch, validate, translate, notify, sleep.
//!
//! This is the single recovery boundary. Every error from the components is
//! caught here, logged, and (unless it is itself a delivery failure) sent to
//! the chat as a failure message. Nothing here ends the loop.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info, warn};

use crate::client::StatusClient;
use crate::error::{self, CycleError, DeliveryError};
use crate::notifier::Notifier;
use crate::validator::{current_date, extract_homeworks};
use crate::verdict::render_change_message;

/// Prefix for messages reporting a failed cycle.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы: ";

/// State carried between cycles. Lives in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCycleState {
    /// Text of the last message that was delivered.
    pub last_notified_message: String,
    /// Unix seconds passed as `from_date` on the next fetch.
    pub since_timestamp: i64,
}

impl PollCycleState {
    /// Fresh state polling from `since_timestamp`.
    pub fn new(since_timestamp: i64) -> Self {
        Self {
            last_notified_message: String::new(),
            since_timestamp,
        }
    }

    /// Fresh state polling from the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(unix_now())
    }
}

/// What a single cycle ended up doing.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The payload listed no homeworks; nothing to report.
    NoHomeworks,
    /// The rendered message equals the last one sent.
    Suppressed,
    /// A status-change message was delivered.
    Notified(String),
    /// A status-change message was rendered but could not be delivered.
    DeliveryFailed(DeliveryError),
    /// The cycle failed before a status message could be rendered.
    Failed(CycleError),
}

/// Drives the relay cycle forever.
pub struct PollLoop<C, N> {
    client: C,
    notifier: N,
    retry_interval: Duration,
    state: PollCycleState,
}

impl<C: StatusClient, N: Notifier> PollLoop<C, N> {
    /// Creates a loop starting from `state`.
    pub fn new(client: C, notifier: N, retry_interval: Duration, state: PollCycleState) -> Self {
        Self {
            client,
            notifier,
            retry_interval,
            state,
        }
    }

    /// Current cycle state.
    pub fn state(&self) -> &PollCycleState {
        &self.state
    }

    /// The notifier, mostly useful to inspect fakes in tests.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run cycles until the process is stopped.
    pub async fn run(&mut self) {
        info!(
            retry_interval_secs = self.retry_interval.as_secs(),
            since = self.state.since_timestamp,
            "starting homework status poller"
        );

        loop {
            self.run_once().await;
        }
    }

    /// Run one cycle followed by the retry sleep.
    pub async fn run_once(&mut self) -> CycleOutcome {
        let outcome = self.run_cycle().await;
        debug!(
            retry_interval_secs = self.retry_interval.as_secs(),
            "next request scheduled"
        );
        tokio::time::sleep(self.retry_interval).await;
        outcome
    }

    /// Run one cycle without sleeping.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.check_status().await {
            Ok(outcome) => outcome,
            Err(CycleError::Delivery(e)) => {
                error!(error = %e, "status change could not be delivered");
                CycleOutcome::DeliveryFailed(e)
            }
            Err(e) => {
                error!(error = %e, since = self.state.since_timestamp, "poll cycle failed");
                let message = format!("{}{}", FAILURE_PREFIX, e);
                if let Err(delivery) = self.notify_if_changed(message).await {
                    warn!(error = %delivery, "could not report cycle failure");
                }
                CycleOutcome::Failed(e)
            }
        }
    }

    /// Fetch, validate, translate and notify.
    ///
    /// A delivery error comes back as [`CycleError::Delivery`] after the
    /// timestamp has already advanced; any other error leaves it untouched.
    async fn check_status(&mut self) -> error::Result<CycleOutcome> {
        let payload = self.client.fetch_status(self.state.since_timestamp).await?;
        let homeworks = extract_homeworks(&payload)?;
        let message = homeworks.first().map(render_change_message).transpose()?;

        if let Some(server_now) = current_date(&payload) {
            self.state.since_timestamp = server_now;
        }

        let Some(message) = message else {
            debug!(
                retry_interval_secs = self.retry_interval.as_secs(),
                "status unchanged, no homeworks in response"
            );
            return Ok(CycleOutcome::NoHomeworks);
        };

        Ok(match self.notify_if_changed(message).await? {
            Some(sent) => CycleOutcome::Notified(sent),
            None => CycleOutcome::Suppressed,
        })
    }

    /// Deliver `message` unless it equals the last delivered one.
    ///
    /// Returns the sent text, or `None` when suppressed. The dedupe state only
    /// moves on successful delivery.
    async fn notify_if_changed(
        &mut self,
        message: String,
    ) -> Result<Option<String>, DeliveryError> {
        if message == self.state.last_notified_message {
            debug!("message identical to the last one sent, skipping");
            return Ok(None);
        }

        info!("sending message");
        self.notifier.deliver(&message).await?;
        info!("message sent");

        self.state.last_notified_message = message.clone();
        Ok(Some(message))
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
