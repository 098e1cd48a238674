//! Homework review status relay.
//!
//! Polls the homework status API on behalf of a single user and reports
//! changes of the most recent submission through a [`Notifier`]:
//!
//! - `client` - [`StatusClient`] trait and the reqwest-backed [`HttpStatusClient`]
//! - `validator` - checks the payload is a mapping with a `homeworks` list
//! - `verdict` - maps status codes to verdict sentences and renders messages
//! - `notifier` - the [`Notifier`] seam implemented by chat transports
//! - `poller` - [`PollLoop`], the only place that recovers from errors
//!
//! # Example
//!
//! ```ignore
//! use homework_core::{Credentials, HttpStatusClient, PollCycleState, PollLoop, PollerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secrets = Credentials::from_env().require()?;
//!     let config = PollerConfig::default();
//!     let client = HttpStatusClient::new(config.clone(), secrets.practicum_token)?;
//!     let notifier = MyNotifier::new(secrets.chat_id);
//!
//!     let mut poller = PollLoop::new(client, notifier, config.retry_interval, PollCycleState::starting_now());
//!     poller.run().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod notifier;
pub mod poller;
pub mod validator;
pub mod verdict;

pub use client::{HttpStatusClient, StatusClient};
pub use config::{Credentials, PollerConfig, Secrets};
pub use error::{ClientError, ConfigError, CycleError, DeliveryError, Result, ShapeError, TranslateError};
pub use notifier::Notifier;
pub use poller::{CycleOutcome, PollCycleState, PollLoop, FAILURE_PREFIX};
pub use validator::{current_date, extract_homeworks};
pub use verdict::{render_change_message, HomeworkRecord, Verdict};
