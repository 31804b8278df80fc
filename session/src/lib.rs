//! Edit/approve sessions for coaching analyses.
//!
//! An [`AnalysisSession`] owns one client's analysis: it normalizes the raw
//! webhook response on [`load`](AnalysisSession::load), lets a coach edit a
//! working copy, and commits it on [`approve`](AnalysisSession::approve).
//! [`AnalysisClient`] fetches responses from the analysis webhook and
//! [`CoachConfig`] describes where that webhook lives.
//!
//! Responses are tied to the request that produced them through
//! [`RequestToken`]s, so a slow response for a superseded request never
//! overwrites a newer one.

pub mod config;
pub mod error;
pub mod request;
pub mod session;
pub mod transport;

pub use config::{CoachConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_WEBHOOK_URL, WebhookConfig};
pub use error::{Result, SessionError};
pub use request::{RequestGate, RequestToken};
pub use session::{AnalysisSession, EditMode};
pub use transport::AnalysisClient;
