//! The edit/approve state holder for one analysis.

use std::fmt;

use coach_analysis_core::{AnalysisField, ApprovedAnalysis, FieldValue, NormalizedAnalysis};
use coach_analysis_normalizer::{NormalizeOptions, normalize_with};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::request::{RequestGate, RequestToken};

/// Whether a session is showing or editing its analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Viewing => "viewing",
            Self::Editing => "editing",
        })
    }
}

/// Holds one client's analysis through load, edit and approve.
///
/// The session keeps the raw response, the committed record (the normalized
/// response, replaced on every approve) and a working copy that edits apply
/// to. Edits never touch the committed record until [`approve`] is called;
/// [`close`] throws them away.
///
/// [`approve`]: AnalysisSession::approve
/// [`close`]: AnalysisSession::close
///
/// # Examples
///
/// ```
/// use coach_analysis_core::{AnalysisField, FieldValue};
/// use coach_analysis_session::{AnalysisSession, EditMode};
///
/// let mut session = AnalysisSession::for_client("C001");
/// session.load(Some(r#"{"status": "On Track", "summary": "Solid week"}"#.to_string()));
///
/// session.begin_edit();
/// session.update_field(AnalysisField::Reasoning, FieldValue::from("Strong week overall"));
/// let approved = session.approve().unwrap();
///
/// assert_eq!(approved.client_id.as_deref(), Some("C001"));
/// assert_eq!(approved.analysis.reasoning, "Strong week overall");
/// assert_eq!(session.mode(), EditMode::Viewing);
/// ```
#[derive(Debug, Default, Clone)]
pub struct AnalysisSession {
    client_id: Option<String>,
    options: NormalizeOptions,
    raw: Option<String>,
    committed: Option<NormalizedAnalysis>,
    working: Option<NormalizedAnalysis>,
    mode: EditMode,
    requests: RequestGate,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session whose approvals carry `client_id`.
    pub fn for_client(client_id: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            ..Self::default()
        }
    }

    /// Sets the options used by subsequent loads.
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// The raw response most recently loaded.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Normalizes `raw` and restarts the session on the result.
    ///
    /// Any in-progress edit is dropped. With no response the session holds
    /// no analysis and every edit operation becomes a no-op.
    pub fn load(&mut self, raw: Option<String>) {
        let normalized = normalize_with(raw.as_deref(), &self.options);
        debug!(
            client = self.client_id.as_deref().unwrap_or("-"),
            loaded = normalized.is_some(),
            "loaded analysis response"
        );
        self.raw = raw;
        self.working = normalized.clone();
        self.committed = normalized;
        self.mode = EditMode::Viewing;
    }

    /// Issues a token for a new analysis request, superseding older ones.
    pub fn begin_request(&mut self) -> RequestToken {
        let token = self.requests.issue();
        debug!(
            client = self.client_id.as_deref().unwrap_or("-"),
            %token,
            "issued analysis request"
        );
        token
    }

    /// Loads `raw` if `token` belongs to the latest request.
    ///
    /// Returns `false` and leaves the session untouched for a stale token.
    pub fn apply_response(&mut self, token: RequestToken, raw: Option<String>) -> bool {
        if !self.requests.is_current(token) {
            warn!(
                client = self.client_id.as_deref().unwrap_or("-"),
                %token,
                latest = ?self.requests.latest().map(RequestToken::sequence),
                "dropping response from superseded request"
            );
            return false;
        }
        self.load(raw);
        true
    }

    /// Enters edit mode. No-op when nothing is loaded.
    pub fn begin_edit(&mut self) {
        if self.committed.is_none() {
            return;
        }
        if self.working.is_none() {
            self.working = self.committed.clone();
        }
        self.mode = EditMode::Editing;
    }

    /// Replaces one field of the working copy.
    ///
    /// Returns `false` when there is no working copy. Confidence edits are
    /// parsed as integers and are not range checked.
    pub fn update_field(&mut self, field: AnalysisField, value: FieldValue) -> bool {
        let Some(working) = self.working.as_mut() else {
            return false;
        };
        working.set_field(field, value);
        true
    }

    /// Commits the working copy and leaves edit mode.
    ///
    /// Returns the approval payload, or `None` when there is nothing to
    /// approve.
    pub fn approve(&mut self) -> Option<ApprovedAnalysis> {
        self.mode = EditMode::Viewing;
        let analysis = self.working.clone()?;
        self.committed = Some(analysis.clone());
        info!(
            client = self.client_id.as_deref().unwrap_or("-"),
            status = %analysis.status,
            confidence = analysis.confidence_score,
            "analysis approved"
        );
        Some(ApprovedAnalysis::new(self.client_id.clone(), analysis))
    }

    /// Leaves edit mode and discards unapproved edits.
    pub fn close(&mut self) {
        self.mode = EditMode::Viewing;
        self.working = None;
    }

    /// The record to show: the working copy if any, else the committed one.
    pub fn display(&self) -> Option<&NormalizedAnalysis> {
        self.working.as_ref().or(self.committed.as_ref())
    }

    /// The last committed record.
    pub fn committed(&self) -> Option<&NormalizedAnalysis> {
        self.committed.as_ref()
    }
}
