//! Client roster and overview statistics.
//!
//! A [`Roster`] is the ordered list of coached clients shown on the
//! dashboard. Rosters load from JSON (an array of clients, or an object with
//! a `clients` array) or YAML, and are validated on load.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::{ValidationError, validate_roster};

/// One coached client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Stable identifier sent to the analysis service (e.g. `"C001"`).
    pub id: String,
    pub name: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: String,
    pub age: u32,
    /// Training goal (e.g. "Muscle Building").
    pub goal: String,
    /// Human-readable recency of the last session ("Yesterday", "3 days ago").
    pub last_session: String,
    /// Goal progress in percent.
    pub progress: u32,
    /// Average heart rate in bpm.
    pub heart_rate: u32,
    pub workouts_completed: u32,
}

/// Errors raised while loading a roster.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid roster: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterDocument {
    List(Vec<Client>),
    Wrapped { clients: Vec<Client> },
}

impl From<RosterDocument> for Roster {
    fn from(doc: RosterDocument) -> Self {
        match doc {
            RosterDocument::List(clients) | RosterDocument::Wrapped { clients } => {
                Self { clients }
            }
        }
    }
}

/// Ordered list of clients.
///
/// # Examples
///
/// ```
/// use coach_analysis_core::Roster;
///
/// let roster = Roster::demo();
/// assert_eq!(roster.len(), 4);
/// assert_eq!(roster.find("C002").unwrap().name, "Mike Chen");
///
/// let overview = roster.overview();
/// assert_eq!(overview.total_clients, 4);
/// assert_eq!(overview.total_workouts, 90);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub clients: Vec<Client>,
}

impl Roster {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    /// Parses and validates a JSON roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Json`] on malformed input and
    /// [`RosterError::Invalid`] when validation fails.
    pub fn from_json_str(raw: &str) -> Result<Self, RosterError> {
        let doc: RosterDocument = serde_json::from_str(raw)?;
        Self::checked(doc.into())
    }

    /// Parses and validates a YAML roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Yaml`] on malformed input and
    /// [`RosterError::Invalid`] when validation fails.
    pub fn from_yaml_str(raw: &str) -> Result<Self, RosterError> {
        let doc: RosterDocument = serde_yaml::from_str(raw)?;
        Self::checked(doc.into())
    }

    /// Loads a roster file, choosing YAML for `.yaml`/`.yml` extensions and
    /// JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Io`] if the file cannot be read, plus the
    /// parse and validation errors of the format-specific loaders.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
            });
        if is_yaml {
            Self::from_yaml_str(&raw)
        } else {
            Self::from_json_str(&raw)
        }
    }

    fn checked(roster: Self) -> Result<Self, RosterError> {
        if let Some(err) = validate_roster(&roster).into_iter().next() {
            return Err(err.into());
        }
        Ok(roster)
    }

    /// The four sample clients the dashboard ships with.
    pub fn demo() -> Self {
        let client = |id: &str,
                      name: &str,
                      avatar: &str,
                      age: u32,
                      goal: &str,
                      last_session: &str,
                      progress: u32,
                      heart_rate: u32,
                      workouts_completed: u32| Client {
            id: id.to_string(),
            name: name.to_string(),
            avatar: format!("https://images.unsplash.com/{avatar}?w=150&h=150&fit=crop&crop=face"),
            age,
            goal: goal.to_string(),
            last_session: last_session.to_string(),
            progress,
            heart_rate,
            workouts_completed,
        };

        Self::new(vec![
            client(
                "C001",
                "Sarah Johnson",
                "photo-1534528741775-53994a69daeb",
                28,
                "Muscle Building",
                "2 days ago",
                72,
                68,
                24,
            ),
            client(
                "C002",
                "Mike Chen",
                "photo-1507003211169-0a1dd7228f2d",
                35,
                "Weight Loss",
                "Yesterday",
                85,
                72,
                36,
            ),
            client(
                "C003",
                "Emily Davis",
                "photo-1438761681033-6461ffad8d80",
                42,
                "Endurance Training",
                "Today",
                58,
                65,
                18,
            ),
            client(
                "C004",
                "James Wilson",
                "photo-1500648767791-00dcc994a43e",
                31,
                "Flexibility",
                "3 days ago",
                45,
                70,
                12,
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Finds a client by identifier.
    pub fn find(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    /// Aggregates the statistics shown in the dashboard overview.
    pub fn overview(&self) -> RosterOverview {
        let total_clients = self.clients.len();
        let mean = |sum: u64| -> u32 {
            if total_clients == 0 {
                0
            } else {
                (sum as f64 / total_clients as f64).round() as u32
            }
        };

        let progress_sum = self.clients.iter().map(|c| u64::from(c.progress)).sum();
        let heart_rate_sum = self.clients.iter().map(|c| u64::from(c.heart_rate)).sum();
        let total_workouts = self
            .clients
            .iter()
            .map(|c| u64::from(c.workouts_completed))
            .sum();

        RosterOverview {
            total_clients,
            average_progress: mean(progress_sum),
            average_heart_rate: mean(heart_rate_sum),
            total_workouts,
        }
    }
}

/// Dashboard overview statistics for a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterOverview {
    pub total_clients: usize,
    /// Mean goal progress, rounded to a whole percent.
    pub average_progress: u32,
    /// Mean heart rate, rounded to a whole bpm.
    pub average_heart_rate: u32,
    pub total_workouts: u64,
}
