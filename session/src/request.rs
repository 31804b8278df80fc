//! Tokens that tie responses to the request that produced them.
//!
//! Only the most recently issued token is current. A response carrying an
//! older token belongs to a superseded request and must be dropped.

use std::fmt;

/// Identifies one analysis request issued by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request tokens and tracks which one is current.
///
/// # Examples
///
/// ```
/// use coach_analysis_session::RequestGate;
///
/// let mut gate = RequestGate::default();
/// let first = gate.issue();
/// let second = gate.issue();
/// assert!(!gate.is_current(first));
/// assert!(gate.is_current(second));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RequestGate {
    latest: u64,
}

impl RequestGate {
    /// Issues a new token, superseding every earlier one.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest != 0 && token.0 == self.latest
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        (self.latest != 0).then_some(RequestToken(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_gate_has_no_current_token() {
        let gate = RequestGate::default();
        assert_eq!(gate.latest(), None);
    }

    #[test]
    fn test_tokens_are_ordered() {
        let mut gate = RequestGate::default();
        let a = gate.issue();
        let b = gate.issue();
        assert!(a < b);
        assert_eq!(gate.latest(), Some(b));
        assert_eq!(b.to_string(), "#2");
    }
}
