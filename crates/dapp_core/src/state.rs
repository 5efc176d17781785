use crate::ProbeVerdict;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Created, navigation not issued yet.
    Idle,
    /// Navigation issued, waiting for the first terminal signal.
    /// `awaiting_certificate` is set once a `ERR_CERT_*` load failure was
    /// seen; from then on only the certificate signal (or the timer) resolves.
    Navigating { awaiting_certificate: bool },
    Resolved(ProbeVerdict),
}

/// State of one probe session. Owned by a single task; advanced only through
/// [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSession {
    target: String,
    phase: Phase,
    ignored_events: usize,
}

impl ProbeSession {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            phase: Phase::Idle,
            ignored_events: 0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn verdict(&self) -> Option<&ProbeVerdict> {
        match &self.phase {
            Phase::Resolved(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, Phase::Resolved(_))
    }

    /// Events dropped because they arrived after resolution or made no sense
    /// in the current phase.
    pub fn ignored_events(&self) -> usize {
        self.ignored_events
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn note_ignored(&mut self) {
        self.ignored_events += 1;
    }
}
