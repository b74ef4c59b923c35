use std::fmt;

/// Pipeline states for one run.
///
/// ```text
/// Idle → Validated → Synthesized → Compiled → Executed → CleanedUp | Preserved
///   └──────────┴────────────┴────────────┴──────────┴──→ Failed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    /// The design package resolved.
    Validated,
    /// Driver files are written into a fresh workspace.
    Synthesized,
    /// The driver built.
    Compiled,
    /// The driver ran and its listing was collected.
    Executed,
    /// Terminal: workspace removed.
    CleanedUp,
    /// Terminal: workspace kept for inspection.
    Preserved,
    /// Terminal: a step failed.
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CleanedUp | Self::Preserved | Self::Failed)
    }

    /// The only state a successful step may move to from here.
    fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Validated),
            Self::Validated => Some(Self::Synthesized),
            Self::Synthesized => Some(Self::Compiled),
            Self::Compiled => Some(Self::Executed),
            Self::Executed | Self::CleanedUp | Self::Preserved | Self::Failed => None,
        }
    }

    /// Whether `to` is a legal transition from this state.
    pub fn can_advance_to(&self, to: Stage) -> bool {
        match to {
            Self::Failed => !self.is_terminal(),
            Self::CleanedUp | Self::Preserved => *self == Self::Executed,
            _ => self.next() == Some(to),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validated => "validated",
            Self::Synthesized => "synthesized",
            Self::Compiled => "compiled",
            Self::Executed => "executed",
            Self::CleanedUp => "cleaned up",
            Self::Preserved => "preserved",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
