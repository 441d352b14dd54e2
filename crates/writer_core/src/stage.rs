use std::fmt;

/// Progress of one publish run. Transitions are strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PipelineStage {
    #[default]
    NoToken,
    TokenCached,
    CoverUploaded,
    DraftCreated,
    Published,
    StatusChecked,
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("cannot move from {from} to {to}")]
pub struct StageTransitionError {
    pub from: PipelineStage,
    pub to: PipelineStage,
}

impl PipelineStage {
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineStage::NoToken => Some(PipelineStage::TokenCached),
            PipelineStage::TokenCached => Some(PipelineStage::CoverUploaded),
            PipelineStage::CoverUploaded => Some(PipelineStage::DraftCreated),
            PipelineStage::DraftCreated => Some(PipelineStage::Published),
            PipelineStage::Published => Some(PipelineStage::StatusChecked),
            PipelineStage::StatusChecked => None,
        }
    }

    /// Moves to `to` if it is the immediate successor; otherwise leaves `self` untouched.
    pub fn advance(&mut self, to: PipelineStage) -> Result<(), StageTransitionError> {
        if self.next() == Some(to) {
            *self = to;
            Ok(())
        } else {
            Err(StageTransitionError { from: *self, to })
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::NoToken => "no token",
            PipelineStage::TokenCached => "token cached",
            PipelineStage::CoverUploaded => "cover uploaded",
            PipelineStage::DraftCreated => "draft created",
            PipelineStage::Published => "published",
            PipelineStage::StatusChecked => "status checked",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
