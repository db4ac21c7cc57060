//! PipelineStage / PipelineState - Orchestrator progress

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A component stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Analysis,
    Script,
    VisualPlan,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Analysis => write!(f, "analysis"),
            PipelineStage::Script => write!(f, "script"),
            PipelineStage::VisualPlan => write!(f, "visual_plan"),
        }
    }
}

/// Linear pipeline state machine.
///
/// `Received -> Analyzed -> Scripted -> Planned -> Done`, with `Failed`
/// absorbing from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "stage")]
pub enum PipelineState {
    Received,
    Analyzed,
    Scripted,
    Planned,
    Done,
    Failed(PipelineStage),
}

impl PipelineState {
    /// The stage whose component runs to leave this state
    pub fn pending_stage(self) -> Option<PipelineStage> {
        match self {
            PipelineState::Received => Some(PipelineStage::Analysis),
            PipelineState::Analyzed => Some(PipelineStage::Script),
            PipelineState::Scripted => Some(PipelineStage::VisualPlan),
            PipelineState::Planned | PipelineState::Done | PipelineState::Failed(_) => None,
        }
    }

    /// Move to the next state. Terminal states stay where they are.
    pub fn advance(self) -> Self {
        match self {
            PipelineState::Received => PipelineState::Analyzed,
            PipelineState::Analyzed => PipelineState::Scripted,
            PipelineState::Scripted => PipelineState::Planned,
            PipelineState::Planned => PipelineState::Done,
            terminal => terminal,
        }
    }

    /// Fail while running the pending stage
    pub fn fail(self, stage: PipelineStage) -> Self {
        match self {
            PipelineState::Done | PipelineState::Failed(_) => self,
            _ => PipelineState::Failed(stage),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Received => write!(f, "RECEIVED"),
            PipelineState::Analyzed => write!(f, "ANALYZED"),
            PipelineState::Scripted => write!(f, "SCRIPTED"),
            PipelineState::Planned => write!(f, "PLANNED"),
            PipelineState::Done => write!(f, "DONE"),
            PipelineState::Failed(stage) => write!(f, "FAILED({})", stage),
        }
    }
}
