//! Progress notification ports
//!
//! Callbacks for reporting progress while debates and councils run.
//! Implementations live in the presentation layer. Every callback is
//! synchronous and defaults to a no-op.

use colloquy_domain::{
    Agent, Conclusion, CouncilSynthesis, Debate, Ranking, Response, Side, Turn,
};

/// Debate progress callbacks
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a round starts (or resumes) with `first` opening it
    fn on_round_start(&self, _debate: &Debate, _round: u32, _first: Side) {}

    /// Called before an agent is asked for a turn
    fn on_turn_start(&self, _debate: &Debate, _agent: &Agent, _number: u32) {}

    /// Called once per persisted turn
    fn on_turn_complete(&self, _debate: &Debate, _turn: &Turn) {}

    /// Called after the consensus check ran its confirming call
    fn on_consensus_check(&self, _debate: &Debate, _confirmed: bool) {}

    /// Called when the conclusion protocol (votes + summary) starts
    fn on_conclusion_start(&self, _debate: &Debate, _round: u32) {}

    /// Called once per appended conclusion
    fn on_conclusion(&self, _debate: &Debate, _conclusion: &Conclusion) {}
}

/// No-op debate progress notifier
pub struct NoDebateProgress;

impl DebateProgressNotifier for NoDebateProgress {}

/// The three council stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouncilStage {
    Responses,
    Rankings,
    Synthesis,
}

impl CouncilStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouncilStage::Responses => "responses",
            CouncilStage::Rankings => "rankings",
            CouncilStage::Synthesis => "synthesis",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            CouncilStage::Responses => 1,
            CouncilStage::Rankings => 2,
            CouncilStage::Synthesis => 3,
        }
    }
}

impl std::fmt::Display for CouncilStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Council progress callbacks
pub trait CouncilProgressNotifier: Send + Sync {
    /// Called when a stage starts with `total_tasks` concurrent calls
    fn on_stage_start(&self, _stage: CouncilStage, _total_tasks: usize) {}

    /// Called once per collected Stage-1 response
    fn on_response(&self, _member: &Agent, _response: &Response) {}

    /// Called once per collected Stage-2 ranking
    fn on_ranking(&self, _member: &Agent, _ranking: &Ranking) {}

    /// Called when a member's call failed and the member was dropped
    fn on_member_failed(&self, _stage: CouncilStage, _member: &Agent, _error: &str) {}

    /// Called once per appended synthesis
    fn on_synthesis(&self, _synthesis: &CouncilSynthesis) {}

    /// Called when a stage completes
    fn on_stage_complete(&self, _stage: CouncilStage) {}
}

/// No-op council progress notifier
pub struct NoCouncilProgress;

impl CouncilProgressNotifier for NoCouncilProgress {}
