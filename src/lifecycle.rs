//! Phase tracking for the parent and child flows
//!
//! Neither flow ever retries or goes back, so each phase has at most one
//! successor. The parent can additionally drop into `Failed` while it is
//! still setting up.

use log::debug;
use std::fmt::Debug;

/// A step in one process's flow
pub trait Phase: Copy + Debug + PartialEq {
    /// Tag used when logging transitions
    const ROLE: &'static str;

    /// The phase that follows this one, `None` when terminal
    fn successor(self) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentPhase {
    Init,
    ChannelCreated,
    Split,
    ComputingPartial,
    AwaitingChildResult,
    Combined,
    AwaitingChildExit,
    Done,
    Failed,
}

impl Phase for ParentPhase {
    const ROLE: &'static str = "[Parent]";

    fn successor(self) -> Option<Self> {
        use ParentPhase::*;
        match self {
            Init => Some(ChannelCreated),
            ChannelCreated => Some(Split),
            Split => Some(ComputingPartial),
            ComputingPartial => Some(AwaitingChildResult),
            AwaitingChildResult => Some(Combined),
            Combined => Some(AwaitingChildExit),
            AwaitingChildExit => Some(Done),
            Done | Failed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPhase {
    Split,
    ComputingPartial,
    Transmitting,
    Done,
}

impl Phase for ChildPhase {
    const ROLE: &'static str = "[Child]";

    fn successor(self) -> Option<Self> {
        match self {
            ChildPhase::Split => Some(ChildPhase::ComputingPartial),
            ChildPhase::ComputingPartial => Some(ChildPhase::Transmitting),
            ChildPhase::Transmitting => Some(ChildPhase::Done),
            ChildPhase::Done => None,
        }
    }
}

/// Current phase of one process
#[derive(Debug)]
pub struct Lifecycle<P: Phase> {
    phase: P,
}

impl<P: Phase> Lifecycle<P> {
    pub fn new(start: P) -> Self {
        debug!("{} Phase {:?}", P::ROLE, start);
        Self { phase: start }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    /// Move to the next phase; a terminal phase stays where it is
    pub fn advance(&mut self) -> P {
        if let Some(next) = self.phase.successor() {
            debug!("{} Phase {:?} -> {:?}", P::ROLE, self.phase, next);
            self.phase = next;
        }
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.successor().is_none()
    }
}

impl Lifecycle<ParentPhase> {
    /// Setup failed; only reachable before the process pair exists
    pub fn fail(&mut self) -> ParentPhase {
        if matches!(self.phase, ParentPhase::Init | ParentPhase::ChannelCreated) {
            debug!("[Parent] Phase {:?} -> Failed", self.phase);
            self.phase = ParentPhase::Failed;
        }
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_walks_every_phase_in_order() {
        let mut lifecycle = Lifecycle::new(ParentPhase::Init);
        let mut seen = vec![lifecycle.phase()];
        while !lifecycle.is_terminal() {
            seen.push(lifecycle.advance());
        }
        assert_eq!(
            seen,
            vec![
                ParentPhase::Init,
                ParentPhase::ChannelCreated,
                ParentPhase::Split,
                ParentPhase::ComputingPartial,
                ParentPhase::AwaitingChildResult,
                ParentPhase::Combined,
                ParentPhase::AwaitingChildExit,
                ParentPhase::Done,
            ]
        );
    }

    #[test]
    fn child_always_reaches_done() {
        let mut lifecycle = Lifecycle::new(ChildPhase::Split);
        lifecycle.advance();
        lifecycle.advance();
        assert_eq!(lifecycle.advance(), ChildPhase::Done);
        assert_eq!(lifecycle.advance(), ChildPhase::Done);
    }

    #[test]
    fn failure_only_during_setup() {
        let mut early = Lifecycle::new(ParentPhase::Init);
        early.advance();
        assert_eq!(early.fail(), ParentPhase::Failed);
        assert!(early.is_terminal());

        let mut late = Lifecycle::new(ParentPhase::ComputingPartial);
        assert_eq!(late.fail(), ParentPhase::ComputingPartial);
    }
}
