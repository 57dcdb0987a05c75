/// Block lifecycle state, observable by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLifecycle {
    /// Constructed, not yet activated by the topology.
    Init,
    /// Schedulable.
    Active,
    /// Deactivated by the topology, may become active again.
    Inactive,
    /// Terminal. Never reversed.
    Done,
}

impl BlockLifecycle {
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}
