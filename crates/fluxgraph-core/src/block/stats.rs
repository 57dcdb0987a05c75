/// Cumulative per-port counters, written only by the owning actor.
///
/// Every counter is monotonically non-decreasing. The consumed and
/// produced item counts are the authoritative inputs to tag offset
/// re-basing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStats {
    pub items_consumed: Vec<u64>,
    pub items_produced: Vec<u64>,
    pub tags_produced: Vec<u64>,
    pub msgs_produced: Vec<u64>,
    pub msgs_consumed: Vec<u64>,
}

impl BlockStats {
    /// Grows the input-side counters to cover `port`.
    pub fn ensure_input(&mut self, port: usize) {
        grow(&mut self.items_consumed, port);
        grow(&mut self.msgs_consumed, port);
    }

    /// Grows the output-side counters to cover `port`.
    pub fn ensure_output(&mut self, port: usize) {
        grow(&mut self.items_produced, port);
        grow(&mut self.tags_produced, port);
        grow(&mut self.msgs_produced, port);
    }

    pub fn items_consumed(&self, port: usize) -> u64 {
        self.items_consumed.get(port).copied().unwrap_or(0)
    }

    pub fn items_produced(&self, port: usize) -> u64 {
        self.items_produced.get(port).copied().unwrap_or(0)
    }
}

fn grow(counters: &mut Vec<u64>, port: usize) {
    if counters.len() <= port {
        counters.resize(port + 1, 0);
    }
}
