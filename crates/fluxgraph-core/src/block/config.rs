//! Per-port configuration and the sparse, self-extending port map.

use thiserror::Error;

/// Policy for one input port, set once before the block becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPortConfig {
    /// Bytes per logical item. Must be at least 1.
    pub item_size: usize,
    /// Minimum items the port window must expose before work runs.
    pub reserve_items: usize,
    /// Maximum items exposed per invocation, 0 = unbounded.
    pub maximum_items: usize,
    /// Hint that output may be produced in place into this input.
    pub inline_buffer: bool,
    /// Items staged on the queue before the first invocation.
    pub preload_items: usize,
}

impl Default for InputPortConfig {
    fn default() -> Self {
        Self {
            item_size: 1,
            reserve_items: 1,
            maximum_items: 0,
            inline_buffer: false,
            preload_items: 0,
        }
    }
}

/// Policy for one output port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPortConfig {
    /// Bytes per logical item. Must be at least 1.
    pub item_size: usize,
    /// Minimum items a fresh output buffer must hold.
    pub reserve_items: usize,
    /// Maximum items per buffer, 0 = unbounded.
    pub maximum_items: usize,
}

impl Default for OutputPortConfig {
    fn default() -> Self {
        Self {
            item_size: 1,
            reserve_items: 1,
            maximum_items: 0,
        }
    }
}

/// Trait implemented by both port config kinds so [`PortConfigs`] can
/// validate writes uniformly.
pub trait PortConfig: Clone + Default {
    /// Bytes per logical item on this port.
    fn item_size(&self) -> usize;
}

impl PortConfig for InputPortConfig {
    fn item_size(&self) -> usize {
        self.item_size
    }
}

impl PortConfig for OutputPortConfig {
    fn item_size(&self) -> usize {
        self.item_size
    }
}

/// Port configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortConfigError {
    /// Config was written with a zero item size.
    #[error("item_size must be at least 1 for port {index}")]
    ItemSizeMustBeNonZero {
        /// Port index the write targeted.
        index: usize,
    },
}

/// Sparse, self-extending sequence of per-port configs.
///
/// Reading past the end returns the entry at the highest configured
/// index, so a block can configure port 0 once and have every
/// lazily-discovered port inherit the same policy. Writing past the
/// end replicates the last entry forward to fill the gap, then
/// overwrites the target index.
#[derive(Debug, Clone)]
pub struct PortConfigs<T: PortConfig> {
    entries: Vec<T>,
}

impl<T: PortConfig> Default for PortConfigs<T> {
    fn default() -> Self {
        Self {
            entries: vec![T::default()],
        }
    }
}

impl<T: PortConfig> PortConfigs<T> {
    /// Resolves the config for `index`, falling back to the highest
    /// configured entry. Never fails.
    pub fn get(&self, index: usize) -> &T {
        // entries is never empty: default() seeds index 0.
        self.entries
            .get(index)
            .or_else(|| self.entries.last())
            .expect("port config map is never empty")
    }

    /// Overwrites the config at `index`, replicating the last entry
    /// forward first if `index` is past the current extent.
    pub fn set(&mut self, index: usize, config: T) -> Result<(), PortConfigError> {
        if config.item_size() == 0 {
            return Err(PortConfigError::ItemSizeMustBeNonZero { index });
        }
        if index >= self.entries.len() {
            let fill = self
                .entries
                .last()
                .cloned()
                .unwrap_or_default();
            self.entries.resize(index + 1, fill);
        }
        self.entries[index] = config;
        Ok(())
    }

    /// Number of explicitly configured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A freshly constructed map still holds the default port-0 entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
