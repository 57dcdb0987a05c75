mod buffer_delivered;
mod commit_config;
mod get_snapshot;
mod input_updated;
mod notify_active;
mod notify_inactive;
mod notify_topology;
mod output_updated;
mod payload_delivered;
mod perform_work;
mod set_buffer_affinity;
mod set_input_config;
mod set_interruptible_work;
mod set_output_config;
mod tag_delivered;

#[cfg(test)]
#[path = "../../tests/block/harness.rs"]
mod test_harness;

#[cfg(test)]
#[path = "../../tests/block/accounting.rs"]
mod accounting_tests;

#[cfg(test)]
#[path = "../../tests/block/buffers.rs"]
mod buffer_tests;

#[cfg(test)]
#[path = "../../tests/block/lifecycle.rs"]
mod lifecycle_tests;

#[cfg(test)]
#[path = "../../tests/block/propagation.rs"]
mod propagation_tests;
