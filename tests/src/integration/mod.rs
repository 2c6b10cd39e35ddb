//! Cross-subsystem integration flows.

pub mod pipeline_flows;
pub mod rotation_flows;
pub mod runtime_flows;
