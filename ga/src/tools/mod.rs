//! Tool system for the garment agent
//!
//! Tools are the pluggable capabilities execution steps dispatch to
//! (image-to-3D pipeline, product search). Every tool follows one calling
//! convention - `(action, parameters, context)` - and every tool failure is
//! caught generically by the executor and recorded as a step outcome, never
//! inspected by subtype.

mod context;
mod error;
mod registry;

pub mod builtin;

pub use context::ExecutionContext;
pub use error::ToolError;
pub use registry::{Tool, ToolRegistry};
