//! Transfer pipeline and state management

pub mod chunking;
pub mod crypto;
pub mod metadata;
pub mod progress;
#[cfg(not(target_arch = "wasm32"))]
pub mod queue;
pub mod receive;
pub mod sanitize;
pub mod send;
pub mod state_machine;

pub use metadata::{FileMetadata, TransferMode};
pub use progress::TransferProgress;
#[cfg(not(target_arch = "wasm32"))]
pub use queue::{QueueHandle, TransferQueue};
pub use receive::ReceivePipeline;
pub use send::SendPipeline;
pub use state_machine::{CancelReason, TransferState, TransferStateMachine};
