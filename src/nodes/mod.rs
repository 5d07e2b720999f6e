//! Concrete pipeline node implementations.

pub mod external_command;
pub mod loop_input;

pub use external_command::ExternalCommandNode;
pub use loop_input::LoopInputNode;
