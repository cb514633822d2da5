pub mod block;
pub mod fork;
pub mod scoring;
pub mod transition;

pub use block::{create_block_from_parent, BlockConstructor, BlockParams};
pub use fork::{ForkBundle, ForkName, UnknownFork};
pub use scoring::{higher_slot_scoring, ForkChoiceScoring};
pub use transition::{process_block, process_slots, state_transition, StateTransition, TransitionError};
