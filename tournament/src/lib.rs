//! Four-player tournament sequencing and the persistence boundary
//!
//! The coordinator never touches a simulation. The host runs each match and
//! hands the outcome back through [`MatchCompletion`].

pub mod bracket;
pub mod cancel;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod memory;

pub use bracket::*;
pub use cancel::*;
pub use coordinator::*;
pub use error::*;
pub use gateway::*;
pub use memory::*;
