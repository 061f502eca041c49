pub mod ai;
pub mod bonus;
pub mod collision;
pub mod movement;
pub mod scoring;

pub use ai::*;
pub use bonus::*;
pub use collision::*;
pub use movement::*;
pub use scoring::*;
