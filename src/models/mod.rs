pub mod cache;
pub mod participant;
pub mod states;
pub mod turn;

pub use cache::*;
pub use participant::*;
pub use states::*;
pub use turn::*;
