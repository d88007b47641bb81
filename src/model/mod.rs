//! Plain data types shared by the actors, the progression and the tracker view.

pub mod order;
pub mod stage;
pub mod tracking;

pub use order::*;
pub use stage::*;
pub use tracking::*;
