// fish/mod.rs
//
// Swimming-fish background: entities, placement, the school that owns them,
// and the swim clock that drives them. No DOM here.

pub mod entity;
pub mod gate;
pub mod placement;
pub mod rng;
pub mod school;
pub mod time;

pub use entity::{Fish, FishId, FishState, FishTransform, Viewport};
pub use gate::LoopGate;
pub use placement::{grid_dims, grid_positions};
pub use rng::Rng;
pub use school::{School, SlotChange};
pub use time::{SwimClock, Ticks};
