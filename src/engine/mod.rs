pub mod calendar;
pub mod cycle;
pub mod hash_sync;
pub mod navigator;
pub mod prng;
pub mod reveal;
pub mod selector;
pub mod shuffle;

pub use navigator::Navigator;
pub use selector::{Selection, selection_for};
