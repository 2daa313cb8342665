pub mod state;

pub use state::{LoadRequest, LoadState, SelectionState, Session};
