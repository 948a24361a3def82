pub mod counter;
pub mod snapshot;

pub use counter::*;
pub use snapshot::*;
