pub mod status;

pub use status::{OrderStatus, StatusFilter, StatusTransitionError};
