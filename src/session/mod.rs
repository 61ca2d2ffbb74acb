pub mod clock;
pub mod job;
pub mod lifecycle;

pub use clock::{
    ElapsedReading, SessionClock, compute_elapsed_millis, format_elapsed, read_elapsed,
};
pub use lifecycle::SessionStatus;
