pub mod task;

pub use task::{launch, LaunchOptions, LaunchOutcome};
