pub mod service;

pub use service::{Outcome, PhotoService};
