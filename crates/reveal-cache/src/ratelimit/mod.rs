//! Fixed-window rate limiting

mod fixed_window;

pub use fixed_window::{RateLimitClass, RateLimiter};
