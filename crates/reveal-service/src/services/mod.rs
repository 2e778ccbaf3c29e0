//! Application services

mod context;
mod feedback;
mod reservation;
mod vote;

pub use context::ServiceContext;
pub use feedback::{FeedbackRecord, FeedbackService, FeedbackSink, LogFeedbackSink};
pub use reservation::ReservationService;
pub use vote::VoteService;
