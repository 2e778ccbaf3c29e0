//! # reveal-service
//!
//! Application layer containing the reservation, vote, and feedback services
//! plus their request/response DTOs.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    CreateReservationRequest, CreateReservationResponse, SubmitFeedbackRequest,
    SubmitVoteRequest, VerifyTokenRequest, VerifyTokenResponse, VoteStatusQuery,
    VoteStatusResponse,
};
pub use services::{
    FeedbackRecord, FeedbackService, FeedbackSink, LogFeedbackSink, ReservationService,
    ServiceContext, VoteService,
};
