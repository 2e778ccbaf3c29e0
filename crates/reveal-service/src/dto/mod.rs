//! Request and response DTOs

mod requests;
mod responses;

pub use requests::{
    CreateReservationRequest, SubmitFeedbackRequest, SubmitVoteRequest, VerifyTokenRequest,
    VoteStatusQuery,
};
pub use responses::{CreateReservationResponse, VerifyTokenResponse, VoteStatusResponse};
