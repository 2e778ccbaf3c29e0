//! Request handlers

pub mod feedback;
pub mod health;
pub mod reservations;
pub mod tokens;
pub mod votes;
