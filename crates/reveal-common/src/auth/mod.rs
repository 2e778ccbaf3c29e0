//! Token issuance and verification

mod tokens;

pub use tokens::{TokenClaims, TokenService, TOKEN_TTL_SECONDS};
