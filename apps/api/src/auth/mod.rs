// Access guard: token issuance (login) and bearer verification for protected routes.

pub mod extractor;
pub mod handlers;
pub mod jwt;
