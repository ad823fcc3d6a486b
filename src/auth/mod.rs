//! Identity boundary. Accounts and token issuance belong to the external
//! identity provider; this module only verifies its bearer tokens.

mod claims;
pub(crate) mod extractors;

pub use extractors::AuthUser;
