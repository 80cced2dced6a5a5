pub mod jwt;
pub mod password;
pub mod revocation;

pub use jwt::{mint_access_token, verify_access_token, Claims};
pub use revocation::{InMemoryRevocationStore, RevocationStore};
