//! Authentication and authorization module

pub mod claims;
pub mod directory;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod resolver;

pub use claims::{ClaimValue, ClaimsInput, ClaimsSet, TokenKind};
pub use directory::{InMemoryUserDirectory, Principal, UserDirectory};
pub use extract::CredentialExtractor;
pub use jwt::{TokenCodec, TokenPair};
pub use middleware::require_auth;
pub use password::PasswordHasher;
pub use resolver::{Identity, IdentityResolver};
