//! Bearer-token authentication: JWT issue/verify, argon2 password hashing
//! and the [`AuthUser`] extractor that guards every user-scoped route.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenKind};
pub use middleware::AuthUser;
pub use password::PasswordService;
