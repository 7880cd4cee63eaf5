//! Account authentication: Argon2 password hashing, signed bearer tokens and
//! the [`AuthUser`] extractor that guards every task route.

mod extract;
mod password;
mod token;

pub use extract::AuthUser;
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};
pub use token::{Claims, TokenError, TokenIssuer};
