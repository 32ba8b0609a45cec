//! Authentication utilities

mod jwt;
mod otp;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use otp::{codes_match, generate_numeric_code, generate_opaque_token, is_numeric_code};
pub use password::{hash_password, verify_password, PasswordPolicy, PasswordService};
