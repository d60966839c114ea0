mod password_hash;

pub use password_hash::{hash_password, verify_password};
