pub mod error;
pub mod password;
pub mod protector;
pub mod time_limited;

pub use error::CryptoError;
pub use password::{PasswordCheck, PasswordHasher};
pub use protector::{DataProtector, ProtectionKey, KEY_LENGTH};
pub use time_limited::TimeLimitedProtector;
