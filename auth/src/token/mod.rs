pub mod claims;
pub mod codec;
pub mod errors;
pub mod manager;

pub use claims::Claims;
pub use claims::TokenKind;
pub use codec::TokenCodec;
pub use errors::TokenError;
pub use manager::TokenManager;
pub use manager::TokenManagerConfig;
