pub mod crypto;
pub mod wallet;

pub use crypto::*;
pub use wallet::Wallet;
