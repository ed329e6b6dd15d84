pub mod traits;
pub mod default;

pub use default::{Ed25519, Address, derive_address_from_seed};
pub use traits::CryptoOperations;
