pub mod crypto;
pub mod equity;
