/// Hashing arbitrary keys into the identifier space
pub mod crypto;
