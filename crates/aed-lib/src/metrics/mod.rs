pub mod rhythm;
pub mod sqi;
