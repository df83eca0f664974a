pub mod identity;
pub mod session;
