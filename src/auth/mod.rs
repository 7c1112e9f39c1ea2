pub mod bundle;
pub mod login;
