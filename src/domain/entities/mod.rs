pub mod edit;
pub mod elemento;
