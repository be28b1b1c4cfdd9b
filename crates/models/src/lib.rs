pub mod errors;
pub mod db;
pub mod validate;
pub mod role;
pub mod company;
pub mod office;
pub mod employee;
pub mod client;
pub mod package;

pub use role::Role;

#[cfg(test)]
mod tests;
