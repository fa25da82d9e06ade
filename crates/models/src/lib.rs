pub mod errors;
pub mod db;
pub mod repository;
pub mod wizard;
pub mod artifact;
pub mod hogwarts_user;

#[cfg(test)]
mod tests;
