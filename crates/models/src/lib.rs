pub mod errors;
pub mod db;
pub mod user;
pub mod decision;

#[cfg(test)]
mod tests;
