pub mod extract;
pub mod rules;
