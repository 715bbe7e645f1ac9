pub mod generate;
pub mod iteration;
pub mod project;
