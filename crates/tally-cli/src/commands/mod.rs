pub mod analyze;
pub mod send;
pub mod vocab;
