pub mod console;
pub mod engine;
pub mod outcome;

pub use console::Verb;
pub use engine::*;
pub use outcome::*;
