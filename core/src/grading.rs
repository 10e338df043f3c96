pub mod assertion;
pub mod grader;
pub mod result;
pub mod runner;

pub use assertion::*;
pub use grader::*;
pub use result::*;
pub use runner::*;
