pub mod runner;
pub mod session;

pub use runner::Runtime;
pub use session::{Exit, Session};
