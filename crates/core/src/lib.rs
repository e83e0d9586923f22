#![forbid(unsafe_code)]

pub mod model;
pub mod prompts;
pub mod time;

pub use prompts::{ExampleWorry, PromptSet, PromptSetError};
pub use time::Clock;
