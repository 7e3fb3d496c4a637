pub mod error;
pub mod gemini;
pub mod image;
pub mod schema;
pub mod traits;
pub mod util;

pub use error::{AiError, Result};
pub use gemini::Gemini;
pub use image::InlineImage;
pub use schema::StructuredOutput;
pub use traits::{Agent, PromptBuilder};
pub use util::strip_code_blocks;
