pub mod copywriter;
pub mod error;
pub mod generator;
pub mod input;
pub mod normalizer;
pub mod progress;
pub mod prompt;
pub mod request;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use copywriter::{Copywriter, GenerationOutcome};
pub use error::{GenerationError, InputError};
pub use generator::{CopyGenerator, GeminiGenerator};
pub use input::GenerationInput;
pub use normalizer::{error_copies, normalize, normalize_at, ParsedReply};
pub use progress::ProgressTicker;
pub use request::{build_request, CopyRequest, ExtractedCopy};

pub use ai_client::InlineImage;
