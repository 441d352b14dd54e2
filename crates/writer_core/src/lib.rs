//! Writer core: pure domain types for formatting and publishing articles.
mod clock;
mod digest;
mod draft;
mod platform;
mod stage;
mod token;

pub use clock::{Clock, SystemClock};
pub use digest::{derive_digest, DIGEST_MAX_CHARS, DIGEST_OVERFLOW_MARKER};
pub use draft::{DraftArticle, DraftHandle, DEFAULT_AUTHOR};
pub use platform::{Platform, PlatformError};
pub use stage::{PipelineStage, StageTransitionError};
pub use token::{AccessToken, TokenCache, TOKEN_SAFETY_MARGIN};
