pub mod error;
pub mod rank;
pub mod score;
pub mod service;
pub mod validate;

pub use error::{FieldError, IntentField, RecommendError, ValidationError};
pub use rank::TOP_K;
pub use score::ScoreWeights;
pub use service::RecommendationService;
