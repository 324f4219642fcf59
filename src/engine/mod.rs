pub mod progress;
pub mod validator;

pub use progress::{ProgressAnimator, ProgressPolicy};
pub use validator::ValidatorRegistry;
