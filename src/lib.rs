pub mod config;
pub mod error;
pub mod intent;
pub mod services;
pub mod session;

pub use config::BotConfig;
pub use error::{PipelineError, ServiceError};
pub use intent::{IntentContext, IntentPipeline, Resolution};
pub use session::{Bot, BotReply, BotSession};
