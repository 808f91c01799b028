//! ModGate classification pipeline.
//!
//! Wraps the external captioning model, NSFW classifier and profanity matcher
//! behind narrow capability traits, and combines their outputs into a single
//! moderation verdict with fixed precedence rules and per-stage timing.

pub mod adapter;
pub mod blacklist;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod profanity;
mod text;

pub use adapter::{
    Captioner, ClassifierAdapter, LabelScore, NsfwModel, NsfwVerdict, ProfanityMatcher,
    ProfanityVerdict, Timed, NSFW_THRESHOLD,
};
pub use blacklist::{Blacklist, BLACKLIST_TERMS};
pub use error::{ClassifierError, PipelineError};
pub use http_client::HttpModelClient;
pub use pipeline::DecisionPipeline;
pub use profanity::WordListMatcher;
