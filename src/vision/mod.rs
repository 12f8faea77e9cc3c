//! Vision module: remote image-description client.

mod client;

pub use client::{
    VisionClient, VisionError, ANALYSIS_PROMPT, DEFAULT_MODEL, OPENAI_API_BASE_URL,
    OPENAI_API_KEY_ENV,
};
