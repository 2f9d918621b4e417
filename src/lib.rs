//! Aria - Voice-driven FAQ and web-search assistant
//!
//! This library provides the core functionality for the Aria assistant:
//! - Response dispatch (FAQ fuzzy match → web search → default reply)
//! - FAQ store with pluggable similarity scoring
//! - Web search providers and reply summarization
//! - Voice processing (capture, STT, TTS, playback)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Session                          │
//! │   Capture  │  STT  │  Dispatcher  │  TTS  │  Play  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                   Dispatcher                         │
//! │   FAQ match  │  Search trigger  │  Default reply    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              External collaborators                  │
//! │   Whisper/Deepgram  │  OpenAI/ElevenLabs  │  Search │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod faq;
pub mod search;
pub mod session;
pub mod setup;
pub mod voice;

pub use config::Config;
pub use dispatch::{DispatchPolicy, Dispatcher, SEARCH_FAILED_REPLY, SEARCH_UNAVAILABLE_REPLY};
pub use error::{Error, Result};
pub use faq::{FaqStore, SequenceRatio, SimilarityScorer};
pub use search::{NO_RESULTS_MESSAGE, SearchBackend, SearchResult, WebSearchTool, summarize};
pub use session::Session;
