//! Autoresearcher
//!
//! Generates cited academic literature reviews. Papers (from Semantic Scholar
//! or manually supplied documents) are read one by one, a language model
//! extracts the answer each abstract gives to the research question, and the
//! answers are synthesized into a narrative with a numbered reference list.
//!
//! # Features
//!
//! - **Answer extraction** with an exact no-answer sentinel and DOI citations
//! - **Token-budgeted synthesis** using tiktoken counts
//! - **Deterministic references** in order of first appearance
//! - **Pluggable services**: completion, citation metadata, tokenizer and paper
//!   source are traits, so tests run against fakes
//!
//! # Example
//!
//! ```no_run
//! use autoresearcher::{config::Config, pipeline::LiteratureReviewPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = LiteratureReviewPipeline::from_config(&config)?;
//!
//!     let review = pipeline.run("What is the impact of AI on healthcare?", &[]).await?;
//!     println!("{review}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod sources;
pub mod tokenizer;

pub use client::{CiteAsClient, OpenAiClient, SemanticScholarClient};
pub use config::Config;
pub use error::{ClientError, PipelineError};
pub use pipeline::LiteratureReviewPipeline;
