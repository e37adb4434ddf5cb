//! HTTP client for the resume search service.
//!
//! The service exposes four endpoints:
//!
//! - `POST /search` full-text and filtered candidate search
//! - `GET /resume/{candidate_id}` a single resume
//! - `POST /update` field updates, optionally creating the resume
//! - `GET /health` liveness
//!
//! # Example
//!
//! ```no_run
//! use scout_client::{ResumeClient, Result, SearchRequest};
//!
//! # async fn example() -> Result<()> {
//! let client = ResumeClient::builder()
//!     .base_url("http://127.0.0.1:8000")
//!     .build()?;
//!
//! let hits = client
//!     .search(&SearchRequest::new().query("rust engineer").size(20))
//!     .await?;
//! println!("{hits}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, ResumeClient};
pub use error::{Error, Result};
pub use types::*;
