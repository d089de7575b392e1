//! Typed client for the OneFootball Network publishing API.
//!
//! This crate authenticates once against the network's login endpoint, holds
//! the session token for the lifetime of the client, and exposes one typed
//! operation per remote capability (list, fetch, publish, update, delete).
//! All request and response payloads pass through the validated models in
//! [`model`], so malformed data never reaches the network layer.
//!
//! # Modules
//!
//! - `client`: the authenticated API client and its error type
//! - `configuration`: connection settings resolved from arguments, the
//!   environment, or defaults
//! - `model`: request/response models and their validation rules
//!
//! # Example
//!
//! ```no_run
//! use onefootball_network::client::{ApiError, OneFootballNetwork};
//! use onefootball_network::configuration::Settings;
//! use onefootball_network::model::NewPost;
//!
//! fn main() -> Result<(), ApiError> {
//!     let settings = Settings::builder()
//!         .login("editor@example.com")
//!         .password("secret")
//!         .build()?;
//!     let client = OneFootballNetwork::new(settings)?;
//!
//!     let article = NewPost::builder()
//!         .external_id("28961")
//!         .source_url("https://example.com/a")
//!         .language("fr")
//!         .published("2020-08-10T08:28:58Z")
//!         .title("Transfer news")
//!         .content("<p>…</p>")
//!         .build()?;
//!     let published = client.publish_article(&article)?;
//!     println!("created post {}", published.id());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod configuration;
pub mod model;
