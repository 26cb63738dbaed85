//! Content Source Module
//!
//! Reads the full content set from the headless CMS.
//!
//! ## Workflow
//! 1. **Probe**: One read with the configured query to learn the total entry count.
//! 2. **Plan**: `ceil(total / per_page)` page requests, each overriding only the page number.
//! 3. **Fan-Out**: All page requests are issued concurrently and joined before anything else runs.
//!
//! ## Submodules
//! - **`client`**: The `ContentSource` trait and the Storyblok HTTP client.
//! - **`pagination`**: Page-count math, the probe and the concurrent fetch.
//! - **`types`**: Request descriptors and decoded pages.

pub mod client;
pub mod pagination;
pub mod types;
