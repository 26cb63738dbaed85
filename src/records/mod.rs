//! Record Processing Module
//!
//! Everything that happens to content between fetching and writing.
//!
//! ## Workflow
//! 1. **Extract**: Take each story's content payload and stamp it with `objectID = story.uuid`.
//! 2. **Normalize** (optional): Convert numeric strings into numbers, recursively.
//! 3. **Partition**: Group records by their discriminator and resolve destination index names.
//!
//! ## Submodules
//! - **`extract`**: Story -> record conversion and identifier assignment.
//! - **`normalize`**: The numeric coercion tree walk.
//! - **`partition`**: `PartitionTable` and `IndexRouter`.
//! - **`types`**: The `Record` alias and identifier helpers.

pub mod extract;
pub mod normalize;
pub mod partition;
pub mod types;
