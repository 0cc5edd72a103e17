// ABOUTME: Type-safe identifiers and shared value types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod version;

pub use id::Id;
pub use version::ObjectVersion;
