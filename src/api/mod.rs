// ABOUTME: Typed wrappers for engine endpoints.
// ABOUTME: Config is a swarm resource; System covers engine-level endpoints.

mod config;
mod json_lines;
mod system;

pub use config::{
    Config, ConfigFilters, ConfigId, ConfigListQuery, ConfigSpec, ConfigUpdateQuery,
    CreatedConfig, Driver,
};
pub use json_lines::{JsonLines, json_lines};
pub use system::{
    EventActor, EventMessage, EventsQuery, SwarmInfo, System, SystemInfo, SystemVersion,
};
