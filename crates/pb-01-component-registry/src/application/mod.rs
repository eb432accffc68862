//! Application services: registry state and single-flight resolution.

pub mod registry;
pub mod resolver;

pub use registry::PaneRegistry;
pub use resolver::ResolverService;
