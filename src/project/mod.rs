//! Project layout discovery
//! - root.rs: upward search for the project root
//! - includes.rs: module search paths under a root

pub mod includes;
pub mod root;

pub use includes::collect_include_paths;
pub use root::resolve_root;
