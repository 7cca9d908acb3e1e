pub mod multi;
pub mod repo;

pub use multi::{discover_repos, scan_repos};
pub use repo::GitRepo;
