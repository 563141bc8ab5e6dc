pub mod registry;
pub mod types;

pub use registry::{generate_job_id, JobRegistry};
pub use types::Job;
