pub mod file;
pub mod traits;

// Re-export
pub use file::FilePlannerRepository;
pub use traits::PlannerRepository;
