pub mod class_summary;
pub mod export;
pub mod game_progress;
pub mod gradebook_service;
pub mod lms_progress;
pub mod progress_service;
pub mod task_progress;

pub use gradebook_service::{RiskPolicy, ThresholdRiskPolicy};
pub use progress_service::{ClassReport, ProgressService};
