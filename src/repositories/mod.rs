pub mod game_repository;
pub mod lesson_repository;
pub mod lms_repository;
pub mod roster_repository;
pub mod task_repository;

pub use game_repository::GameRepository;
pub use lesson_repository::LessonRepository;
pub use lms_repository::LmsRepository;
pub use roster_repository::RosterRepository;
pub use task_repository::TaskRepository;
