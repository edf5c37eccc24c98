//! Postgres access, one repository per table group.
//!
//! Repositories borrow the pool and return `sqlx::Error`; handlers turn those
//! into `AppError` with `?`.

pub mod note;
pub mod project;
pub mod task;
pub mod team;
pub mod token;
pub mod user;

pub use note::NoteRepository;
pub use project::ProjectRepository;
pub use task::TaskRepository;
pub use team::TeamRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
