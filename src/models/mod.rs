pub mod note;
pub mod project;
pub mod task;
pub mod token;
pub mod user;

pub use note::{Note, NoteInput, NoteWithAuthor};
pub use project::{Project, ProjectDetail, ProjectInput};
pub use task::{StatusChange, StatusInput, Task, TaskDetail, TaskInput, TaskStatus};
pub use token::Token;
pub use user::{User, UserSummary};
