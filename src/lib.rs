#![doc = "The `uptask` library crate."]
#![doc = ""]
#![doc = "REST backend for UpTask: accounts confirmed by email, projects owned by a"]
#![doc = "manager, tasks with a status history, project teams and task notes."]
#![doc = "The binary (`main.rs`) wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod data;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::config::Config;
pub use crate::email::Mailer;
pub use crate::error::AppError;
