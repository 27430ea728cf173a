pub mod backend;
pub mod controller;
pub mod error;
pub mod models;
pub mod notification;
pub mod page;
pub mod presentation;
pub mod view;

pub use controller::{LikeOutcome, NoteListController};
pub use error::{Error, Result};
