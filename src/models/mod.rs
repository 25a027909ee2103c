pub mod todo;

pub use todo::{CreateTodoPayload, Todo, UpdateTodoPayload};
