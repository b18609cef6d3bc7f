pub mod ask;
pub mod chat;
pub mod dispatch;
pub mod prompts;
pub mod render;
pub mod schema;
pub mod shared;
pub mod suggest;
