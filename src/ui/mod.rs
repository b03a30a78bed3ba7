pub mod chat_loop;
pub mod renderer;
pub mod theme;
pub mod view;
pub mod wrap;
