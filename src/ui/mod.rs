mod app;
pub mod command;
pub mod course_form;
pub mod course_item;
pub mod course_list;
pub mod render;
pub mod shell;
pub mod state;

pub use app::App;
pub use shell::Shell;
