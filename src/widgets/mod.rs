mod field;
mod loading;
mod terminal;

pub use field::TextField;
pub use loading::{Loading, LoadingWidget};
pub use terminal::Terminal;
