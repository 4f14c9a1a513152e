pub mod index;

pub use index::{handle_index, handle_process};
