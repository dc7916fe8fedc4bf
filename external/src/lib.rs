pub mod error;
pub mod word_list;

pub use error::ExternalError;
pub use word_list::{WordList, WordRecord};
