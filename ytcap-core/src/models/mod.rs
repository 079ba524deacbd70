pub mod captions;
pub mod history;
