pub mod events;
pub mod filename;
pub mod pipeline;
pub mod url_parser;
