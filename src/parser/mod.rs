pub mod payload_parser;

pub use payload_parser::{Parser, PayloadParser};
