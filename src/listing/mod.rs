//! Parser for the brace-nested listing output of the appliance shell

pub mod event;
pub mod parser;
pub mod scan;

pub use event::{ListingEvent, Tokenizer};
pub use parser::{parse, parse_listed, render, ListingObject, ListingValue};
pub use scan::balanced_block;
