// Shared drone data model, payload decoding, and link state logic.

pub mod decode;
pub mod link;
pub mod model;
