//! Cyclic date notation: every date after a personal epoch is labelled
//! `<cycle>.<day>`, with cycles of nine days and both parts starting at 1.

mod notation_model;

pub use notation_model::{notate, Notation};
