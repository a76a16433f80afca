//! Report rendering for machine consumption
//!
//! Only structured output lives here: the engine's externally visible
//! artifact is the `Report` value, and `json` serializes it. Textual
//! rendering for a terminal is the calling CLI's concern, not this
//! engine's.

pub mod json;
