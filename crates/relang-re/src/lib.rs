mod regex;


pub use regex::{Regex, EMPTY_SET_GLYPH, EPSILON_GLYPH};
