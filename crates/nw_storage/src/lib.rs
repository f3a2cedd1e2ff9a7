pub mod backends;
pub mod serializer;

pub use backends::*;
pub use serializer::{format_rfc2822, render_rss};

