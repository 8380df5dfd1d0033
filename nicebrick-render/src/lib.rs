//! Nicebrick Render
//!
//! Pure SVG generation: the BearBrick renderer contract with its default
//! implementation, the daily-wish share card, and the placeholder image.

pub mod renderer;
pub mod share;
pub mod svg;

pub use renderer::{BearBrickOptions, BearBrickRenderer};
pub use share::{svg_data_url, truncate_for_share, ShareCard, SHARE_TEXT_LIMIT};
pub use svg::{escape_xml, initials, placeholder_svg, SvgBearBrickRenderer};
