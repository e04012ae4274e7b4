mod draft;
mod event;
mod location;
mod player;

pub use draft::*;
pub use event::*;
pub use location::*;
pub use player::*;
