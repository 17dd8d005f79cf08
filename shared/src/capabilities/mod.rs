mod browser;
mod location;

pub use self::browser::{Browser, BrowserOperation, ValidatedLink};
pub use self::location::{
    Location, LocationFix, LocationOperation, LocationOutcome, LocationOutput, PermissionStatus,
    Unavailable,
};

// Render and Http come straight from Crux.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub location: Location<Event>,
    pub browser: Browser<Event>,
    pub render: Render<Event>,
}
