#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod error;
pub mod event;
pub mod form;
pub mod model;
pub mod navigation;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::render::Render;
pub use error::{AppError, CatalogError, CoordinateError, ErrorKind};
pub use event::Event;
pub use model::{Coordinate, Model, ScreenState, WebcamCatalog, WebcamSummary};
pub use navigation::{NavigationController, Notice, NoticeKind};
pub use view::{ViewModel, ViewState};

pub const SEARCH_RADIUS_KM: u32 = 50;
pub const WEBCAM_CATEGORIES: &str = "landscape,city,beach,mountain";
pub const MAX_WEBCAMS: usize = 50;
pub const LOCATION_TIMEOUT_MS: u64 = 15_000;
