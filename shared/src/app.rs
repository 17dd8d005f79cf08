use tracing::{debug, info};

use crate::capabilities::{Capabilities, ValidatedLink};
use crate::catalog::{catalog_from_response, CatalogLoader};
use crate::error::AppError;
use crate::event::Event;
use crate::model::Model;
use crate::navigation::{BackOutcome, Command};
use crate::view::ViewModel;

#[derive(Default)]
pub struct App;

impl App {
    fn run(command: Option<Command>, model: &mut Model, caps: &Capabilities) {
        match command {
            None => {}
            Some(Command::AcquireLocation(token)) => {
                caps.location
                    .acquire(move |outcome| Event::LocationResolved { token, outcome });
            }
            Some(Command::LoadCatalog { token, coordinate }) => {
                let loader = CatalogLoader::new(&caps.http, &model.catalog_config);
                if let Err(e) = loader.load(coordinate, token) {
                    model.navigation.catalog_loaded(token, Err(e));
                }
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user = event.is_user_initiated(),
            screen = model.navigation.state().name(),
            "update"
        );

        match event {
            Event::AppStarted { config } => {
                info!(endpoint = %config.endpoint, has_key = config.api_key.is_some(), "configured");
                model.catalog_config = config;
            }
            Event::LatitudeChanged(text) => model.navigation.set_latitude_text(text),
            Event::LongitudeChanged(text) => model.navigation.set_longitude_text(text),
            Event::SubmitCoordinates => {
                let command = model.navigation.submit_coordinates();
                Self::run(command, model, caps);
            }
            Event::UseCurrentLocation => {
                let command = model.navigation.use_current_location();
                Self::run(command, model, caps);
            }
            Event::LocationPermissionChanged { granted } => {
                let command = model.navigation.permission_changed(granted);
                Self::run(command, model, caps);
            }
            Event::LocationResolved { token, outcome } => {
                let command = model.navigation.location_resolved(token, outcome);
                Self::run(command, model, caps);
            }
            Event::CatalogResponse { token, result } => {
                model
                    .navigation
                    .catalog_loaded(token, catalog_from_response(result));
            }
            Event::SelectWebcam { id } => {
                model.navigation.select_webcam(id);
            }
            Event::GoBack => {
                if model.navigation.go_back() == BackOutcome::NotHandled {
                    debug!("back left to the platform");
                }
            }
            Event::OpenUrl { url } => match ValidatedLink::new(&url) {
                Ok(link) => caps.browser.open(link),
                Err(e) => model.navigation.report(&AppError::from(e)),
            },
            Event::DismissNotice => model.navigation.dismiss_notice(),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(&model.navigation)
    }
}
