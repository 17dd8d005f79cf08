use serde::{Deserialize, Serialize};

use crate::model::{ScreenState, WebcamSummary};
use crate::navigation::{NavigationController, Notice};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebcamListItem {
    pub id: u64,
    pub title: String,
    pub place: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebcamDetail {
    pub id: u64,
    pub title: String,
    pub city: String,
    pub country: String,
    pub place: String,
    pub viewer_url: String,
    pub provider_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    LocationInput {
        latitude: String,
        longitude: String,
        latitude_error: Option<String>,
        longitude_error: Option<String>,
        is_loading: bool,
        awaiting_permission: bool,
    },
    List {
        items: Vec<WebcamListItem>,
    },
    Detail {
        webcam: WebcamDetail,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub state: ViewState,
    pub notice: Option<Notice>,
    /// True when back should fall through to the platform.
    pub back_exits: bool,
}

impl From<&NavigationController> for ViewModel {
    fn from(nav: &NavigationController) -> Self {
        let state = match nav.state() {
            ScreenState::LocationInput => {
                let form = nav.form();
                ViewState::LocationInput {
                    latitude: form.latitude_text.clone(),
                    longitude: form.longitude_text.clone(),
                    latitude_error: form.latitude_error.as_ref().map(ToString::to_string),
                    longitude_error: form.longitude_error.as_ref().map(ToString::to_string),
                    is_loading: nav.is_loading(),
                    awaiting_permission: nav.is_awaiting_permission(),
                }
            }
            ScreenState::List { catalog } => ViewState::List {
                items: catalog.iter().map(list_item).collect(),
            },
            ScreenState::Detail { selected, .. } => ViewState::Detail {
                webcam: detail(selected),
            },
        };

        Self {
            back_exits: nav.state().is_location_input(),
            notice: nav.notice().cloned(),
            state,
        }
    }
}

fn place(webcam: &WebcamSummary) -> String {
    [&webcam.location.city, &webcam.location.country]
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_item(webcam: &WebcamSummary) -> WebcamListItem {
    WebcamListItem {
        id: webcam.id,
        title: webcam.title.clone(),
        place: place(webcam),
    }
}

fn detail(webcam: &WebcamSummary) -> WebcamDetail {
    WebcamDetail {
        id: webcam.id,
        title: webcam.title.clone(),
        city: webcam.location.city.clone(),
        country: webcam.location.country.clone(),
        place: place(webcam),
        viewer_url: webcam.links.viewer_url.clone(),
        provider_url: webcam.links.provider_url.clone(),
    }
}
