use serde::{Deserialize, Serialize};

use crate::capabilities::LocationOutcome;
use crate::catalog::CatalogConfig;
use crate::navigation::RequestToken;

#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    AppStarted {
        config: CatalogConfig,
    },

    LatitudeChanged(String),
    LongitudeChanged(String),
    SubmitCoordinates,
    UseCurrentLocation,
    LocationPermissionChanged {
        granted: bool,
    },

    SelectWebcam {
        id: u64,
    },
    GoBack,
    OpenUrl {
        url: String,
    },
    DismissNotice,

    // Capability completions, never sent by the shell.
    #[serde(skip)]
    LocationResolved {
        token: RequestToken,
        outcome: LocationOutcome,
    },
    #[serde(skip)]
    CatalogResponse {
        token: RequestToken,
        result: crux_http::Result<crux_http::Response<Vec<u8>>>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted { .. } => "app_started",
            Self::LatitudeChanged(_) => "latitude_changed",
            Self::LongitudeChanged(_) => "longitude_changed",
            Self::SubmitCoordinates => "submit_coordinates",
            Self::UseCurrentLocation => "use_current_location",
            Self::LocationPermissionChanged { .. } => "location_permission_changed",
            Self::SelectWebcam { .. } => "select_webcam",
            Self::GoBack => "go_back",
            Self::OpenUrl { .. } => "open_url",
            Self::DismissNotice => "dismiss_notice",
            Self::LocationResolved { .. } => "location_resolved",
            Self::CatalogResponse { .. } => "catalog_response",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::LatitudeChanged(_)
                | Self::LongitudeChanged(_)
                | Self::SubmitCoordinates
                | Self::UseCurrentLocation
                | Self::SelectWebcam { .. }
                | Self::GoBack
                | Self::OpenUrl { .. }
                | Self::DismissNotice
        )
    }
}
