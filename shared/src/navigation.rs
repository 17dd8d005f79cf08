//! Three-screen navigation state machine.
//!
//! `NavigationController` is the only owner of the current [`ScreenState`].
//! Intents and async completions go through its methods; methods that need
//! I/O return a [`Command`] for the app to hand to a capability. Each command
//! carries a [`RequestToken`] and only the most recently issued token is
//! pending, so a completion for a superseded request is dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::{LocationOutcome, Unavailable};
use crate::error::{AppError, CatalogError, ErrorKind};
use crate::form::CoordinateForm;
use crate::model::{Coordinate, ScreenState, WebcamCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    AcquireLocation(RequestToken),
    LoadCatalog {
        token: RequestToken,
        coordinate: Coordinate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    Handled,
    /// Back on the first screen belongs to the platform (usually exit).
    NotHandled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl From<&AppError> for Notice {
    fn from(e: &AppError) -> Self {
        let kind = match e.kind {
            ErrorKind::Validation => NoticeKind::Warning,
            _ => NoticeKind::Error,
        };
        Self::new(e.user_facing_message(), kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Location,
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: RequestToken,
    kind: PendingKind,
}

#[derive(Debug, Default)]
pub struct NavigationController {
    state: ScreenState,
    form: CoordinateForm,
    notice: Option<Notice>,
    pending: Option<Pending>,
    last_token: u64,
    resume_on_grant: bool,
}

impl NavigationController {
    #[must_use]
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    #[must_use]
    pub fn form(&self) -> &CoordinateForm {
        &self.form
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn is_awaiting_permission(&self) -> bool {
        self.resume_on_grant
    }

    pub fn set_latitude_text(&mut self, text: impl Into<String>) {
        self.form.set_latitude(text);
    }

    pub fn set_longitude_text(&mut self, text: impl Into<String>) {
        self.form.set_longitude(text);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn report(&mut self, error: &AppError) {
        warn!(code = error.code(), error = %error, "reporting error");
        self.notice = Some(Notice::from(error));
    }

    /// Validates the form and, if both fields pass, starts a catalog load.
    pub fn submit_coordinates(&mut self) -> Option<Command> {
        if !self.state.is_location_input() {
            debug!(screen = self.state.name(), "submit ignored outside location input");
            return None;
        }

        let Some(coordinate) = self.form.validate() else {
            info!(
                latitude_error = self.form.latitude_error.is_some(),
                longitude_error = self.form.longitude_error.is_some(),
                "coordinate submission rejected"
            );
            return None;
        };

        Some(self.begin_load(coordinate))
    }

    pub fn use_current_location(&mut self) -> Option<Command> {
        if !self.state.is_location_input() {
            debug!(screen = self.state.name(), "location request ignored outside location input");
            return None;
        }

        self.resume_on_grant = false;
        let token = self.issue(PendingKind::Location);
        info!(token = token.value(), "acquiring current location");
        Some(Command::AcquireLocation(token))
    }

    pub fn location_resolved(
        &mut self,
        token: RequestToken,
        outcome: LocationOutcome,
    ) -> Option<Command> {
        if !self.complete(token, PendingKind::Location) {
            return None;
        }

        match outcome {
            LocationOutcome::Acquired(coordinate) => {
                self.form.fill_from(coordinate);
                Some(self.begin_load(coordinate))
            }
            LocationOutcome::Unavailable(Unavailable::PermissionRequested) => {
                self.resume_on_grant = true;
                self.notice = Some(Notice::new(
                    "Allow location access to use your current position.",
                    NoticeKind::Info,
                ));
                None
            }
            LocationOutcome::Unavailable(reason) => {
                let error = AppError::new(ErrorKind::Location, "Location unavailable")
                    .with_internal(reason.to_string());
                self.report(&error);
                None
            }
        }
    }

    /// One-shot continuation armed when acquisition had to ask for
    /// permission. A grant re-issues acquisition; a denial disarms it.
    pub fn permission_changed(&mut self, granted: bool) -> Option<Command> {
        if !std::mem::take(&mut self.resume_on_grant) {
            return None;
        }

        if !granted {
            let error = AppError::new(ErrorKind::LocationPermissionDenied, "Permission denied");
            self.report(&error);
            return None;
        }

        if self.pending.is_some() {
            debug!("permission granted but another request is in flight");
            return None;
        }

        self.use_current_location()
    }

    pub fn catalog_loaded(
        &mut self,
        token: RequestToken,
        result: Result<WebcamCatalog, CatalogError>,
    ) {
        if !self.complete(token, PendingKind::Catalog) {
            return;
        }

        match result {
            Ok(catalog) => {
                info!(token = token.value(), count = catalog.len(), "catalog loaded");
                self.notice = None;
                self.state = ScreenState::List { catalog };
            }
            Err(e) => {
                self.report(&AppError::from(e));
            }
        }
    }

    /// List -> Detail when `id` is in the current catalog. Returns whether
    /// the transition happened; a miss is a silent no-op.
    pub fn select_webcam(&mut self, id: u64) -> bool {
        let selected = match &self.state {
            ScreenState::List { catalog } => catalog.find(id).cloned(),
            _ => None,
        };
        let Some(selected) = selected else {
            debug!(id, screen = self.state.name(), "selection ignored");
            return false;
        };

        if let ScreenState::List { catalog } = std::mem::take(&mut self.state) {
            debug!(id, "list -> detail");
            self.notice = None;
            self.state = ScreenState::Detail { selected, catalog };
        }
        true
    }

    pub fn go_back(&mut self) -> BackOutcome {
        let from = self.state.name();
        let (next, outcome) = match std::mem::take(&mut self.state) {
            ScreenState::Detail { catalog, .. } => {
                (ScreenState::List { catalog }, BackOutcome::Handled)
            }
            ScreenState::List { .. } => (ScreenState::LocationInput, BackOutcome::Handled),
            ScreenState::LocationInput => (ScreenState::LocationInput, BackOutcome::NotHandled),
        };

        if outcome == BackOutcome::Handled {
            debug!(from, to = next.name(), "back");
            self.notice = None;
        }
        self.state = next;
        outcome
    }

    fn begin_load(&mut self, coordinate: Coordinate) -> Command {
        self.notice = None;
        let token = self.issue(PendingKind::Catalog);
        Command::LoadCatalog { token, coordinate }
    }

    fn issue(&mut self, kind: PendingKind) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        if let Some(previous) = self.pending.replace(Pending { token, kind }) {
            debug!(
                superseded = previous.token.value(),
                by = token.value(),
                "pending request superseded"
            );
        }
        token
    }

    fn complete(&mut self, token: RequestToken, kind: PendingKind) -> bool {
        if self.pending == Some(Pending { token, kind }) {
            self.pending = None;
            true
        } else {
            debug!(token = token.value(), ?kind, "stale completion dropped");
            false
        }
    }
}
