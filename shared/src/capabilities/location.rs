//! Device location capability.
//!
//! `acquire` runs one task: it asks the shell for the permission status once,
//! then either requests the last known fix or asks the shell to show the
//! permission dialog. The task resumes the app with exactly one
//! [`LocationOutcome`]; every shell request it awaits resolves once.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::model::Coordinate;
use crate::LOCATION_TIMEOUT_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationOperation {
    CheckPermission,
    RequestPermission,
    /// The shell must answer with `LocationOutput::Failed` once `timeout_ms`
    /// has elapsed without a fix.
    LastKnownLocation { timeout_ms: u64 },
}

impl Operation for LocationOperation {
    type Output = LocationOutput;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionStatus {
    pub fine: bool,
    pub coarse: bool,
}

impl PermissionStatus {
    /// Fine and coarse grants are equivalent for this app.
    #[must_use]
    pub const fn is_sufficient(self) -> bool {
        self.fine || self.coarse
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationOutput {
    Permission(PermissionStatus),
    /// `None` when the provider has no cached fix.
    Fix(Option<LocationFix>),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Unavailable {
    #[error("location permission requested")]
    PermissionRequested,
    #[error("provider has no cached fix")]
    NoFix,
    #[error("location provider failed: {0}")]
    ProviderError(String),
    #[error("provider reported out-of-range fix ({latitude}, {longitude})")]
    InvalidFix { latitude: f64, longitude: f64 },
    #[error("shell answered {0} with an unexpected output")]
    UnexpectedOutput(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Acquired(Coordinate),
    Unavailable(Unavailable),
}

pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<Ev> Location<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn acquire<F>(&self, make_event: F)
    where
        F: FnOnce(LocationOutcome) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let outcome = Self::resolve(context.clone()).await;
            context.update_app(make_event(outcome));
        });
    }

    async fn resolve(context: CapabilityContext<LocationOperation, Ev>) -> LocationOutcome {
        let status = match context
            .request_from_shell(LocationOperation::CheckPermission)
            .await
        {
            LocationOutput::Permission(status) => status,
            other => {
                warn!(?other, "unexpected answer to permission check");
                return LocationOutcome::Unavailable(Unavailable::UnexpectedOutput(
                    "CheckPermission",
                ));
            }
        };

        if !status.is_sufficient() {
            info!("location permission missing, asking the user");
            context
                .notify_shell(LocationOperation::RequestPermission)
                .await;
            return LocationOutcome::Unavailable(Unavailable::PermissionRequested);
        }

        let output = context
            .request_from_shell(LocationOperation::LastKnownLocation {
                timeout_ms: LOCATION_TIMEOUT_MS,
            })
            .await;

        match output {
            LocationOutput::Fix(Some(fix)) => match Coordinate::new(fix.latitude, fix.longitude) {
                Ok(coordinate) => {
                    info!(lat = fix.latitude, lon = fix.longitude, "location acquired");
                    LocationOutcome::Acquired(coordinate)
                }
                Err(e) => {
                    warn!(error = %e, "provider returned invalid fix");
                    LocationOutcome::Unavailable(Unavailable::InvalidFix {
                        latitude: fix.latitude,
                        longitude: fix.longitude,
                    })
                }
            },
            LocationOutput::Fix(None) => {
                info!("location provider has no cached fix");
                LocationOutcome::Unavailable(Unavailable::NoFix)
            }
            LocationOutput::Failed { message } => {
                warn!(%message, "location lookup failed");
                LocationOutcome::Unavailable(Unavailable::ProviderError(message))
            }
            LocationOutput::Permission(_) => {
                warn!("unexpected permission answer to location lookup");
                LocationOutcome::Unavailable(Unavailable::UnexpectedOutput("LastKnownLocation"))
            }
        }
    }
}
