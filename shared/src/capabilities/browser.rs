use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LinkError;

/// A link the shell may open: http(s), with a host and no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedLink(String);

impl ValidatedLink {
    pub fn new(url: &str) -> Result<Self, LinkError> {
        let invalid = |reason: &str| LinkError::InvalidUrl {
            url: truncate(url),
            reason: reason.to_string(),
        };

        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(invalid("URL cannot be empty"));
        }

        let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("only http and https links can be opened"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("URL must have a host"));
        }
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(invalid("credentials in URL are not allowed"));
        }

        Ok(Self(parsed.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn truncate(url: &str) -> String {
    if url.chars().count() <= 100 {
        url.to_string()
    } else {
        format!("{}...", url.chars().take(100).collect::<String>())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserOperation {
    Open { url: String },
}

impl Operation for BrowserOperation {
    type Output = ();
}

pub struct Browser<Ev> {
    context: CapabilityContext<BrowserOperation, Ev>,
}

impl<Ev> Capability<Ev> for Browser<Ev> {
    type Operation = BrowserOperation;
    type MappedSelf<MappedEv> = Browser<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Browser::new(self.context.map_event(f))
    }
}

impl<Ev> Browser<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<BrowserOperation, Ev>) -> Self {
        Self { context }
    }

    /// Fire-and-forget: the shell opens the link outside the app.
    pub fn open(&self, link: ValidatedLink) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(BrowserOperation::Open { url: link.0 })
                .await;
        });
    }
}
