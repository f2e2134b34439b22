//! Page wiring entry point.
//!
//! # Responsibility
//! - Attach every interaction component to a rendered page in one call.
//! - Hand back a [`Disposer`] that detaches exactly what was attached.
//!
//! # Invariants
//! - A page carries at most one installation; the reveal observer belongs
//!   to it.
//! - Wiring inspects the markup once; elements added later are only reached
//!   through document-level or delegated listeners.
//! - Disposal never cancels timers that are already scheduled.

use crate::config::{ConfigError, InteractionConfig};
use crate::events::ListenerGroup;
use crate::page::Page;
use crate::{forms, hover, modal, nav, reveal, scroll};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Detaches the listeners and observer installed by [`install`].
#[derive(Debug)]
#[must_use = "dropping the disposer leaves the interactions installed for the page lifetime"]
pub struct Disposer {
    group: ListenerGroup,
}

impl Disposer {
    /// Removes this installation's listeners and observer; returns how many
    /// listeners were removed.
    ///
    /// A disposer whose installation is not the page's live one (for example
    /// one issued by another page) changes nothing and returns 0.
    pub fn dispose(self, page: &mut Page) -> usize {
        if page.installation != Some(self.group) {
            warn!("event=interactions_disposed module=interactions status=skipped reason=not_owner");
            return 0;
        }
        let removed = page.listeners.remove_group(self.group);
        if let Some(observer) = page.observer.as_mut() {
            observer.disconnect();
        }
        page.observer = None;
        page.installation = None;
        info!("event=interactions_disposed module=interactions status=ok listeners={removed}");
        removed
    }
}

/// Installation failures. The page is left untouched in every case.
#[derive(Debug, Clone, PartialEq)]
pub enum InstallError {
    Config(ConfigError),
    /// The page already has live interactions; dispose them first.
    AlreadyInstalled,
}

impl Display for InstallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid interaction config: {err}"),
            Self::AlreadyInstalled => {
                write!(f, "interactions are already installed on this page")
            }
        }
    }
}

impl Error for InstallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::AlreadyInstalled => None,
        }
    }
}

impl From<ConfigError> for InstallError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Validates `config` and wires navigation, scroll effects, reveal,
/// forms, modal and hover handlers onto `page`.
///
/// # Errors
/// - [`InstallError::Config`] when `config` is out of range.
/// - [`InstallError::AlreadyInstalled`] when a previous installation has not
///   been disposed.
pub fn install(page: &mut Page, config: InteractionConfig) -> Result<Disposer, InstallError> {
    if page.installation.is_some() {
        return Err(InstallError::AlreadyInstalled);
    }
    config.validate()?;
    page.config = config;
    let group = ListenerGroup::allocate();

    nav::wire(page, group);
    scroll::wire(page, group);
    reveal::wire(page, group);
    forms::wire(page, group);
    modal::wire(page, group);
    hover::wire(page, group);
    page.installation = Some(group);

    info!(
        "event=interactions_installed module=interactions status=ok listeners={} version={}",
        page.listener_count(),
        env!("CARGO_PKG_VERSION")
    );
    info!("event=welcome module=interactions message=portfolio_ready");
    Ok(Disposer { group })
}
