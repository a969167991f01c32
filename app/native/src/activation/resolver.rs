//! Clicked Dock label to restore/hide decision.
//!
//! # Decision table
//!
//! | Dock label                 | Running app state        | Action  |
//! |----------------------------|--------------------------|---------|
//! | denylisted                 | any                      | Ignore  |
//! | no running match           | -                        | Ignore  |
//! | match                      | not frontmost, or hidden | Restore |
//! | match                      | frontmost and visible    | Hide    |
//!
//! An app minimized without losing focus reports hidden *and* frontmost. The
//! OR in the restore rule sends it down the restore path; if that guess is
//! wrong the next click hides it.

use std::collections::HashSet;
use std::sync::Arc;

use super::alias::AliasTable;
use super::registry::{ProcessRegistry, RunningApp};
use crate::constants::dock::DENYLIST;
use crate::error::ActivationError;

/// What a click on a Dock icon should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Bring the application back: launch-or-activate, unhide, activate.
    Restore,
    /// Hide the frontmost, visible application.
    Hide,
    /// Leave the click to the Dock.
    Ignore,
}

/// Outcome of resolving a clicked Dock label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub action: Action,
    /// The Dock label that was clicked.
    pub identity: String,
    /// The matched application; `None` for every `Ignore`.
    pub target: Option<RunningApp>,
}

impl Resolution {
    fn ignore(identity: &str) -> Self {
        Self { action: Action::Ignore, identity: identity.to_string(), target: None }
    }
}

/// Maps Dock labels to running applications and carries out the decision.
pub struct ActivationResolver {
    registry: Arc<dyn ProcessRegistry>,
    aliases: AliasTable,
    denylist: HashSet<String>,
}

impl ActivationResolver {
    /// Creates a resolver with the built-in denylist plus `ignored_items`.
    #[must_use]
    pub fn new(registry: Arc<dyn ProcessRegistry>, aliases: AliasTable, ignored_items: &[String]) -> Self {
        let denylist = DENYLIST
            .iter()
            .map(|item| (*item).to_string())
            .chain(ignored_items.iter().cloned())
            .collect();

        Self { registry, aliases, denylist }
    }

    /// Returns whether clicks on `identity` are always left to the Dock.
    #[must_use]
    pub fn is_denied(&self, identity: &str) -> bool { self.denylist.contains(identity) }

    /// Decides what a click on `identity` should do.
    ///
    /// This only reads application state; nothing is changed until
    /// [`execute`](Self::execute) runs.
    #[must_use]
    pub fn resolve(&self, identity: &str) -> Resolution {
        if self.is_denied(identity) {
            tracing::debug!(identity, "dock item is denylisted");
            return Resolution::ignore(identity);
        }

        let app = match self.find_target(identity) {
            Ok(app) => app,
            Err(err) => {
                let running = self.registry.running_names();
                tracing::debug!(
                    error = %err,
                    running = %running.join(" | "),
                    "dock item left to the Dock"
                );
                return Resolution::ignore(identity);
            }
        };

        let action = if !app.is_active || app.is_hidden { Action::Restore } else { Action::Hide };

        tracing::debug!(
            identity,
            pid = app.pid,
            is_active = app.is_active,
            is_hidden = app.is_hidden,
            ?action,
            "resolved dock click"
        );

        Resolution {
            action,
            identity: identity.to_string(),
            target: Some(app),
        }
    }

    /// Maps a Dock label, or its configured alias, to a running application.
    fn find_target(&self, identity: &str) -> Result<RunningApp, ActivationError> {
        let names: Vec<&str> = match self.aliases.lookup(identity) {
            Some(alias) => vec![identity, alias],
            None => vec![identity],
        };

        self.registry
            .find_by_names(&names)
            .ok_or_else(|| ActivationError::NotRunning(identity.to_string()))
    }

    /// Carries out a resolution.
    ///
    /// Restore issues launch-or-activate by Dock label, then unhide, then
    /// activate. Every step runs even if an earlier one fails; the first
    /// failure is returned. Hide issues a single hide request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ActivationError`] raised by the registry. Callers
    /// treat these as non-fatal.
    pub fn execute(&self, resolution: &Resolution) -> Result<(), ActivationError> {
        let Some(app) = resolution.target.as_ref() else {
            return Ok(());
        };

        match resolution.action {
            Action::Ignore => Ok(()),
            Action::Restore => {
                // launch-or-activate must come first; unhide and activate
                // after it give the most consistent result.
                let launched = self.registry.launch_or_activate(&resolution.identity);
                let unhidden = self.registry.unhide(app);
                let activated = self.registry.activate(app);

                tracing::info!(
                    app = %app.name,
                    launched = launched.is_ok(),
                    unhidden = unhidden.is_ok(),
                    activated = activated.is_ok(),
                    "restored application"
                );

                launched.and(unhidden).and(activated)
            }
            Action::Hide => {
                let result = self.registry.hide(app);
                tracing::info!(app = %app.name, success = result.is_ok(), "hid application");
                result
            }
        }
    }
}

impl std::fmt::Debug for ActivationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationResolver")
            .field("aliases", &self.aliases)
            .field("denylist", &self.denylist)
            .finish_non_exhaustive()
    }
}
