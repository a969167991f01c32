//! In-memory fakes shared by unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::activation::{ProcessRegistry, RunningApp};
use crate::error::ActivationError;

/// A process-control request recorded by [`FakeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LaunchOrActivate(String),
    Unhide(String),
    Activate(String),
    Hide(String),
}

/// Registry backed by a fixed app list that records every command.
#[derive(Default)]
pub struct FakeRegistry {
    apps: Mutex<Vec<RunningApp>>,
    commands: Mutex<Vec<Command>>,
    lookups: Mutex<usize>,
    refuse_hide: bool,
}

impl FakeRegistry {
    pub fn with_apps(apps: Vec<RunningApp>) -> Arc<Self> {
        Arc::new(Self { apps: Mutex::new(apps), ..Default::default() })
    }

    pub fn refusing_hide(apps: Vec<RunningApp>) -> Arc<Self> {
        Arc::new(Self { apps: Mutex::new(apps), refuse_hide: true, ..Default::default() })
    }

    pub fn commands(&self) -> Vec<Command> { self.commands.lock().clone() }

    pub fn lookups(&self) -> usize { *self.lookups.lock() }
}

impl ProcessRegistry for FakeRegistry {
    fn find_by_names(&self, names: &[&str]) -> Option<RunningApp> {
        *self.lookups.lock() += 1;
        self.apps.lock().iter().find(|app| names.contains(&app.name.as_str())).cloned()
    }

    fn running_names(&self) -> Vec<String> { self.apps.lock().iter().map(|a| a.name.clone()).collect() }

    fn launch_or_activate(&self, name: &str) -> Result<(), ActivationError> {
        self.commands.lock().push(Command::LaunchOrActivate(name.to_string()));
        Ok(())
    }

    fn unhide(&self, app: &RunningApp) -> Result<(), ActivationError> {
        self.commands.lock().push(Command::Unhide(app.name.clone()));
        Ok(())
    }

    fn activate(&self, app: &RunningApp) -> Result<(), ActivationError> {
        self.commands.lock().push(Command::Activate(app.name.clone()));
        Ok(())
    }

    fn hide(&self, app: &RunningApp) -> Result<(), ActivationError> {
        self.commands.lock().push(Command::Hide(app.name.clone()));
        if self.refuse_hide {
            return Err(ActivationError::Refused { step: "hide", name: app.name.clone() });
        }
        Ok(())
    }
}

pub fn app(name: &str, is_active: bool, is_hidden: bool) -> RunningApp {
    RunningApp { pid: 100, name: name.to_string(), is_active, is_hidden }
}
