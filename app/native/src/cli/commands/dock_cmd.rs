//! One-shot Dock layout dump.

use crate::dock::IconRecord;
use crate::error::Click2HideError;

/// Reads the Dock layout once and prints it.
///
/// # Errors
///
/// Returns an error if the layout cannot be read, including when the process
/// lacks Accessibility permission.
pub fn execute(json: bool) -> Result<(), Click2HideError> {
    let icons = resolve()?;
    println!("{}", render(&icons, json)?);
    Ok(())
}

/// Formats icons as pretty JSON or as an aligned `identity rect` table.
fn render(icons: &[IconRecord], json: bool) -> Result<String, Click2HideError> {
    if json {
        return Ok(serde_json::to_string_pretty(icons)?);
    }

    Ok(icons
        .iter()
        .map(|icon| format!("{:<32} {}", icon.identity, icon.rect))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(target_os = "macos")]
fn resolve() -> Result<Vec<IconRecord>, Click2HideError> {
    use crate::dock::IconLayoutProvider;
    use crate::platform::AxDockLayoutProvider;

    Ok(AxDockLayoutProvider.resolve()?)
}

#[cfg(not(target_os = "macos"))]
fn resolve() -> Result<Vec<IconRecord>, Click2HideError> {
    Err(crate::error::IntrospectionError::Unsupported.into())
}
