//! Viewer authorization for share links.
//!
//! Pure functions only: no storage access, no logging. Callers evaluate this
//! before anything is recorded.

use crate::error::{AppError, Result};
use crate::models::{normalize_email, Visibility};

/// PUBLIC links admit everyone. PRIVATE links admit a viewer only when their
/// email is on the whitelist; anonymous viewers never pass.
pub fn is_authorized<'a>(
    visibility: Visibility,
    whitelist: impl IntoIterator<Item = &'a str>,
    viewer_email: Option<&str>,
) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Private => {
            let viewer = match viewer_email.map(normalize_email) {
                Some(email) if !email.is_empty() => email,
                _ => return false,
            };
            whitelist
                .into_iter()
                .any(|allowed| normalize_email(allowed) == viewer)
        }
    }
}

/// `is_authorized` lifted into the error taxonomy.
pub fn authorize<'a>(
    visibility: Visibility,
    whitelist: impl IntoIterator<Item = &'a str>,
    viewer_email: Option<&str>,
) -> Result<()> {
    if is_authorized(visibility, whitelist, viewer_email) {
        Ok(())
    } else if viewer_email.map_or(true, |e| e.trim().is_empty()) {
        Err(AppError::Unauthorized(
            "Sign in to view this private link".to_string(),
        ))
    } else {
        Err(AppError::Unauthorized(
            "You are not on the whitelist for this link".to_string(),
        ))
    }
}
