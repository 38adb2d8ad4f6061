//! User-facing hints for common CLI failures.

use anyhow::Error;
use vvs_core::AppError;

const HINT_NOT_FOUND: &str = "hint: check the id against the snapshot passed with --tree";
const HINT_UNKNOWN_USER: &str =
    "hint: add the user to the snapshot's \"users\" list, or omit --user for anonymous access";
const HINT_GEOMETRY: &str =
    "hint: rectangles and rulers need firstPoint and secondPoint; polygons need points";
const HINT_NO_SOURCES: &str =
    "hint: the item or folder has no loadable files; session and config files are skipped";
const HINT_SETTINGS: &str = "hint: compare your settings file with 'vvs config template'";
const HINT_SNAPSHOT: &str =
    "hint: --tree expects a JSON object with \"folders\", \"items\", \"files\" and \"users\"";

pub fn suggest_fix(err: &Error) -> Option<String> {
    for cause in err.chain() {
        if let Some(app_err) = cause.downcast_ref::<AppError>() {
            match app_err {
                AppError::NotFound { .. } => return Some(HINT_NOT_FOUND.to_string()),
                AppError::UnknownUser(_) => return Some(HINT_UNKNOWN_USER.to_string()),
                AppError::MissingGeometry { .. } => return Some(HINT_GEOMETRY.to_string()),
                AppError::Validation(message) if message.contains("source") => {
                    return Some(HINT_NO_SOURCES.to_string());
                }
                _ => {}
            }
        }
    }

    let chain_text = err
        .chain()
        .map(|cause| cause.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(" | ");

    if chain_text.contains("settings")
        && (chain_text.contains("parse") || chain_text.contains("read"))
    {
        return Some(HINT_SETTINGS.to_string());
    }

    if chain_text.contains("resource snapshot") && chain_text.contains("parse") {
        return Some(HINT_SNAPSHOT.to_string());
    }

    None
}
