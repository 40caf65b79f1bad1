//! Error reporting for the binary.

use anyhow::Error;
use colored::Colorize;
use seq80_backend_audio::AudioError;
use seq80_backend_export::ExportError;
use seq80_spec::{BackendError, SpecError};

/// Finds the first backend error in the chain and returns its code.
///
/// Wrapped errors report the code of the error they wrap, so a bad tempo
/// reads `SPEC_002` whether it surfaced from rendering or exporting.
pub fn error_code(err: &Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ExportError>() {
            Some(export_code(e))
        } else if let Some(e) = cause.downcast_ref::<AudioError>() {
            Some(audio_code(e))
        } else {
            cause.downcast_ref::<SpecError>().map(|e| e.code())
        }
    })
}

fn export_code(err: &ExportError) -> &'static str {
    match err {
        ExportError::Spec(inner) => inner.code(),
        ExportError::Audio(inner) => audio_code(inner),
        other => other.code(),
    }
}

fn audio_code(err: &AudioError) -> &'static str {
    match err {
        AudioError::Spec(inner) => inner.code(),
        other => other.code(),
    }
}

/// Formats an error for stderr: `error[CODE]: context: cause`.
pub fn format_error(err: &Error) -> String {
    let label = match error_code(err) {
        Some(code) => format!("error[{}]", code),
        None => "error".to_string(),
    };
    format!("{}: {:#}", label.red().bold(), err)
}
