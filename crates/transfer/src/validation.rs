use crate::TransferError;

/// Validates an absolute remote path before it is sent to the server.
///
/// The server refuses to write anything it would treat as hidden, so this
/// rejects up front:
/// - Empty paths and the bare root
/// - Relative paths
/// - Any segment starting with `.` (which also covers `.` and `..`)
/// - Empty segments (`//`)
pub fn validate_remote_path(path: &str) -> Result<(), TransferError> {
    let Some(rel) = path.strip_prefix('/') else {
        return Err(TransferError::InvalidPath(format!(
            "relative path not allowed: {path}"
        )));
    };

    if rel.is_empty() {
        return Err(TransferError::InvalidPath("empty path".into()));
    }

    for segment in rel.split('/') {
        if segment.is_empty() {
            return Err(TransferError::InvalidPath(format!(
                "empty segment not allowed: {path}"
            )));
        }
        if segment.starts_with('.') {
            return Err(TransferError::InvalidPath(format!(
                "hidden segment not allowed: {path}"
            )));
        }
    }

    Ok(())
}
