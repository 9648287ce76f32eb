use crate::core_storage::path::resolve;
use crate::core_storage::PathError;
use crate::session::Session;
use std::path::PathBuf;

/// Resolves a client path token against the session's root and cwd.
pub fn resolve_path(session: &Session, arg: &str) -> Result<PathBuf, PathError> {
    resolve(&session.root, &session.cwd, arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_session_state() {
        let mut session = Session::new(
            "127.0.0.1:50000".parse().unwrap(),
            "127.0.0.1:21".parse().unwrap(),
            PathBuf::from("/srv/ftp"),
            false,
        );
        session.cwd = "/docs/".to_string();
        assert_eq!(
            resolve_path(&session, "a.txt").unwrap(),
            PathBuf::from("/srv/ftp/docs/a.txt")
        );
        assert!(resolve_path(&session, "../../etc/passwd").is_err());
    }
}
