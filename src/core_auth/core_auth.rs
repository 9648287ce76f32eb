use crate::config::{AnonymousConfig, Config, Permissions, UserConfig};
use crate::constants::ANONYMOUS_USER;
use crate::core_auth::helper::{password_matches, user_root};
use log::debug;
use std::path::{Path, PathBuf};

/// What USER tells the client to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    /// Unknown user, or anonymous while anonymous access is off.
    None,
    Anonymous,
    Password,
    NoPassword,
}

/// The effective rights of a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub permissions: Permissions,
    pub root: PathBuf,
}

/// The single default account from `[server]`.
#[derive(Debug, Clone)]
struct DefaultUser {
    username: String,
    password: Option<String>,
    allow_login_without_password: bool,
    permissions: Permissions,
}

/// Resolves credentials against anonymous access, the user list and the
/// default account, in that order. The default account is consulted only
/// when no user list is configured.
#[derive(Debug, Clone)]
pub struct AuthManager {
    anonymous: AnonymousConfig,
    users: Vec<UserConfig>,
    default_user: Option<DefaultUser>,
    default_root: PathBuf,
}

impl AuthManager {
    pub fn new(config: &Config, default_root: PathBuf) -> Self {
        let default_user = config.server.username.as_ref().map(|username| DefaultUser {
            username: username.clone(),
            password: config.server.password.clone(),
            allow_login_without_password: config.server.allow_login_without_password,
            permissions: config.server.permissions,
        });

        Self {
            anonymous: config.anonymous.clone(),
            users: config.users.clone(),
            default_user,
            default_root,
        }
    }

    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    fn is_anonymous(&self, username: &str) -> bool {
        username == ANONYMOUS_USER && self.anonymous.allow_login
    }

    fn find_user(&self, username: &str) -> Option<&UserConfig> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn evaluate_user(&self, username: &str) -> LoginType {
        if self.is_anonymous(username) {
            return LoginType::Anonymous;
        }

        if !self.users.is_empty() {
            return match self.find_user(username) {
                Some(user) if user.allow_login_without_password => LoginType::NoPassword,
                Some(_) => LoginType::Password,
                None => LoginType::None,
            };
        }

        match &self.default_user {
            Some(user) if user.username == username => {
                if user.allow_login_without_password {
                    LoginType::NoPassword
                } else {
                    LoginType::Password
                }
            }
            _ => LoginType::None,
        }
    }

    /// Returns the grant for a successful login and `None` for anything else.
    /// `password` is `None` when USER alone is expected to log in.
    pub async fn authenticate(&self, username: &str, password: Option<&str>) -> Option<Grant> {
        let grant = if self.is_anonymous(username) {
            Some(Grant {
                permissions: self.anonymous.permissions(),
                root: self.default_root.clone(),
            })
        } else if !self.users.is_empty() {
            match self.find_user(username) {
                Some(user)
                    if user.allow_login_without_password
                        || password_matches(user.password.as_deref(), password) =>
                {
                    Some(Grant {
                        permissions: user.permissions,
                        root: user_root(&self.default_root, user.basefolder.as_deref()).await,
                    })
                }
                _ => None,
            }
        } else {
            match &self.default_user {
                Some(user)
                    if user.username == username
                        && (user.allow_login_without_password
                            || password_matches(user.password.as_deref(), password)) =>
                {
                    Some(Grant {
                        permissions: user.permissions,
                        root: self.default_root.clone(),
                    })
                }
                _ => None,
            }
        };

        debug!(
            "authenticate success[{}] username[{}]",
            grant.is_some(),
            username
        );
        grant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn config_with_users(users: Vec<UserConfig>) -> Config {
        Config {
            users,
            ..Config::default()
        }
    }

    fn manager(config: &Config) -> AuthManager {
        AuthManager::new(config, PathBuf::from("/srv/ftp"))
    }

    #[test]
    fn anonymous_disabled_by_default() {
        let auth = manager(&Config::default());
        assert_eq!(auth.evaluate_user("anonymous"), LoginType::None);
    }

    #[tokio::test]
    async fn anonymous_gets_its_own_permission_block() {
        let mut config = Config::default();
        config.anonymous.allow_login = true;
        config.anonymous.allow_file_retrieve = true;
        let auth = manager(&config);

        assert_eq!(auth.evaluate_user("anonymous"), LoginType::Anonymous);
        let grant = auth.authenticate("anonymous", Some("guest@")).await.unwrap();
        assert!(grant.permissions.allow_file_retrieve);
        assert!(!grant.permissions.allow_file_create);
        assert_eq!(grant.root, PathBuf::from("/srv/ftp"));
    }

    #[tokio::test]
    async fn user_without_password() {
        let auth = manager(&config_with_users(vec![UserConfig::without_password("john")]));
        assert_eq!(auth.evaluate_user("john"), LoginType::NoPassword);
        let grant = auth.authenticate("john", None).await.unwrap();
        assert_eq!(grant.permissions, Permissions::allow_all());
    }

    #[tokio::test]
    async fn first_matching_entry_wins() {
        let mut restricted = UserConfig::new("john", "doe");
        restricted.permissions.allow_file_delete = false;
        let auth = manager(&config_with_users(vec![
            restricted,
            UserConfig::new("john", "other"),
        ]));

        assert_eq!(auth.evaluate_user("john"), LoginType::Password);
        let grant = auth.authenticate("john", Some("doe")).await.unwrap();
        assert!(!grant.permissions.allow_file_delete);
        assert!(auth.authenticate("john", Some("other")).await.is_none());
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user_fails() {
        let auth = manager(&config_with_users(vec![UserConfig::new("john", "doe")]));
        assert!(auth.authenticate("john", Some("wrong")).await.is_none());
        assert!(auth.authenticate("john", None).await.is_none());
        assert_eq!(auth.evaluate_user("jane"), LoginType::None);
        assert!(auth.authenticate("jane", Some("doe")).await.is_none());
    }

    #[tokio::test]
    async fn default_user_only_without_user_list() {
        let server = ServerConfig {
            username: Some("ftp".to_string()),
            password: Some("secret".to_string()),
            ..ServerConfig::default()
        };
        let mut config = Config {
            server,
            ..Config::default()
        };
        let auth = manager(&config);
        assert_eq!(auth.evaluate_user("ftp"), LoginType::Password);
        assert!(auth.authenticate("ftp", Some("secret")).await.is_some());

        config.users.push(UserConfig::new("john", "doe"));
        let auth = manager(&config);
        assert_eq!(auth.evaluate_user("ftp"), LoginType::None);
        assert!(auth.authenticate("ftp", Some("secret")).await.is_none());
    }

    #[tokio::test]
    async fn user_basefolder_is_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut john = UserConfig::new("john", "doe");
        john.basefolder = Some(dir.path().to_path_buf());
        let mut jane = UserConfig::new("jane", "doe");
        jane.basefolder = Some(dir.path().join("missing"));
        let auth = manager(&config_with_users(vec![john, jane]));

        let grant = auth.authenticate("john", Some("doe")).await.unwrap();
        assert_eq!(grant.root, dir.path());
        let grant = auth.authenticate("jane", Some("doe")).await.unwrap();
        assert_eq!(grant.root, PathBuf::from("/srv/ftp"));
    }
}
