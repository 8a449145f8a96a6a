//! Account manager: registration, login, logout and root-admin bootstrap.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{AccountCommands, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::service_support::{
    map_password_hash_error, map_user_persistence_error, Auditor,
};
use crate::domain::{
    audit::user_target, AuditAction, AuditOutcome, Error, LoginCredentials, PasswordHash,
    PasswordPolicy, RegistrationError, RegistrationForm, Role, Session, SessionGrant, User,
    UserAccount, UserId, Username,
};

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

const DUMMY_PASSWORD: &str = "timing-equaliser-Pa55!";

/// Audit target for a username that may not be valid, without echoing
/// unvalidated input.
fn login_target(raw: &str) -> String {
    match Username::new(raw) {
        Ok(username) => user_target(username),
        Err(_) => user_target("<invalid>"),
    }
}

/// Service implementing [`AccountCommands`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    auditor: Auditor,
    policy: PasswordPolicy,
    dummy_hash: Arc<OnceLock<Option<PasswordHash>>>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        auditor: Auditor,
    ) -> Self {
        Self {
            users,
            hasher,
            auditor,
            policy: PasswordPolicy::default(),
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Spend the same verification work as a real login for an unknown user.
    fn verify_against_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_init(|| self.hasher.hash(DUMMY_PASSWORD).ok());
        if let Some(hash) = dummy {
            let _timing = self.hasher.verify(password, hash);
        }
    }

    /// Create the root administrator when missing, or restore its admin role.
    ///
    /// Returns the root administrator's id.
    pub async fn ensure_root_admin(&self, username: &str, password: &str) -> Result<UserId, Error> {
        let username = Username::new(username)
            .map_err(|err| Error::invalid_request(format!("root admin username: {err}")))?;
        let existing = self
            .users
            .find_by_username(username.as_ref())
            .await
            .map_err(map_user_persistence_error)?;

        if let Some(account) = existing {
            let id = account.user.id();
            if account.user.role() != Role::Admin {
                warn!(user_id = %id, "root admin had lost the admin role; restoring it");
                self.users
                    .set_role(&id, Role::Admin)
                    .await
                    .map_err(map_user_persistence_error)?;
                self.auditor
                    .success(Some(id), AuditAction::BootstrapAdmin, user_target(&username))
                    .await;
            }
            return Ok(id);
        }

        let failed = self.policy.violations(password);
        if !failed.is_empty() {
            return Err(RegistrationError::WeakPassword { failed }.into());
        }
        let password_hash = self.hasher.hash(password).map_err(map_password_hash_error)?;
        let user = User::new(UserId::random(), username.clone(), Role::Admin);
        let id = user.id();
        self.users
            .create(&UserAccount {
                user,
                password_hash,
            })
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %id, "created root admin account");
        self.auditor
            .success(Some(id), AuditAction::BootstrapAdmin, user_target(&username))
            .await;
        Ok(id)
    }

    async fn reject_registration(&self, target: String, error: RegistrationError) -> Error {
        self.auditor
            .record(
                None,
                AuditAction::Register,
                target,
                AuditOutcome::Failed,
                Some(error.to_string()),
            )
            .await;
        error.into()
    }
}

#[async_trait]
impl AccountCommands for AccountService {
    async fn register(&self, form: RegistrationForm) -> Result<UserId, Error> {
        let target = login_target(&form.username);
        let validated = match form.validate(&self.policy) {
            Ok(validated) => validated,
            Err(err) => return Err(self.reject_registration(target, err).await),
        };

        let taken = self
            .users
            .find_by_username(validated.username.as_ref())
            .await
            .map_err(map_user_persistence_error)?
            .is_some();
        if taken {
            return Err(self
                .reject_registration(target, RegistrationError::UsernameTaken)
                .await);
        }

        let password_hash = self
            .hasher
            .hash(&validated.password)
            .map_err(map_password_hash_error)?;
        let user = User::new(UserId::random(), validated.username, Role::Public);
        let id = user.id();
        match self
            .users
            .create(&UserAccount {
                user,
                password_hash,
            })
            .await
        {
            Ok(()) => {}
            Err(UserPersistenceError::DuplicateUsername) => {
                return Err(self
                    .reject_registration(target, RegistrationError::UsernameTaken)
                    .await);
            }
            Err(err) => return Err(map_user_persistence_error(err)),
        }

        info!(user_id = %id, "registered account");
        self.auditor
            .success(Some(id), AuditAction::Register, target)
            .await;
        Ok(id)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let account = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_persistence_error)?;

        let verified = match &account {
            Some(account) => self
                .hasher
                .verify(credentials.password(), &account.password_hash)
                .map_err(map_password_hash_error)?,
            None => {
                self.verify_against_dummy(credentials.password());
                false
            }
        };

        let target = login_target(credentials.username());
        match account.filter(|_| verified) {
            Some(account) => {
                let user = account.user;
                let grant =
                    SessionGrant::issue(user.id(), self.auditor.now(), credentials.remember_me());
                self.auditor
                    .success(Some(user.id()), AuditAction::Login, target)
                    .await;
                Ok(Session { user, grant })
            }
            None => {
                self.auditor
                    .record(None, AuditAction::Login, target, AuditOutcome::Failed, None)
                    .await;
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    async fn logout(&self, user_id: Option<UserId>) {
        let Some(id) = user_id else {
            return;
        };
        if let Err(err) = self.users.revoke_sessions(&id, self.auditor.now()).await {
            warn!(user_id = %id, error = %err, "failed to revoke sessions on logout");
        }
        self.auditor
            .success(Some(id), AuditAction::Logout, user_target(id))
            .await;
    }

    async fn resolve_grant(&self, grant: &SessionGrant) -> Result<Option<User>, Error> {
        let revoked_at = self
            .users
            .sessions_revoked_at(&grant.user_id)
            .await
            .map_err(map_user_persistence_error)?;
        if revoked_at.is_some_and(|at| grant.issued_at <= at) {
            return Ok(None);
        }
        self.resolve_user(&grant.user_id).await
    }

    async fn resolve_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage with mocked ports; end-to-end flows live in
    //! `tests/accounts.rs`.
    use super::*;
    use crate::domain::ports::{MockAuditLog, MockPasswordHasher, MockUserRepository};
    use crate::domain::ErrorCode;
    use mockable::DefaultClock;
    use rstest::rstest;

    fn quiet_auditor() -> Auditor {
        let mut log = MockAuditLog::new();
        log.expect_record().returning(|_| Ok(()));
        Auditor::new(Arc::new(log), Arc::new(DefaultClock))
    }

    fn plain_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(hash.as_str() == format!("hashed:{password}")));
        hasher
    }

    fn service(users: MockUserRepository, hasher: MockPasswordHasher) -> AccountService {
        AccountService::new(Arc::new(users), Arc::new(hasher), quiet_auditor())
    }

    #[rstest]
    #[tokio::test]
    async fn insert_race_reports_username_taken() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(UserPersistenceError::duplicate_username()));
        let service = service(users, plain_hasher());

        let err = service
            .register(RegistrationForm::new("alice", "Abc12345!", "Abc12345!"))
            .await
            .expect_err("duplicate insert");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn storage_outage_is_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Err(UserPersistenceError::connection("refused")));
        let service = service(users, plain_hasher());

        let creds = LoginCredentials::try_from_parts("alice", "Abc12345!", false).expect("shape");
        let err = service.authenticate(&creds).await.expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_still_runs_verification() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok(PasswordHash::new("dummy")));
        hasher.expect_verify().times(1).returning(|_, _| Ok(false));
        let service = service(users, hasher);

        let creds = LoginCredentials::try_from_parts("bob", "whatever", false).expect("shape");
        let err = service.authenticate(&creds).await.expect_err("unknown user");
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_root_admin_regains_admin_role() {
        let id = UserId::random();
        let username = Username::new("root").expect("valid");
        let mut users = MockUserRepository::new();
        let account = UserAccount {
            user: User::new(id, username, Role::Owner),
            password_hash: PasswordHash::new("hashed:x"),
        };
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(account.clone())));
        users
            .expect_set_role()
            .withf(move |target, role| *target == id && *role == Role::Admin)
            .times(1)
            .returning(|_, _| Ok(true));
        let service = service(users, plain_hasher());

        let root = service
            .ensure_root_admin("root", "Adm1n!pass")
            .await
            .expect("bootstrap");
        assert_eq!(root, id);
    }

    #[rstest]
    #[tokio::test]
    async fn logout_revokes_grants_issued_up_to_now() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_revoke_sessions()
            .withf(move |target, _| *target == id)
            .times(1)
            .returning(|_, _| Ok(true));
        let service = service(users, plain_hasher());

        service.logout(Some(id)).await;
    }

    #[rstest]
    #[tokio::test]
    async fn logout_survives_a_storage_outage() {
        let mut users = MockUserRepository::new();
        users
            .expect_revoke_sessions()
            .returning(|_, _| Err(UserPersistenceError::connection("refused")));
        let service = service(users, plain_hasher());

        service.logout(Some(UserId::random())).await;
    }

    #[rstest]
    #[case(-1, false)]
    #[case(0, false)]
    #[case(1, true)]
    #[tokio::test]
    async fn grants_issued_before_a_logout_no_longer_resolve(
        #[case] issued_after_revocation_secs: i64,
        #[case] resolves: bool,
    ) {
        let revoked_at = chrono::Utc::now();
        let user = User::new(
            UserId::random(),
            Username::new("alice").expect("valid"),
            Role::Public,
        );
        let id = user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_sessions_revoked_at()
            .returning(move |_| Ok(Some(revoked_at)));
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let service = service(users, plain_hasher());

        let grant = SessionGrant::issue(
            id,
            revoked_at + chrono::Duration::seconds(issued_after_revocation_secs),
            false,
        );
        let resolved = service.resolve_grant(&grant).await.expect("lookup");
        assert_eq!(resolved.is_some(), resolves);
    }
}
