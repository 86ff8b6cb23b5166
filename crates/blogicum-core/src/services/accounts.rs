use super::BlogService;
use crate::context::RequestContext;
use crate::domain::User;
use crate::error::{DomainError, ValidationErrors};
use crate::forms::{PasswordChangeForm, RegistrationForm};
use crate::ports::{AuthError, PasswordService};

fn hashing_failed(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}

impl BlogService {
    /// Create an account. Usernames are unique.
    pub async fn register(
        &self,
        form: RegistrationForm,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let form = form.validate()?;

        if self
            .repos
            .users
            .find_by_username(&form.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate(format!(
                "Username {} is already taken",
                form.username
            )));
        }

        let password_hash = passwords.hash(&form.password).map_err(hashing_failed)?;
        let mut user = User::new(form.username, form.email, password_hash);
        user.first_name = form.first_name;
        user.last_name = form.last_name;

        let user = self.repos.users.save(user).await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials. Unknown usernames and wrong passwords look the same.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let Some(user) = self.repos.users.find_by_username(username).await? else {
            return Err(DomainError::Unauthorized);
        };

        if !passwords
            .verify(password, &user.password_hash)
            .map_err(hashing_failed)?
        {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    /// Make sure a staff account named `form.username` exists, promoting an
    /// existing user or registering a new one.
    pub async fn ensure_staff(
        &self,
        form: RegistrationForm,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let mut user = match self.repos.users.find_by_username(&form.username).await? {
            Some(user) if user.is_staff => return Ok(user),
            Some(user) => user,
            None => self.register(form, passwords).await?,
        };

        user.is_staff = true;
        let user = self.repos.users.save(user).await?;
        tracing::info!(user_id = user.id, "Staff account ready");
        Ok(user)
    }

    /// Replace the requester's password after checking the current one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        form: PasswordChangeForm,
        passwords: &dyn PasswordService,
    ) -> Result<User, DomainError> {
        let form = form.validate()?;
        let mut user = self.own_profile(ctx).await?;

        if !passwords
            .verify(&form.old_password, &user.password_hash)
            .map_err(hashing_failed)?
        {
            let mut errors = ValidationErrors::new();
            errors.add(
                "old_password",
                "Your old password was entered incorrectly. Please enter it again.",
            );
            return Err(DomainError::Validation(errors));
        }

        user.password_hash = passwords
            .hash(&form.new_password)
            .map_err(hashing_failed)?;
        let user = self.repos.users.save(user).await?;
        tracing::info!(user_id = user.id, "Password changed");
        Ok(user)
    }
}
