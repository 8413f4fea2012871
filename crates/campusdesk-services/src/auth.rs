//! Signup and login controllers
//!
//! Both validate locally before anything is sent and allow one request in
//! flight. Login writes the returned token and profile to the session store;
//! logout clears it.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use campusdesk_core::models::{LoginResponse, SignupField, SignupFields};
use campusdesk_core::validation::{validate_login, validate_signup, LoginFields};
use campusdesk_core::{
    AuthBackend, ClientError, ErrorMetadata, FieldErrorKind, FieldErrors, Session, SessionStore,
};

use crate::inflight::InFlight;
use crate::notification::{log_client_error, Notification};

const MOBILE_DIGITS: usize = 10;
const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";
const SIGNUP_FAILURE_MESSAGE: &str = "Signup failed. Please try again.";
const LOGIN_FAILURE_MESSAGE: &str = "Login failed. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Succeeded(Notification),
    /// Local validation blocked the request; nothing was sent.
    Rejected(FieldErrors),
    Failed {
        error: ClientError,
        notification: Notification,
    },
    /// The controller was torn down before the response arrived.
    Discarded,
}

/// Keep only digits, at most ten of them.
fn sanitize_mobile(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(MOBILE_DIGITS)
        .collect()
}

pub struct SignupController {
    backend: Arc<dyn AuthBackend>,
    fields: SignupFields,
    errors: FieldErrors,
    in_flight: InFlight<()>,
    lifetime: CancellationToken,
}

impl SignupController {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            fields: SignupFields::default(),
            errors: FieldErrors::new(),
            in_flight: InFlight::new(),
            lifetime: CancellationToken::new(),
        }
    }

    pub fn fields(&self) -> &SignupFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_pending()
    }

    /// Update one field and clear its error. Mobile input is reduced to digits.
    pub fn set_field(&mut self, field: SignupField, value: impl Into<String>) {
        let value = value.into();
        let value = match field {
            SignupField::Mobile => sanitize_mobile(&value),
            _ => value,
        };
        self.fields.set(field, value);
        self.errors.clear(field.as_str());
    }

    pub async fn submit(&mut self) -> Result<AuthOutcome, ClientError> {
        if self.in_flight.is_pending() {
            return Err(ClientError::SubmissionInFlight);
        }

        if let Err(errors) = validate_signup(&self.fields) {
            tracing::debug!(fields = %errors, "Signup blocked by validation");
            self.errors = errors.clone();
            return Ok(AuthOutcome::Rejected(errors));
        }
        let Some(request) = self.fields.to_request() else {
            let mut errors = FieldErrors::new();
            errors.add(
                SignupField::Gender.as_str(),
                FieldErrorKind::MissingField,
                "Gender is required",
            );
            self.errors = errors.clone();
            return Ok(AuthOutcome::Rejected(errors));
        };
        self.errors.clear_all();

        let backend = Arc::clone(&self.backend);
        self.in_flight
            .start(async move { backend.signup(&request).await })?;

        Ok(self.settle().await.unwrap_or(AuthOutcome::Discarded))
    }

    pub async fn settle(&mut self) -> Option<AuthOutcome> {
        let result = self.in_flight.wait().await?;
        if self.lifetime.is_cancelled() {
            tracing::debug!("Discarding signup response after teardown");
            return Some(AuthOutcome::Discarded);
        }

        match result {
            Ok(()) => {
                tracing::info!(mobile = %self.fields.mobile, "Account created");
                Some(AuthOutcome::Succeeded(Notification::success(
                    "Account created successfully! Redirecting to login...",
                )))
            }
            Err(error) => {
                log_client_error(&error, "signup");
                let message = self.signup_failure_message(&error);
                Some(AuthOutcome::Failed {
                    error,
                    notification: Notification::error(message),
                })
            }
        }
    }

    pub fn teardown(&self) {
        self.lifetime.cancel();
    }

    /// The server reports duplicates only as free text naming the field.
    fn signup_failure_message(&mut self, error: &ClientError) -> String {
        if let ClientError::Transport(_) = error {
            return TRANSPORT_FAILURE_MESSAGE.to_string();
        }
        let Some(server_message) = error.server_message() else {
            return SIGNUP_FAILURE_MESSAGE.to_string();
        };
        let (field, message) = match ClientError::conflict_field(server_message) {
            Some("email") => (SignupField::Email, "This email is already registered"),
            Some("mobile") => (SignupField::Mobile, "This mobile number is already registered"),
            _ => return server_message.to_string(),
        };
        self.errors
            .add(field.as_str(), FieldErrorKind::Conflict, message);
        message.to_string()
    }
}

pub struct LoginController {
    backend: Arc<dyn AuthBackend>,
    fields: LoginFields,
    errors: FieldErrors,
    in_flight: InFlight<LoginResponse>,
    lifetime: CancellationToken,
}

impl LoginController {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            fields: LoginFields::default(),
            errors: FieldErrors::new(),
            in_flight: InFlight::new(),
            lifetime: CancellationToken::new(),
        }
    }

    pub fn fields(&self) -> &LoginFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_mobile(&mut self, value: impl Into<String>) {
        self.fields.mobile = value.into();
        self.errors.clear("mobile");
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.fields.password = value.into();
        self.errors.clear("password");
    }

    /// Log in and, on success, replace the stored session.
    pub async fn submit(&mut self, session: &mut SessionStore) -> Result<AuthOutcome, ClientError> {
        if self.in_flight.is_pending() {
            return Err(ClientError::SubmissionInFlight);
        }

        if let Err(errors) = validate_login(&self.fields) {
            tracing::debug!(fields = %errors, "Login blocked by validation");
            self.errors = errors.clone();
            return Ok(AuthOutcome::Rejected(errors));
        }
        self.errors.clear_all();

        let request = self.fields.to_request();
        let backend = Arc::clone(&self.backend);
        self.in_flight
            .start(async move { backend.login(&request).await })?;

        Ok(self.settle(session).await.unwrap_or(AuthOutcome::Discarded))
    }

    pub async fn settle(&mut self, session: &mut SessionStore) -> Option<AuthOutcome> {
        let result = self.in_flight.wait().await?;
        if self.lifetime.is_cancelled() {
            tracing::debug!("Discarding login response after teardown");
            return Some(AuthOutcome::Discarded);
        }

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                log_client_error(&error, "login");
                let message = login_failure_message(&error);
                return Some(AuthOutcome::Failed {
                    error,
                    notification: Notification::error(message),
                });
            }
        };

        let session_data = Session::from(response);
        if let Err(error) = session.set(session_data) {
            log_client_error(&error, "login");
            let notification = Notification::error(error.client_message());
            return Some(AuthOutcome::Failed {
                error,
                notification,
            });
        }
        tracing::info!(mobile = %self.fields.mobile, "Logged in");
        Some(AuthOutcome::Succeeded(Notification::success(
            "Login successful! Redirecting...",
        )))
    }

    pub fn teardown(&self) {
        self.lifetime.cancel();
    }
}

fn login_failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Auth(_) => "Invalid credentials".to_string(),
        ClientError::Server { status: 401, .. } => "Invalid credentials".to_string(),
        ClientError::Server { status: 404, .. } => "Mobile number not registered".to_string(),
        _ => error
            .server_message()
            .unwrap_or(LOGIN_FAILURE_MESSAGE)
            .to_string(),
    }
}

/// Forget the stored session.
pub fn logout(session: &mut SessionStore) -> Notification {
    match session.clear() {
        Ok(()) => {
            tracing::info!("Logged out");
            Notification::success("Logged out")
        }
        Err(error) => {
            log_client_error(&error, "logout");
            Notification::error(error.client_message())
        }
    }
}
