use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::LoginError;
use crate::models::views::NEUTRAL_BACKGROUND;
use crate::models::{Credentials, NewUser, SessionUser, UserType};
use crate::services::navigation::{Navigator, Route};
use crate::services::session::Session;
use crate::services::store::Store;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Where the login page hands over, and the page background to restore.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Handoff {
    pub route: Route,
    pub background_color: &'static str,
}

pub struct LoginController {
    store: Option<Arc<dyn Store>>,
    navigator: Arc<dyn Navigator>,
    session: Session,
    previous_location: Option<Route>,
}

impl LoginController {
    pub fn new(store: Option<Arc<dyn Store>>, navigator: Arc<dyn Navigator>, session: Session) -> Self {
        LoginController {
            store,
            navigator,
            session,
            previous_location: None,
        }
    }

    pub fn previous_location(&self) -> Option<Route> {
        self.previous_location
    }

    pub async fn handle_submit_employee(&mut self, form: &LoginForm) -> Result<Handoff, LoginError> {
        self.submit(UserType::Employee, form, Route::Bills).await
    }

    pub async fn handle_submit_admin(&mut self, form: &LoginForm) -> Result<Handoff, LoginError> {
        self.submit(UserType::Admin, form, Route::Dashboard).await
    }

    async fn submit(&mut self, user_type: UserType, form: &LoginForm, home: Route) -> Result<Handoff, LoginError> {
        let user = SessionUser::connected(user_type, &form.email, &form.password);
        self.session.save_user(&user)?;

        // rejected credentials mean a first visit: register, then log in
        match self.login(&user).await {
            Ok(_) => {}
            Err(LoginError::Store(err)) => {
                info!("Login failed for {} ({}), registering", user.email, err);
                self.create_user(&user).await?;
            }
            Err(err) => return Err(err),
        }

        self.navigator.navigate(home);
        self.previous_location = Some(home);
        Ok(Handoff {
            route: home,
            background_color: NEUTRAL_BACKGROUND,
        })
    }

    /// Returns the session token, or `None` when no store is configured.
    pub async fn login(&self, user: &SessionUser) -> Result<Option<String>, LoginError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let credentials = serde_json::to_string(&Credentials {
            email: user.email.clone(),
            password: user.password.clone(),
        })?;
        let token = store.login(&credentials).await?;
        self.session.save_token(&token.jwt)?;
        Ok(Some(token.jwt))
    }

    pub async fn create_user(&self, user: &SessionUser) -> Result<Option<String>, LoginError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let data = serde_json::to_string(&NewUser {
            user_type: user.user_type,
            name: user.email.split('@').next().unwrap_or_default().to_string(),
            email: user.email.clone(),
            password: user.password.clone(),
        })?;
        store.create_user(&data).await?;
        info!("User with {} is created", user.email);
        self.login(user).await
    }
}
