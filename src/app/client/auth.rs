//! Portal login and team selection
//!
//! [`Authenticator::ensure_ready`] fetches a page and, when the portal answers
//! with the login form or the team-selection form instead of the requested
//! content, fills in the form and fetches the page again. A session that is
//! already logged in skips the login step on its own because the form is no
//! longer served; team selection is checked on every call since only some
//! pages ask for it.

use url::Url;

use crate::app::client::form::HtmlForm;
use crate::app::client::page::Page;
use crate::app::client::PortalClient;
use crate::auth::Credentials;
use crate::constants::auth;
use crate::errors::{AuthError, AuthResult};

/// Where the session stands
///
/// A successful `ensure_ready` always ends in `Ready`; the states passed
/// through on the way are kept in [`Authenticator::transitions`]. A call that
/// fails after the login was accepted leaves the session `Authenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No login has been submitted yet
    Anonymous,
    /// Credentials were accepted
    Authenticated,
    /// A team was selected
    TeamSelected,
    /// The requested page was served without any form in the way
    Ready,
}

/// Drives the login/team-selection sequence on top of a [`PortalClient`]
#[derive(Debug)]
pub struct Authenticator {
    client: PortalClient,
    credentials: Credentials,
    state: SessionState,
    transitions: Vec<SessionState>,
}

impl Authenticator {
    /// Take ownership of the session used for every later request
    pub fn new(client: PortalClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            state: SessionState::Anonymous,
            transitions: Vec::new(),
        }
    }

    /// The underlying session, for downloads that must share its cookies
    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// States entered during the last `ensure_ready` call, in order
    pub fn transitions(&self) -> &[SessionState] {
        &self.transitions
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Fetch `url`, logging in and selecting a team first when the portal asks
    ///
    /// Returns the page finally served for `url`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if a request fails, the login form is served again
    /// after submitting credentials, or the team cannot be selected.
    pub async fn ensure_ready(&mut self, url: &Url) -> AuthResult<Page> {
        self.transitions.clear();
        let mut page = self.client.fetch(url).await?;

        let login_form = HtmlForm::find(&page.document(), auth::LOGIN_FORM);
        if let Some(form) = login_form {
            self.log_in(form, &page).await?;
            page = self.client.fetch(url).await?;
            if page.has_form(auth::LOGIN_FORM) {
                tracing::warn!(
                    "Login form shown again for Apple ID '{}'",
                    self.credentials.login
                );
                return Err(AuthError::LoginFailed);
            }
            self.enter(SessionState::Authenticated);
        }

        let team_form = HtmlForm::find(&page.document(), auth::TEAM_FORM);
        if let Some(form) = team_form {
            self.select_team(form, &page).await?;
            page = self.client.fetch(url).await?;
            if page.has_form(auth::TEAM_FORM) {
                return Err(AuthError::TeamSelectionFailed);
            }
            self.enter(SessionState::TeamSelected);
        }

        tracing::debug!("Session ready for {} (via {:?})", url, self.transitions);
        self.enter(SessionState::Ready);
        Ok(page)
    }

    fn enter(&mut self, state: SessionState) {
        self.state = state;
        self.transitions.push(state);
    }

    async fn log_in(&self, mut form: HtmlForm, page: &Page) -> AuthResult<()> {
        tracing::info!("Logging in with Apple ID '{}'", self.credentials.login);
        form.set_field(auth::LOGIN_FIELD, self.credentials.login.as_str());
        form.set_field(auth::PASSWORD_FIELD, self.credentials.password.as_str());
        self.client.submit(form, page).await?;
        Ok(())
    }

    async fn select_team(&self, mut form: HtmlForm, page: &Page) -> AuthResult<()> {
        let team_id = self
            .credentials
            .team_id
            .as_deref()
            .ok_or(AuthError::TeamRequired)?;
        tracing::info!("Selecting team '{}'", team_id);
        form.select_option(auth::TEAM_SELECT, team_id)?;
        form.click_button(auth::TEAM_SUBMIT_BUTTON)?;
        self.client.submit(form, page).await?;
        Ok(())
    }
}
