use crate::config::Selectors;
use crate::domain::model::{Candidate, ClockOutcome, Direction};
use crate::domain::ports::{BrowserDriver, CredentialStore, DriverError, Notifier};
use crate::utils::error::{AgentError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

const CONNECTIVITY_PROMPT: &str = "please fix your internet connection, and press 'OK'";

/// Candidate names reported by `check_exists` for the clock tile.
pub const CLOCK_IN: &str = "clock_in";
pub const START_BREAK: &str = "start_break";
pub const CLOCK_OUT: &str = "clock_out";

#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Polling passes `clock_in`/`clock_out` give the clock tile to settle.
    pub candidate_timeout_seconds: u64,
    pub dashboard_attempts: u32,
    pub poll_interval: Duration,
    pub dialog_title: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            candidate_timeout_seconds: 10,
            dashboard_attempts: 3,
            poll_interval: Duration::from_secs(1),
            dialog_title: crate::config::toml_config::DEFAULT_DIALOG_TITLE.to_string(),
        }
    }
}

/// Drives one browser session through login, the clock action and logout.
pub struct ClockAgent<D, C, N> {
    selectors: Selectors,
    driver: D,
    credentials: C,
    notifier: N,
    settings: AgentSettings,
    clocked: bool,
}

impl<D, C, N> ClockAgent<D, C, N>
where
    D: BrowserDriver,
    C: CredentialStore,
    N: Notifier,
{
    pub fn new(
        selectors: Selectors,
        driver: D,
        credentials: C,
        notifier: N,
        settings: AgentSettings,
    ) -> Self {
        Self {
            selectors,
            driver,
            credentials,
            notifier,
            settings,
            clocked: false,
        }
    }

    /// Opens the sign-in page and waits for it to render.
    ///
    /// Any driver failure while reaching the page, timeout or otherwise,
    /// closes the browser, asks the user to fix their connection and returns
    /// [`AgentError::Connectivity`] so the caller can retry.
    pub async fn connect(&mut self) -> Result<()> {
        info!("Launching browser and opening {}", self.selectors.sign_in.url);
        if let Err(e) = self.driver.open(&self.selectors.sign_in.url).await {
            return Err(self.connectivity_failure(e.to_string()).await);
        }

        match self
            .driver
            .wait_until_visible(&self.selectors.sign_in.email)
            .await
        {
            Ok(()) => {
                info!("Application is loaded");
                Ok(())
            }
            Err(e) => Err(self.connectivity_failure(e.to_string()).await),
        }
    }

    async fn connectivity_failure(&mut self, message: String) -> AgentError {
        warn!("Device is not connected to internet. Closing the browser");
        if let Err(e) = self.driver.close().await {
            warn!("Closing browser failed: {}", e);
        }
        info!("Browser is closed. Waiting for the user to fix the connectivity issue.");
        self.notify(CONNECTIVITY_PROMPT);
        info!("User response received.");
        AgentError::Connectivity { message }
    }

    pub async fn login(&mut self) -> Result<()> {
        let sign_in = &self.selectors.sign_in;

        info!("Entering 'Work Email'");
        self.driver.type_text(&sign_in.email, &sign_in.username).await?;
        info!("Entering 'Work Email' - Success");

        info!("Entering 'Password'");
        let password = self
            .credentials
            .get_password(&sign_in.url, &sign_in.username)?;
        self.driver
            .type_text(&sign_in.password, password.expose())
            .await?;
        info!("Entering 'Password' - Success");

        info!("Clicking on 'SIGN IN'");
        self.driver.click(&sign_in.signin).await?;
        info!("Clicking on 'SIGN IN' - Success");

        self.driver
            .wait_until_visible(&self.selectors.left_pane.username)
            .await?;
        info!("Logging in - Success");
        Ok(())
    }

    pub async fn navigate_to_dashboard(&mut self) -> Result<()> {
        let attempts = self.settings.dashboard_attempts;
        let title = &self.selectors.clock_tile.title;

        for attempt in 1..=attempts {
            match self.driver.wait_until_visible(title).await {
                Ok(()) => {
                    info!("Navigating to 'Dashboard' - Success");
                    return Ok(());
                }
                Err(DriverError::Timeout { .. }) => {
                    warn!(
                        "Navigating to 'Dashboard' - Failure ({}/{})",
                        attempt, attempts
                    );
                    if attempt < attempts {
                        info!("Reloading page");
                        self.driver.reload().await?;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AgentError::UiMismatch {
            selector: title.clone(),
            attempts,
        })
    }

    /// Polls `candidates` once per `poll_interval`, in order, for up to
    /// `timeout_seconds` passes and returns the name of the first one present.
    ///
    /// When two candidates are present in the same pass the one declared
    /// first wins.
    pub async fn check_exists(
        &mut self,
        timeout_seconds: u64,
        candidates: &[Candidate],
    ) -> Result<String> {
        for pass in 1..=timeout_seconds {
            for candidate in candidates {
                if self.driver.contains_element(&candidate.selector).await? {
                    debug!("'{}' found on pass {}", candidate.name, pass);
                    return Ok(candidate.name.clone());
                }
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }

        Err(AgentError::NoCandidateFound {
            timeout_seconds,
            candidates: candidates.iter().map(|c| c.name.clone()).collect(),
        })
    }

    pub async fn clock_in(&mut self) -> Result<ClockOutcome> {
        let tile = self.selectors.clock_tile.clone();
        let status = self
            .check_exists(
                self.settings.candidate_timeout_seconds,
                &[
                    Candidate::new(CLOCK_IN, &tile.clock_in),
                    Candidate::new(START_BREAK, &tile.start_break),
                ],
            )
            .await?;

        if status != CLOCK_IN {
            warn!("User has already clocked in");
            self.notify("User has already clocked in");
            return Ok(ClockOutcome::AlreadyDone);
        }

        info!("Clicking on 'Clock In'");
        self.driver.wait_until_visible(&tile.clock_in).await?;
        self.driver.click(&tile.clock_in).await?;
        info!("Clicking on 'Clock In' - Success");

        self.clocked = true;
        Ok(ClockOutcome::Clocked)
    }

    /// A visible clock-in button means the user is already clocked out.
    pub async fn clock_out(&mut self) -> Result<ClockOutcome> {
        let tile = self.selectors.clock_tile.clone();
        let status = self
            .check_exists(
                self.settings.candidate_timeout_seconds,
                &[
                    Candidate::new(CLOCK_IN, &tile.clock_in),
                    Candidate::new(CLOCK_OUT, &tile.clock_out),
                ],
            )
            .await?;

        if status != CLOCK_OUT {
            warn!("User has already clocked out");
            self.notify("User has already clocked out");
            return Ok(ClockOutcome::AlreadyDone);
        }

        info!("Clicking on 'Clock Out'");
        self.driver.wait_until_visible(&tile.clock_out).await?;
        self.driver.click(&tile.clock_out).await?;
        info!("Clicking on 'Clock Out' - Success");

        info!("Clicking on 'Yes'");
        self.driver
            .wait_until_visible(&tile.clock_out_confirmation)
            .await?;
        self.driver.click(&tile.clock_out_confirmation).await?;
        info!("Clicking on 'Yes' - Success");

        self.clocked = true;
        Ok(ClockOutcome::Clocked)
    }

    /// Logs out and closes the browser. The browser is closed even when the
    /// logout clicks fail; the logout error is then the one returned.
    pub async fn log_out(&mut self) -> Result<()> {
        let logged_out = self.logout_steps().await;

        info!("Closing browser");
        let closed = self.driver.close().await;

        match (logged_out, closed) {
            (Ok(()), Ok(())) => {
                info!("Closing browser - Success");
                Ok(())
            }
            (Ok(()), Err(e)) => Err(e.into()),
            (Err(e), Ok(())) => {
                info!("Closing browser - Success");
                Err(e)
            }
            (Err(e), Err(close_err)) => {
                warn!("Closing browser failed: {}", close_err);
                Err(e)
            }
        }
    }

    async fn logout_steps(&mut self) -> Result<()> {
        let logout = &self.selectors.logout;

        info!("Expanding logout dropdown");
        self.driver.wait_until_visible(&logout.logout_arrow).await?;
        self.driver.click(&logout.logout_arrow).await?;
        info!("Expanding logout dropdown - Success");

        info!("Clicking on 'Logout'");
        self.driver.wait_until_visible(&logout.logout).await?;
        self.driver.click(&logout.logout).await?;
        info!("Clicking on 'Logout' - Success");
        Ok(())
    }

    /// Runs everything after a successful [`connect`](Self::connect): login,
    /// dashboard, the requested action and logout. The browser is closed on
    /// every path out of this method.
    pub async fn perform(&mut self, direction: Direction) -> Result<ClockOutcome> {
        if let Err(e) = self.login().await {
            if let Err(close_err) = self.driver.close().await {
                warn!("Closing browser failed: {}", close_err);
            }
            return Err(e);
        }

        let action = match self.navigate_to_dashboard().await {
            Ok(()) => match direction {
                Direction::ClockIn => self.clock_in().await,
                Direction::ClockOut => self.clock_out().await,
            },
            Err(e) => Err(e),
        };

        if action.is_ok() && self.clocked {
            crate::success!("{} - Successful", direction);
        }

        let logged_out = self.log_out().await;
        match (action, logged_out) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(logout_err)) => {
                warn!("Logging out failed: {}", logout_err);
                Err(e)
            }
        }
    }

    fn notify(&self, text: &str) {
        self.notifier.message(&self.settings.dialog_title, text);
    }
}
