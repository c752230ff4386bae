//! One interactive analysis session.
//!
//! Lifecycle: `login` → `load` → (`select_window` / `report`)* → `reset` or
//! `logout`. `reset` starts a new analysis and keeps the login; `logout`
//! drops everything.

pub mod repl;

use crate::models::CompanyData;
use crate::pipeline::{Pipeline, analyze};
use crate::report::Report;
use crate::reshape::period::AnalysisWindow;
use crate::scraper::FinancialDataSource;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("username and password must not be empty")]
    InvalidCredentials,

    #[error("company URL must not be empty")]
    EmptyUrl,

    #[error("no company loaded")]
    NotLoaded,

    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

struct Loaded {
    input: String,
    data: CompanyData,
}

pub struct Session<S> {
    pipeline: Pipeline<S>,
    user: Option<String>,
    window: AnalysisWindow,
    loaded: Option<Loaded>,
}

impl<S: FinancialDataSource> Session<S> {
    pub fn new(pipeline: Pipeline<S>) -> Self {
        let window = pipeline.config().window;
        Self {
            pipeline,
            user: None,
            window,
            loaded: None,
        }
    }

    /// Placeholder gate: any non-empty pair is accepted.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(SessionError::InvalidCredentials);
        }
        info!("Logged in as {}", username);
        self.user = Some(username.to_string());
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn window(&self) -> AnalysisWindow {
        self.window
    }

    pub fn data(&self) -> Option<&CompanyData> {
        self.loaded.as_ref().map(|l| &l.data)
    }

    /// Fetch a company once. Loading the same input again reuses the snapshot;
    /// a different input replaces it.
    pub async fn load(&mut self, input: &str) -> Result<&CompanyData, SessionError> {
        if !self.is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }
        let input = input.trim();
        if input.is_empty() {
            return Err(SessionError::EmptyUrl);
        }

        let reuse = self.loaded.as_ref().is_some_and(|l| l.input == input);
        if reuse {
            debug!("{} already loaded", input);
        } else {
            // a failed load must not leave the previous company reportable
            self.loaded = None;
            let data = self.pipeline.fetch(input).await?;
            self.loaded = Some(Loaded { input: input.to_string(), data });
        }

        self.data().ok_or(SessionError::NotLoaded)
    }

    pub fn select_window(&mut self, window: AnalysisWindow) {
        debug!("Window → {}", window);
        self.window = window;
    }

    /// Recompute the report from the loaded snapshot under the current window.
    pub fn report(&self) -> Result<Report, SessionError> {
        if !self.is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }
        let data = self.data().ok_or(SessionError::NotLoaded)?;
        Ok(analyze(data, self.window, self.pipeline.config().max_highlights))
    }

    /// New analysis: forget the company, keep the login.
    pub fn reset(&mut self) {
        self.loaded = None;
        self.window = self.pipeline.config().window;
    }

    pub fn logout(&mut self) {
        self.reset();
        if let Some(user) = self.user.take() {
            info!("Logged out {}", user);
        }
    }
}
