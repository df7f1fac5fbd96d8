//! The automation handler.

use std::sync::Arc;

use async_trait::async_trait;

use jarvis_core::config::{AutomationConfig, JarvisConfig};
use jarvis_router::{kind, Handler, HandlerKind, HandlerResult};

use crate::collab::{
    Clock, Desktop, DryRunDesktop, Knowledge, Mailer, SmtpMailer, SystemClock, SystemDesktop,
    WikipediaClient,
};
use crate::command::{AutomationCommand, CommandParser};
use crate::error::ActionError;

const NOT_RECOGNIZED: &str = "Command not recognized";
const GENERIC_ERROR: &str = "Sorry, I encountered an error";
const EMAIL_SENT: &str = "Email sent successfully";
const EMAIL_NOT_CONFIGURED: &str = "Email functionality requires Gmail app password configuration";
const EMAIL_UNAVAILABLE: &str = "Email service is currently unavailable";
const EMAIL_BAD_ADDRESS: &str = "Email sender or recipient address is not valid";

#[cfg(target_os = "macos")]
const CALCULATOR_APP: &str = "Calculator";
#[cfg(target_os = "windows")]
const CALCULATOR_APP: &str = "calc";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CALCULATOR_APP: &str = "org.gnome.Calculator";

/// Executes recognised desktop commands.
///
/// Unrecognised input is a failed result so the dispatcher can fall back
/// to conversation.
pub struct AutomationHandler {
    parser: CommandParser,
    config: AutomationConfig,
    desktop: Arc<dyn Desktop>,
    knowledge: Arc<dyn Knowledge>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl AutomationHandler {
    pub fn new(
        config: AutomationConfig,
        desktop: Arc<dyn Desktop>,
        knowledge: Arc<dyn Knowledge>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            parser: CommandParser::new(),
            config,
            desktop,
            knowledge,
            mailer,
            clock,
        }
    }

    /// Wire the real collaborators from configuration.
    pub fn from_config(config: &JarvisConfig) -> Result<Self, ActionError> {
        let desktop: Arc<dyn Desktop> = if config.automation.dry_run {
            Arc::new(DryRunDesktop)
        } else {
            Arc::new(SystemDesktop)
        };
        let knowledge = WikipediaClient::new(config.automation.wikipedia_url.clone())?;
        Ok(Self::new(
            config.automation.clone(),
            desktop,
            Arc::new(knowledge),
            Arc::new(SmtpMailer::new(config.email.clone())),
            Arc::new(SystemClock),
        ))
    }

    /// Parse and run one command. Never fails.
    pub async fn execute(&self, utterance: &str) -> HandlerResult {
        let Some(command) = self.parser.parse(utterance) else {
            tracing::debug!("No automation command recognised");
            return HandlerResult::failure(NOT_RECOGNIZED, kind::UNKNOWN);
        };

        tracing::info!(command = %command, "Executing automation command");

        match self.run(command).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Automation command failed");
                HandlerResult::failure(GENERIC_ERROR, kind::ERROR)
            }
        }
    }

    async fn run(&self, command: AutomationCommand) -> Result<HandlerResult, ActionError> {
        let result = match command {
            AutomationCommand::Time => {
                let now = self.clock.now().format("%I:%M %p");
                HandlerResult::ok(format!("The current time is {}", now), kind::REALTIME)
            }
            AutomationCommand::Date => {
                let today = self.clock.now().format("%A, %B %d, %Y");
                HandlerResult::ok(format!("Today is {}", today), kind::REALTIME)
            }
            AutomationCommand::PlayOnYoutube(query) => {
                let url = format!("{}{}", self.config.youtube_url, urlencoding::encode(&query));
                self.desktop.open_url(&url).await?;
                HandlerResult::ok(format!("Playing {} on YouTube", query), kind::AUTOMATION)
            }
            AutomationCommand::OpenApp(app) => {
                self.desktop.launch_app(&app).await?;
                HandlerResult::ok(format!("Opening {}", app), kind::AUTOMATION)
            }
            AutomationCommand::Wikipedia(term) => {
                let message = match self
                    .knowledge
                    .summary(&term, self.config.wikipedia_sentences)
                    .await
                {
                    Ok(summary) => format!("According to Wikipedia: {}", summary),
                    Err(e) => {
                        tracing::warn!(term = %term, error = %e, "Wikipedia lookup failed");
                        format!(
                            "Sorry, I couldn't find information about {} on Wikipedia",
                            term
                        )
                    }
                };
                HandlerResult::ok(message, kind::REALTIME)
            }
            AutomationCommand::WebSearch(term) => {
                let url = format!("{}{}", self.config.search_url, urlencoding::encode(&term));
                self.desktop.open_url(&url).await?;
                HandlerResult::ok(format!("Searching Google for {}", term), kind::AUTOMATION)
            }
            AutomationCommand::Email => {
                let message = match self.mailer.send().await {
                    Ok(()) => EMAIL_SENT,
                    Err(ActionError::NotConfigured(what)) => {
                        tracing::info!(missing = %what, "Email not configured");
                        EMAIL_NOT_CONFIGURED
                    }
                    Err(ActionError::InvalidAddress(what)) => {
                        tracing::warn!(address = %what, "Email address rejected");
                        EMAIL_BAD_ADDRESS
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Email delivery failed");
                        EMAIL_UNAVAILABLE
                    }
                };
                HandlerResult::ok(message, kind::AUTOMATION)
            }
            AutomationCommand::Weather => {
                self.desktop.open_url(&self.config.weather_url).await?;
                HandlerResult::ok("Opening current weather information", kind::REALTIME)
            }
            AutomationCommand::News => {
                self.desktop.open_url(&self.config.news_url).await?;
                HandlerResult::ok("Opening latest news", kind::REALTIME)
            }
            AutomationCommand::Calculator => {
                self.desktop.launch_app(CALCULATOR_APP).await?;
                HandlerResult::ok("Opening calculator", kind::AUTOMATION)
            }
        };
        Ok(result)
    }
}

#[async_trait]
impl Handler for AutomationHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Automation
    }

    async fn handle(&self, utterance: &str) -> HandlerResult {
        self.execute(utterance).await
    }
}
