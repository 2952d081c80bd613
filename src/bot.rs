//! Telegram front end
//!
//! `/weather`, `/clima`, `/forecast` and `/previsao` take the city name as
//! payload; any other plain text message is treated as a city name too.

use std::sync::Arc;
use std::time::Duration;

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::update_listeners::Polling;
use tracing::{info, warn};

use crate::cptec::{CptecTodayScraper, TodayForecastProvider};
use crate::fetcher::ForecastFetcher;
use crate::format::forecast_text;
use crate::resolver::CityResolver;

/// Commands answered with a forecast
pub const FORECAST_COMMANDS: [&str; 4] = ["weather", "clima", "forecast", "previsao"];

/// Text to send back and whether it carries Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub markdown: bool,
}

/// Resolves, fetches and formats; errors become user-facing text
pub struct ReplyService<P> {
    resolver: CityResolver,
    fetcher: ForecastFetcher<P>,
}

/// The service wired to the real CPTEC scraper
pub type CptecReplyService = ReplyService<CptecTodayScraper>;

impl<P: TodayForecastProvider> ReplyService<P> {
    pub fn new(resolver: CityResolver, fetcher: ForecastFetcher<P>) -> Self {
        Self { resolver, fetcher }
    }

    /// Build the reply for a city payload
    pub async fn reply(&self, payload: &str) -> Reply {
        let city = match self.resolver.resolve(payload) {
            Ok(city) => city,
            Err(e) => {
                info!("No city for {:?}: {}", payload, e);
                return Reply {
                    text: e.user_message(),
                    markdown: false,
                };
            }
        };

        match self.fetcher.fetch(&city).await {
            Ok(result) => Reply {
                text: forecast_text(&result),
                markdown: true,
            },
            Err(e) => {
                warn!("Forecast for {} ({}) failed: {}", city.name, city.id, e);
                Reply {
                    text: e.user_message(),
                    markdown: false,
                }
            }
        }
    }
}

/// This bot's username, injected into the handler
#[derive(Debug, Clone)]
pub struct BotUsername(pub String);

/// City payload of a message, or `None` when the message is not for us.
///
/// Commands may carry a `@botname` suffix; a suffix naming another bot
/// drops the message. Plain text is used as-is.
#[must_use]
pub fn extract_payload(text: &str, own_username: &str) -> Option<String> {
    let text = text.trim();

    let Some(command_line) = text.strip_prefix('/') else {
        return Some(text.to_string());
    };

    let (command, rest) = command_line
        .split_once(char::is_whitespace)
        .unwrap_or((command_line, ""));
    let (command, addressee) = command
        .split_once('@')
        .map_or((command, None), |(command, addressee)| (command, Some(addressee)));

    if addressee.is_some_and(|name| !name.eq_ignore_ascii_case(own_username)) {
        return None;
    }

    FORECAST_COMMANDS
        .contains(&command.to_lowercase().as_str())
        .then(|| rest.trim().to_string())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    service: Arc<CptecReplyService>,
    username: BotUsername,
) -> ResponseResult<()> {
    let Some(payload) = msg
        .text()
        .and_then(|text| extract_payload(text, &username.0))
    else {
        return Ok(());
    };

    let reply = service.reply(&payload).await;
    let request = bot.send_message(msg.chat.id, reply.text);

    if reply.markdown {
        // legacy Markdown, fields escaped by `format`
        #[allow(deprecated)]
        request.parse_mode(ParseMode::Markdown).await?;
    } else {
        request.await?;
    }

    Ok(())
}

/// Serve chat messages until interrupted, long-polling with the given timeout.
pub async fn run(
    bot: Bot,
    service: Arc<CptecReplyService>,
    poll_timeout: Duration,
) -> ResponseResult<()> {
    let me = bot.get_me().await?;
    let username = BotUsername(me.username().to_string());
    info!(
        "Starting Telegram long polling as @{} (timeout {:?})",
        username.0, poll_timeout
    );

    let handler = Update::filter_message().endpoint(handle_message);
    let listener = Polling::builder(bot.clone()).timeout(poll_timeout).build();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service, username])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}
