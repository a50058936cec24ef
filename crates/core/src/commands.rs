//! Local Command Resolution
//!
//! An utterance is classified against an ordered list of [`CommandRule`]s.
//! Rules are tried top to bottom against the lowercased text and the first
//! match wins. When nothing matches, the utterance is delegated to the
//! completion gateway; that fallback lives in [`CommandSet::resolve`] itself,
//! so it stays reachable and terminal no matter which rules are registered.

use crate::capability::Clock;
use chrono::NaiveTime;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const GOOGLE_URL: &str = "https://google.com";
pub const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

const OPEN_GOOGLE_PHRASE: &str = "open google";
const TIME_PHRASE: &str = "time";
const SEARCH_YOUTUBE_PHRASE: &str = "search youtube for";

/// A side effect requested by a local command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the URL in a new browsing context.
    OpenUrl(String),
}

/// The outcome of classifying an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Handled locally: speak `response`, after performing `effect` if any.
    Local {
        response: String,
        effect: Option<Effect>,
    },
    /// Not a local command: forward the raw utterance to the gateway.
    Delegate { prompt: String },
}

impl Action {
    fn reply(response: impl Into<String>) -> Self {
        Action::Local {
            response: response.into(),
            effect: None,
        }
    }

    fn open(url: impl Into<String>, response: impl Into<String>) -> Self {
        Action::Local {
            response: response.into(),
            effect: Some(Effect::OpenUrl(url.into())),
        }
    }
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&str) -> Action + Send + Sync>;

/// A named `(predicate, handler)` pair.
///
/// The predicate sees the lowercased utterance; the handler sees the original
/// text so it can keep the speaker's casing in anything it extracts.
pub struct CommandRule {
    name: &'static str,
    predicate: Predicate,
    handler: Handler,
}

impl CommandRule {
    pub fn new(
        name: &'static str,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        handler: impl Fn(&str) -> Action + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            predicate: Box::new(predicate),
            handler: Box::new(handler),
        }
    }

    /// A rule that fires when the utterance contains `phrase` in any case.
    /// `phrase` must be lowercase.
    pub fn contains(
        name: &'static str,
        phrase: &'static str,
        handler: impl Fn(&str) -> Action + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |lowered| lowered.contains(phrase), handler)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, lowered: &str) -> bool {
        (self.predicate)(lowered)
    }

    fn apply(&self, text: &str) -> Action {
        (self.handler)(text)
    }
}

impl fmt::Debug for CommandRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The ordered rule list used by the dispatcher.
#[derive(Debug, Default)]
pub struct CommandSet {
    rules: Vec<CommandRule>,
}

impl CommandSet {
    /// A rule set with no local commands. Every utterance is delegated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in commands, in priority order: open Google, tell the time,
    /// search YouTube.
    pub fn standard(clock: Arc<dyn Clock>) -> Self {
        let mut set = Self::empty();
        set.push(CommandRule::contains(
            "open_google",
            OPEN_GOOGLE_PHRASE,
            |_| Action::open(GOOGLE_URL, "Opening Google."),
        ));
        set.push(CommandRule::contains("time", TIME_PHRASE, move |_| {
            Action::reply(format!(
                "The time is {}",
                format_time_of_day(clock.time_of_day())
            ))
        }));
        set.push(CommandRule::contains(
            "search_youtube",
            SEARCH_YOUTUBE_PHRASE,
            |text| {
                let query = extract_search_query(text);
                Action::open(
                    youtube_search_url(&query),
                    format!("Searching YouTube for {query}"),
                )
            },
        ));
        set
    }

    /// Appends a rule with the lowest priority so far. The gateway fallback
    /// still comes after it.
    pub fn push(&mut self, rule: CommandRule) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(CommandRule::name).collect()
    }

    /// Classifies `text`. Matching is case-insensitive and the first matching
    /// rule wins; an unmatched utterance becomes [`Action::Delegate`].
    pub fn resolve(&self, text: &str) -> Action {
        let lowered = text.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => {
                debug!(rule = rule.name, "Utterance matched a local command");
                rule.apply(text)
            }
            None => {
                debug!("No local command matched; delegating to the gateway");
                Action::Delegate {
                    prompt: text.to_string(),
                }
            }
        }
    }
}

/// Formats a time of day the way a 12-hour English locale does, e.g. `3:07:09 PM`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%-I:%M:%S %p").to_string()
}

/// Returns the trimmed text following "search youtube for", keeping its
/// original casing. Empty when the phrase is absent or nothing follows it.
pub fn extract_search_query(text: &str) -> String {
    // ASCII folding keeps byte offsets aligned with `text`.
    let folded = text.to_ascii_lowercase();
    if let Some(idx) = folded.find(SEARCH_YOUTUBE_PHRASE) {
        return text[idx + SEARCH_YOUTUBE_PHRASE.len()..].trim().to_string();
    }
    text.to_lowercase()
        .split_once(SEARCH_YOUTUBE_PHRASE)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

pub fn youtube_search_url(query: &str) -> String {
    format!("{YOUTUBE_SEARCH_URL}{}", urlencoding::encode(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FixedClock;

    fn standard_at(h: u32, m: u32, s: u32) -> CommandSet {
        let time = NaiveTime::from_hms_opt(h, m, s).unwrap();
        CommandSet::standard(Arc::new(FixedClock(time)))
    }

    fn standard() -> CommandSet {
        standard_at(15, 7, 9)
    }

    #[test]
    fn test_open_google_any_case() {
        for text in ["open google", "Please OPEN Google now", "oPeN gOoGlE"] {
            assert_eq!(
                standard().resolve(text),
                Action::Local {
                    response: "Opening Google.".to_string(),
                    effect: Some(Effect::OpenUrl(GOOGLE_URL.to_string())),
                },
                "{text}"
            );
        }
    }

    #[test]
    fn test_open_google_outranks_time() {
        let action = standard().resolve("open google, what time is it?");
        assert!(matches!(
            action,
            Action::Local {
                effect: Some(Effect::OpenUrl(ref url)),
                ..
            } if url == GOOGLE_URL
        ));
    }

    #[test]
    fn test_time_reports_valid_time_of_day() {
        let Action::Local { response, effect } = standard().resolve("What is the TIME?") else {
            panic!("expected a local action");
        };
        assert!(effect.is_none());
        assert_eq!(response, "The time is 3:07:09 PM");

        let stamp = response.trim_start_matches("The time is ");
        assert!(NaiveTime::parse_from_str(stamp, "%I:%M:%S %p").is_ok());
    }

    #[test]
    fn test_time_uses_system_clock_format() {
        let set = CommandSet::standard(Arc::new(crate::capability::SystemClock));
        let Action::Local { response, .. } = set.resolve("time please") else {
            panic!("expected a local action");
        };
        let stamp = response.trim_start_matches("The time is ");
        assert!(NaiveTime::parse_from_str(stamp, "%I:%M:%S %p").is_ok(), "{stamp}");
    }

    #[test]
    fn test_format_time_of_day_midnight_and_noon() {
        let midnight = NaiveTime::from_hms_opt(0, 0, 5).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        assert_eq!(format_time_of_day(midnight), "12:00:05 AM");
        assert_eq!(format_time_of_day(noon), "12:30:00 PM");
    }

    #[test]
    fn test_search_youtube_extracts_trimmed_query() {
        let action = standard().resolve("please search youtube for relaxing music");
        assert_eq!(
            action,
            Action::Local {
                response: "Searching YouTube for relaxing music".to_string(),
                effect: Some(Effect::OpenUrl(
                    "https://www.youtube.com/results?search_query=relaxing%20music".to_string()
                )),
            }
        );
    }

    #[test]
    fn test_search_youtube_keeps_query_casing() {
        assert_eq!(
            extract_search_query("Search YouTube for  Lo-Fi Beats & Rain  "),
            "Lo-Fi Beats & Rain"
        );
        assert_eq!(
            youtube_search_url("Lo-Fi Beats & Rain"),
            "https://www.youtube.com/results?search_query=Lo-Fi%20Beats%20%26%20Rain"
        );
    }

    #[test]
    fn test_search_youtube_with_nothing_after_phrase() {
        assert_eq!(extract_search_query("search youtube for"), "");
        assert_eq!(extract_search_query("hello there"), "");
    }

    #[test]
    fn test_time_outranks_search() {
        // "time" appears inside the query, so the earlier time rule wins.
        let Action::Local { response, .. } = standard().resolve("search youtube for time lapse")
        else {
            panic!("expected a local action");
        };
        assert!(response.starts_with("The time is "));
    }

    #[test]
    fn test_unmatched_utterance_is_delegated_verbatim() {
        assert_eq!(
            standard().resolve("Tell me a joke"),
            Action::Delegate {
                prompt: "Tell me a joke".to_string()
            }
        );
    }

    #[test]
    fn test_empty_set_delegates_everything() {
        let set = CommandSet::empty();
        assert!(set.rule_names().is_empty());
        assert_eq!(
            set.resolve("open google"),
            Action::Delegate {
                prompt: "open google".to_string()
            }
        );
    }

    #[test]
    fn test_pushed_rule_runs_after_builtins_and_before_fallback() {
        let mut set = standard();
        set.push(CommandRule::contains("greet", "hello", |_| {
            Action::reply("Hello yourself.")
        }));
        assert_eq!(
            set.rule_names(),
            vec!["open_google", "time", "search_youtube", "greet"]
        );
        assert_eq!(set.resolve("HELLO"), Action::reply("Hello yourself."));
        assert!(matches!(
            set.resolve("hello, what time is it"),
            Action::Local { ref response, .. } if response.starts_with("The time is ")
        ));
        assert!(matches!(set.resolve("goodbye"), Action::Delegate { .. }));
    }

    #[test]
    fn test_custom_predicate_sees_lowercased_text() {
        let mut set = CommandSet::empty();
        set.push(CommandRule::new(
            "shout",
            |lowered| lowered == "stop",
            |text| Action::reply(format!("heard {text}")),
        ));
        assert_eq!(set.resolve("STOP"), Action::reply("heard STOP"));
    }
}
