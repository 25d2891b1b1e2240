//! Shapes a quote into a post that fits the platform's character limit
//!
//! Each quote is classified by keyword into a hook category; a random
//! call-to-action from that category is appended after a blank line.
//! Lengths are counted in `char`s.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Maximum post length on the platform
pub const CHARACTER_LIMIT: usize = 280;

/// Appended to a quote cut short to fit
pub const ELLIPSIS: &str = "...";

/// Chance that a quote with no matching keywords gets a hook anyway
pub const GENERAL_HOOK_PROBABILITY: f64 = 0.7;

/// Separates the quote from its hook
const HOOK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCategory {
    Success,
    Growth,
    Motivation,
    Challenge,
    General,
}

impl HookCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookCategory::Success => "success",
            HookCategory::Growth => "growth",
            HookCategory::Motivation => "motivation",
            HookCategory::Challenge => "challenge",
            HookCategory::General => "general",
        }
    }

    pub fn hooks(&self) -> &'static [&'static str] {
        HOOK_TABLE
            .iter()
            .find(|rule| rule.category == *self)
            .map(|rule| rule.hooks)
            .unwrap_or(GENERAL_HOOKS)
    }
}

impl std::fmt::Display for HookCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table
pub struct HookRule {
    pub category: HookCategory,
    /// Lowercase substrings; an empty list matches everything
    pub keywords: &'static [&'static str],
    pub hooks: &'static [&'static str],
}

const GENERAL_HOOKS: &[&str] = &[
    "Tag someone who needs to hear this today 👇 #Motivation",
    "Save this for when you need it. 🔖 #DailyMotivation",
    "Agree? Share your thoughts below 💬 #Inspiration",
    "Read it twice. Let it sink in. ✨ #Mindset",
];

/// Checked top to bottom; the first matching rule wins
pub const HOOK_TABLE: &[HookRule] = &[
    HookRule {
        category: HookCategory::Success,
        keywords: &["success", "succeed", "achieve", "win", "accomplish"],
        hooks: &[
            "What does success look like for you this year? 💬 #Success",
            "Drop a 🏆 if you're chasing something big. #Achievement",
            "Which win are you working toward right now? #Goals",
        ],
    },
    HookRule {
        category: HookCategory::Growth,
        keywords: &["grow", "learn", "change", "improve", "progress"],
        hooks: &[
            "What's one thing you learned this week? 🌱 #GrowthMindset",
            "Small steps still count. What's yours today? #Growth",
            "Who helped you grow the most? Tag them 👇 #GrowthMindset",
        ],
    },
    HookRule {
        category: HookCategory::Motivation,
        keywords: &["dream", "believe", "motivat", "inspire", "passion", "start"],
        hooks: &[
            "Reply with one word that keeps you going 🔥 #Motivation",
            "Who needs this reminder today? Tag them 👇 #Believe",
            "What are you starting today? 🚀 #DailyMotivation",
        ],
    },
    HookRule {
        category: HookCategory::Challenge,
        keywords: &["overcome", "struggle", "obstacle", "fail", "difficult", "hard", "persever"],
        hooks: &[
            "What challenge are you pushing through right now? 💪 #Resilience",
            "Hard days build strong people. Agree? #KeepGoing",
            "Share a setback that made you stronger 👇 #Mindset",
        ],
    },
    HookRule {
        category: HookCategory::General,
        keywords: &[],
        hooks: GENERAL_HOOKS,
    },
];

/// First category whose keywords appear in `quote` (case-insensitive)
pub fn classify(quote: &str) -> HookCategory {
    let lowered = quote.to_lowercase();
    HOOK_TABLE
        .iter()
        .find(|rule| {
            rule.keywords.is_empty() || rule.keywords.iter().any(|kw| lowered.contains(kw))
        })
        .map(|rule| rule.category)
        .unwrap_or(HookCategory::General)
}

/// Hook to append, if any; general quotes only get one 70% of the time
pub fn pick_hook<R: Rng + ?Sized>(category: HookCategory, rng: &mut R) -> Option<&'static str> {
    if category == HookCategory::General && !rng.gen_bool(GENERAL_HOOK_PROBABILITY) {
        return None;
    }
    category.hooks().choose(rng).copied()
}

/// Format `quote` into a post of at most `CHARACTER_LIMIT` characters
///
/// Quotes that already carry a hashtag are posted without a hook. The quote
/// itself is only truncated when it alone exceeds the limit: a quote of up to
/// `CHARACTER_LIMIT` characters whose hook does not fit is posted bare and
/// whole rather than cut to make room.
pub fn format_quote<R: Rng + ?Sized>(quote: &str, rng: &mut R) -> String {
    let category = classify(quote);
    let hook = if has_hashtag(quote) {
        None
    } else {
        pick_hook(category, rng)
    };
    debug!(category = %category, hooked = hook.is_some(), "Formatting quote");

    let message = with_hook(quote, hook);
    if char_len(&message) <= CHARACTER_LIMIT {
        return message;
    }

    let truncated = truncate_quote(quote);
    let message = with_hook(&truncated, hook);
    if char_len(&message) <= CHARACTER_LIMIT {
        return message;
    }

    debug!("Hook does not fit, posting bare quote");
    truncated
}

/// `#` directly followed by a letter or digit
pub fn has_hashtag(text: &str) -> bool {
    text.char_indices().any(|(i, c)| {
        c == '#'
            && text[i + c.len_utf8()..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric)
    })
}

fn with_hook(quote: &str, hook: Option<&str>) -> String {
    match hook {
        Some(hook) => format!("{}{}{}", quote, HOOK_SEPARATOR, hook),
        None => quote.to_string(),
    }
}

/// Cut `quote` to the character limit, ending in an ellipsis when shortened
pub fn truncate_quote(quote: &str) -> String {
    if char_len(quote) <= CHARACTER_LIMIT {
        return quote.to_string();
    }
    let keep = CHARACTER_LIMIT - ELLIPSIS.chars().count();
    let mut truncated: String = quote.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
