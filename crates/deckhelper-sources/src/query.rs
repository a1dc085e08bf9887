//! Card database search strings for each commander variant.
//!
//! Solo commanders need the whole target identity. Pair members only need part of
//! it, so pair searches OR together one `id>=<color>` clause per target color.

use deckhelper_core::ColorIdentity;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Short label used in logs and `RequestFailed` errors.
    pub label: &'static str,
    pub text: String,
}

impl SearchQuery {
    pub fn new(label: &'static str, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    pub fn solo(colors: &ColorIdentity) -> Self {
        let base = "t:legendary t:creature f:commander";
        let text = if colors.is_empty() {
            base.to_string()
        } else {
            format!("id>={} {}", colors.letters(), base)
        };
        Self::new("Solo", text)
    }

    pub fn partners(colors: &ColorIdentity) -> Self {
        Self::any_color(
            "Partner",
            r#"f:commander o:"Partner" -o:"Partner with""#,
            colors,
        )
    }

    pub fn partner_with(colors: &ColorIdentity) -> Self {
        Self::any_color("'Partner with...'", r#"f:commander o:"Partner with""#, colors)
    }

    pub fn background_creatures(colors: &ColorIdentity) -> Self {
        Self::any_color(
            "Creature(background)",
            r#"f:commander o:"Choose a Background""#,
            colors,
        )
    }

    pub fn backgrounds(colors: &ColorIdentity) -> Self {
        Self::any_color("Background", "t:background", colors)
    }

    pub fn doctors(colors: &ColorIdentity) -> Self {
        Self::any_color("Doctor", r#"f:commander t:"Time Lord Doctor""#, colors)
    }

    pub fn doctor_companions(colors: &ColorIdentity) -> Self {
        Self::any_color("Companion", r#"f:commander o:"Doctor's companion""#, colors)
    }

    pub fn friends_forever(colors: &ColorIdentity) -> Self {
        Self::any_color("Friends forever", r#"f:commander o:"Friends forever""#, colors)
    }

    fn any_color(label: &'static str, base: &str, colors: &ColorIdentity) -> Self {
        if colors.is_empty() {
            return Self::new(label, base);
        }
        let clauses: Vec<String> = colors.iter().map(|c| format!("id>={}", c)).collect();
        Self::new(label, format!("{} ({})", base, clauses.join(" OR ")))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
