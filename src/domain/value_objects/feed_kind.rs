use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The five visibility regimes a feed page can be assembled under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Following,
    ForYou,
    Single,
    Retweet,
    All,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Following => "following",
            FeedKind::ForYou => "for_you",
            FeedKind::Single => "single",
            FeedKind::Retweet => "retweet",
            FeedKind::All => "all",
        }
    }

    /// Kinds that show a specific user's profile and need a target id.
    pub fn requires_target(&self) -> bool {
        matches!(self, FeedKind::Single | FeedKind::Retweet)
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "following" => Ok(FeedKind::Following),
            "for_you" => Ok(FeedKind::ForYou),
            "single" => Ok(FeedKind::Single),
            "retweet" => Ok(FeedKind::Retweet),
            "all" => Ok(FeedKind::All),
            _ => Err(()),
        }
    }
}
