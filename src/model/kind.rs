//! Template kinds: the channel a template is written for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OutreachError;

/// The channel/format a template targets.
///
/// The kind decides whether a subject line is required and which body
/// character limit applies (see [`crate::composer::limits`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    /// A message to an existing connection.
    DirectMessage,
    /// The note attached to a connection request.
    ConnectionInvite,
    /// A paid message to someone outside the sender's network.
    #[serde(rename = "inmail")]
    InMailMessage,
}

impl TemplateKind {
    /// Every kind, in display order.
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::DirectMessage,
        TemplateKind::ConnectionInvite,
        TemplateKind::InMailMessage,
    ];

    /// Whether drafts of this kind carry a subject and fallback subject.
    pub fn requires_subject(self) -> bool {
        matches!(self, TemplateKind::InMailMessage)
    }

    /// Stable identifier used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::DirectMessage => "direct-message",
            TemplateKind::ConnectionInvite => "connection-invite",
            TemplateKind::InMailMessage => "inmail",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = OutreachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "direct-message" | "message" | "dm" => Ok(TemplateKind::DirectMessage),
            "connection-invite" | "invite" | "connection" => Ok(TemplateKind::ConnectionInvite),
            "inmail" | "inmail-message" | "in-mail" => Ok(TemplateKind::InMailMessage),
            _ => Err(OutreachError::UnknownKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_inmail_requires_subject() {
        assert!(TemplateKind::InMailMessage.requires_subject());
        assert!(!TemplateKind::DirectMessage.requires_subject());
        assert!(!TemplateKind::ConnectionInvite.requires_subject());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("inmail".parse::<TemplateKind>().unwrap(), TemplateKind::InMailMessage);
        assert_eq!(
            "Connection_Invite".parse::<TemplateKind>().unwrap(),
            TemplateKind::ConnectionInvite
        );
        assert_eq!("dm".parse::<TemplateKind>().unwrap(), TemplateKind::DirectMessage);
        assert!(matches!(
            "fax".parse::<TemplateKind>(),
            Err(OutreachError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_display_matches_serde_name() {
        for kind in TemplateKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
