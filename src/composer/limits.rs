//! Per-kind body character limits.

use serde::Serialize;

use crate::model::kind::TemplateKind;

/// Direct messages.
pub const DIRECT_MESSAGE_LIMIT: usize = 5000;
/// Connection invite note, standard accounts.
pub const CONNECTION_INVITE_LIMIT: usize = 200;
/// Connection invite note with the premium integration.
pub const CONNECTION_INVITE_PREMIUM_LIMIT: usize = 250;
/// InMail body.
pub const INMAIL_LIMIT: usize = 1800;

/// Limit table. Every kind has an entry; the connection invite has two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterLimits {
    pub direct_message: usize,
    pub connection_invite: usize,
    pub connection_invite_premium: usize,
    pub inmail: usize,
}

impl Default for CharacterLimits {
    fn default() -> Self {
        Self {
            direct_message: DIRECT_MESSAGE_LIMIT,
            connection_invite: CONNECTION_INVITE_LIMIT,
            connection_invite_premium: CONNECTION_INVITE_PREMIUM_LIMIT,
            inmail: INMAIL_LIMIT,
        }
    }
}

impl CharacterLimits {
    pub fn limit_for(&self, kind: TemplateKind, is_premium: bool) -> usize {
        match kind {
            TemplateKind::DirectMessage => self.direct_message,
            TemplateKind::ConnectionInvite if is_premium => self.connection_invite_premium,
            TemplateKind::ConnectionInvite => self.connection_invite,
            TemplateKind::InMailMessage => self.inmail,
        }
    }
}

/// Limit for `kind` under the default table.
pub fn compute_character_limit(kind: TemplateKind, is_premium: bool) -> usize {
    CharacterLimits::default().limit_for(kind, is_premium)
}

/// Length as counted against the limits: UTF-16 code units.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}
