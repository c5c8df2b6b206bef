//! Compact identifier text format: `@user` or `@user#room`.

use hcb_core::{domain::Identifier, Error, Result};

/// Parse `@username` into a user and `@username#roomname` into a room occupant.
///
/// The format has no escaping, so names containing `@`, `#` or whitespace are
/// rejected rather than guessed at. Surrounding whitespace is ignored.
pub fn parse_identifier(text: &str) -> Result<Identifier> {
    let text = text.trim();
    let unrecognized = || Error::UnrecognizedIdentifier(text.to_string());

    let rest = text.strip_prefix('@').ok_or_else(unrecognized)?;

    match rest.split_once('#') {
        None => {
            if !is_name(rest) {
                return Err(unrecognized());
            }
            Ok(Identifier::user(rest))
        }
        Some((username, roomname)) => {
            if !is_name(username) || !is_name(roomname) {
                return Err(unrecognized());
            }
            Ok(Identifier::occupant(username, roomname))
        }
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c == '@' || c == '#' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use hcb_core::domain::{Identity, RoomId};

    use super::*;

    #[test]
    fn plain_user() {
        let id = parse_identifier("@alice").unwrap();
        assert_eq!(id, Identifier::user("alice"));
        assert_eq!(id.username(), "alice");
        assert!(id.room().is_none());
    }

    #[test]
    fn user_in_room() {
        let id = parse_identifier("@alice#general").unwrap();
        assert_eq!(id.username(), "alice");
        assert_eq!(id.room(), Some(&RoomId::new("general")));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse_identifier("  @alice#general \n").unwrap(),
            Identifier::occupant("alice", "general")
        );
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [
            "not-an-identifier",
            "alice",
            "alice#general",
            "#general",
            "@",
            "@#general",
            "@alice#",
            "@alice#gen#eral",
            "@al@ice",
            "@alice smith",
            "",
        ] {
            let err = parse_identifier(bad).unwrap_err();
            assert!(
                matches!(err, Error::UnrecognizedIdentifier(_)),
                "{bad:?} should be unrecognized, got {err:?}"
            );
        }
    }

    #[test]
    fn error_carries_the_trimmed_input() {
        let err = parse_identifier(" nope ").unwrap_err();
        assert_eq!(err.to_string(), "unrecognized identifier: nope");
    }
}
