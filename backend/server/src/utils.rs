use rsvp::{Field, RsvpDraft};
use tracing::debug;

const GUEST_NAME_PREFIX: &str = "guestNames.";

/// Builds a draft from urlencoded pairs. Companion names arrive as
/// `guestNames.0`, `guestNames.1`, ... in any order; they are sorted by index
/// and blank ones are dropped before validation.
pub fn draft_from_pairs(pairs: Vec<(String, String)>) -> RsvpDraft {
    let mut draft = RsvpDraft::default();
    let mut guest_names: Vec<(usize, String)> = Vec::new();

    for (key, value) in pairs {
        if let Some(index) = key.strip_prefix(GUEST_NAME_PREFIX) {
            match index.parse() {
                Ok(index) => guest_names.push((index, value)),
                Err(_) => debug!("Ignoring companion key {key}"),
            }
            continue;
        }

        match Field::from_key(&key) {
            Some(Field::FullName) => draft.full_name = value,
            Some(Field::Whatsapp) => draft.whatsapp = Some(value),
            Some(Field::Attending) => draft.attending = Some(value),
            Some(Field::GuestNames) | None => debug!("Ignoring form key {key}"),
        }
    }

    guest_names.sort_by_key(|(index, _)| *index);
    draft.guest_names = guest_names
        .into_iter()
        .map(|(_, name)| name)
        .filter(|name| !name.trim().is_empty())
        .collect();

    draft
}
