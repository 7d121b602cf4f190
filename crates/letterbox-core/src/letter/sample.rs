//! Built-in sample letters shown before any account is connected.

use super::model::{ACCENT_PALETTE, Letter, LetterId};

struct SampleLetter {
    id: u32,
    read: bool,
    sender_name: &'static str,
    sender_address: &'static str,
    initials: &'static str,
    accent_color: &'static str,
    subject: &'static str,
    display_date: &'static str,
    preview_text: &'static str,
    body: &'static str,
    signature: &'static str,
}

const SAMPLES: [SampleLetter; 4] = [
    SampleLetter {
        id: 1,
        read: false,
        sender_name: "Karl Architects",
        sender_address: "124 Bowery, NY",
        initials: "KA",
        accent_color: ACCENT_PALETTE[0],
        subject: "Sunday Plans",
        display_date: "Oct 14",
        preview_text: "Regarding our coffee meeting...",
        body: "My Dear Mit,\n\n\
It has been far too long since we last spoke properly. I was walking through the Lower East Side yesterday and stumbled upon that small jazz café we used to talk about—the one with the velvet curtains.\n\n\
Are we still on for coffee this Sunday? I would love to hear your thoughts on the new drafts. I believe we have finally cracked the facade issue, but I need your eye on it before we present to the board.\n\n\
Yours truly,",
        signature: "Karl",
    },
    SampleLetter {
        id: 2,
        read: false,
        sender_name: "Elara Studio",
        sender_address: "44 West St, LDN",
        initials: "ES",
        accent_color: ACCENT_PALETTE[1],
        subject: "Draft Concept III",
        display_date: "Oct 13",
        preview_text: "The latest renders attached.",
        body: "To the attention of Mit,\n\n\
We have updated the renders based on your feedback from Tuesday. The lighting has been adjusted to feel more \"afternoon sun\" rather than \"clinical bright\". \n\n\
I think you will appreciate how the shadows fall across the texture of the wall now—it feels much more tangible, almost touchable. Please review the attached sheets when you have a quiet moment.\n\n\
Sincerely,",
        signature: "Elara Design Team",
    },
    SampleLetter {
        id: 3,
        read: true,
        sender_name: "Mother",
        sender_address: "Vermont, USA",
        initials: "M",
        accent_color: ACCENT_PALETTE[2],
        subject: "The Antique Table",
        display_date: "Oct 10",
        preview_text: "I found the one...",
        body: "Dearest Mit,\n\n\
I was walking past that shop on 4th street today and I saw it. The oak table with the specific legs you mentioned last Christmas. \n\n\
I took a picture, but honestly, the camera doesn't do it justice. It has that lovely worn feeling, like it has been used for writing letters for a hundred years. The wood is warm and smooth to the touch.\n\n\
I asked them to hold it until tomorrow. Call me when you are free?\n\n\
Love,",
        signature: "Mom",
    },
    SampleLetter {
        id: 4,
        read: true,
        sender_name: "Gallery 42",
        sender_address: "Paris, FR",
        initials: "G",
        accent_color: ACCENT_PALETTE[3],
        subject: "Exhibition Invite",
        display_date: "Oct 09",
        preview_text: "Private View Invitation...",
        body: "Dear Patron,\n\n\
We are delighted to invite you to the private view of 'Silent Spaces', a new exhibition by Sarah Jenkins. Her work explores the quiet moments in urban environments.\n\n\
The curator has set aside a catalogue for you at the front desk. Drinks will be served from 7pm. We hope to see you there.\n\n\
Regards,",
        signature: "The Gallery",
    },
];

impl SampleLetter {
    fn to_letter(&self) -> Letter {
        Letter {
            id: LetterId::from(self.id),
            read: self.read,
            sender_name: self.sender_name.to_string(),
            sender_address: self.sender_address.to_string(),
            initials: self.initials.to_string(),
            accent_color: self.accent_color.to_string(),
            subject: self.subject.to_string(),
            display_date: self.display_date.to_string(),
            preview_text: self.preview_text.to_string(),
            body: self.body.to_string(),
            signature: self.signature.to_string(),
            external_message_id: None,
        }
    }
}

/// Returns fresh copies of the built-in sample letters.
///
/// Every call builds new values, so `read` flags set on an earlier copy
/// never leak into a restored stack.
#[must_use]
pub fn sample_letters() -> Vec<Letter> {
    SAMPLES.iter().map(SampleLetter::to_letter).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_shape() {
        let letters = sample_letters();
        assert_eq!(letters.len(), 4);
        assert_eq!(letters.iter().filter(|l| !l.read).count(), 2);
        assert!(!letters[0].read);
        assert!(!letters[1].read);
    }

    #[test]
    fn test_sample_ids_unique() {
        let letters = sample_letters();
        let ids: HashSet<_> = letters.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids.len(), letters.len());
    }

    #[test]
    fn test_sample_initials_are_short_uppercase() {
        for letter in sample_letters() {
            let count = letter.initials.chars().count();
            assert!((1..=2).contains(&count), "{}", letter.initials);
            assert!(letter.initials.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_sample_bodies_have_paragraphs() {
        for letter in sample_letters() {
            assert!(letter.paragraphs().count() >= 3);
            assert!(!letter.display_date.is_empty());
        }
    }

    #[test]
    fn test_sample_text() {
        let letters = sample_letters();
        assert!(letters[0].body.contains("jazz café we used to talk about—the one with the velvet curtains."));
        assert!(letters[1].body.contains("the wall now—it feels much more tangible"));
        assert_eq!(letters[3].initials, "G");
        assert_eq!(letters[3].signature, "The Gallery");
    }

    #[test]
    fn test_fresh_copies() {
        let mut first = sample_letters();
        first[0].read = true;
        assert!(!sample_letters()[0].read);
    }
}
