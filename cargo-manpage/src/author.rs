//! Author name and email extraction.
//!
//! Authors arrive as free-form text, either from `author=` directives or from
//! the package manifest's author strings. The accepted shapes are an RFC
//! 5322-style mailbox (`Name <email>`), a bare name, a bare address, or a
//! name followed by an unbracketed address.

/// One manual page author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name, possibly empty.
    pub name: String,
    /// Email address, possibly empty.
    pub email: String,
}

impl Author {
    /// Renders the author the way manual page renderers expect,
    /// with the email surrounded by angle brackets.
    pub fn display(&self) -> String {
        if self.email.is_empty() {
            self.name.clone()
        } else if self.name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

/// Parses a line of text to extract the name and/or email from it.
///
/// Text without an `@` is taken to be a bare name. A mailbox with angle
/// brackets is split into its two parts. Anything else is assumed to be
/// `"Name email@domain"`: the last whitespace-separated token is wrapped in
/// angle brackets and the text parsed again. Pathological input can yield an
/// empty name, an empty email, or both.
pub fn extract_name_email(text: &str) -> (String, String) {
    let text = text.trim();
    if !text.contains('@') {
        return (text.to_owned(), String::new());
    }

    let (name, email) = parse_mailbox(text);
    if !name.is_empty() && !email.is_empty() {
        return (name, email);
    }

    // Wrap the email address with angle brackets and try again
    match text.rsplit_once(char::is_whitespace) {
        Some((head, tail)) if tail.contains('@') => {
            parse_mailbox(&format!("{} <{tail}>", head.trim_end()))
        }
        _ => (name, email),
    }
}

/// Splits a single mailbox into `(name, email)`.
///
/// Without angle brackets only a bare address (no internal whitespace) is
/// recognized; everything else yields two empty strings so the caller can
/// attempt the rewrite pass.
fn parse_mailbox(text: &str) -> (String, String) {
    if let (Some(open), Some(close)) = (text.find('<'), text.rfind('>')) {
        if open < close {
            let name = text
                .get(..open)
                .unwrap_or_default()
                .trim()
                .trim_matches('"')
                .trim();
            let email = text.get(open + 1..close).unwrap_or_default().trim();
            return (name.to_owned(), email.to_owned());
        }
    }

    if !text.contains(char::is_whitespace) {
        return (String::new(), text.to_owned());
    }

    (String::new(), String::new())
}
