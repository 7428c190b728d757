//! Slug e pattern di validazione condivisi dai DTO

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Slug valido: minuscole, cifre e trattini singoli
    pub static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Telefono: cifre con eventuale prefisso internazionale e separatori
    pub static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap();
}

/// Ricava uno slug dal testo: `"King's College London"` -> `"king-s-college-london"`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Slug esplicito se fornito, altrimenti derivato dal nome
pub fn slug_or_from(slug: Option<&str>, name: &str) -> String {
    match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(name),
    }
}
