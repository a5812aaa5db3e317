use std::fmt;

/// Canonical deal status after normalization.
///
/// The source data mixes Spanish and English free text ("Cerrado Ganado",
/// "won", "VENTA", …). Everything funnels into Won/Lost/Contact; anything
/// unrecognised keeps its own capitalized label in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Won,
    Lost,
    Contact,
    Unknown,
    Other(String),
}

impl Status {
    pub fn is_won(&self) -> bool {
        matches!(self, Status::Won)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self, Status::Lost)
    }

    /// Won or Lost — the only states where a closure date means anything.
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Won | Status::Lost)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Won => write!(f, "Cerrado Ganado"),
            Status::Lost => write!(f, "Cerrado Perdido"),
            Status::Contact => write!(f, "Contacto"),
            Status::Unknown => write!(f, "Desconocido"),
            Status::Other(label) => write!(f, "{}", label),
        }
    }
}

/// Map a free-text status onto a [`Status`]. Case-insensitive, trimmed,
/// substring match, checked in priority order. Absent/empty → `Unknown`.
///
/// Idempotent over its own display form: feeding a canonical label back in
/// yields the same variant.
pub fn normalize_status(raw: Option<&str>) -> Status {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Status::Unknown,
    };
    let lower = raw.to_lowercase();

    if ["ganado", "won", "venta"].iter().any(|k| lower.contains(k)) {
        return Status::Won;
    }
    if ["perdido", "lost"].iter().any(|k| lower.contains(k)) {
        return Status::Lost;
    }
    if ["contacto", "contact"].iter().any(|k| lower.contains(k)) {
        return Status::Contact;
    }
    if ["desconocido", "unknown"].iter().any(|k| lower.contains(k)) {
        return Status::Unknown;
    }

    Status::Other(capitalize(&lower))
}

/// First character upper-cased, remainder already lower-cased by the caller.
fn capitalize(lower: &str) -> String {
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_and_english_map_to_the_same_variant() {
        assert_eq!(normalize_status(Some("Cerrado Ganado")), Status::Won);
        assert_eq!(normalize_status(Some("won")), Status::Won);
        assert_eq!(normalize_status(Some("VENTA directa")), Status::Won);
        assert_eq!(normalize_status(Some("Cerrado Perdido")), Status::Lost);
        assert_eq!(normalize_status(Some("lost")), Status::Lost);
        assert_eq!(normalize_status(Some("Contacto")), Status::Contact);
        assert_eq!(normalize_status(Some("first contact")), Status::Contact);
    }

    #[test]
    fn noisy_input_still_matches() {
        assert_eq!(normalize_status(Some("  WON!! ")), Status::Won);
        assert_eq!(
            normalize_status(Some("  WON!! ")),
            normalize_status(Some("Cerrado Ganado"))
        );
    }

    #[test]
    fn absent_or_empty_is_unknown() {
        assert_eq!(normalize_status(None), Status::Unknown);
        assert_eq!(normalize_status(Some("")), Status::Unknown);
        assert_eq!(normalize_status(Some("   ")), Status::Unknown);
    }

    #[test]
    fn unrecognised_status_is_capitalized_other() {
        assert_eq!(
            normalize_status(Some("en NEGOCIACIÓN")),
            Status::Other("En negociación".into())
        );
    }

    #[test]
    fn normalization_is_idempotent_over_display_form() {
        for raw in [
            "Cerrado Ganado",
            "won",
            "lost",
            "Contacto",
            "",
            "en espera",
            "Desconocido",
        ] {
            let once = normalize_status(Some(raw));
            let twice = normalize_status(Some(&once.to_string()));
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
        }
    }
}
