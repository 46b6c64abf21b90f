//! Filesystem-safe tokens from free-form order text.

/// Maximum length of a sanitized token.
const MAX_LEN: usize = 50;

/// Reduces arbitrary text to a filename-safe token: diacritics folded to
/// their ASCII base letter, anything outside `[A-Za-z0-9-_ ]` dropped,
/// surrounding whitespace trimmed, internal whitespace runs collapsed to a
/// single `_`, and the result truncated to 50 characters.
///
/// Deterministic and side-effect free; an empty or fully-disallowed input
/// yields an empty token (callers supply their own default).
pub fn sanitize(input: &str) -> String {
    let kept: String = input
        .chars()
        .map(fold_diacritic)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();

    let mut out = String::with_capacity(kept.len());
    let mut pending_gap = false;
    for c in kept.trim().chars() {
        if c == ' ' {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            out.push('_');
            pending_gap = false;
        }
        out.push(c);
    }

    out.chars().take(MAX_LEN).collect()
}

/// Maps accented Latin letters to their unaccented base. Characters with no
/// mapping pass through unchanged and are filtered by the caller's allowed
/// class, which matches stripping combining marks after NFD decomposition.
pub(crate) fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ā' | 'Ă' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ė' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' | 'Ē' | 'Ė' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'ī' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' | 'Ī' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ō' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ū' => 'U',
        'ñ' | 'ń' => 'n',
        'Ñ' | 'Ń' => 'N',
        'ç' | 'ć' | 'č' => 'c',
        'Ç' | 'Ć' | 'Č' => 'C',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        'š' | 'ś' => 's',
        'Š' | 'Ś' => 'S',
        'ž' | 'ź' | 'ż' => 'z',
        'Ž' | 'Ź' | 'Ż' => 'Z',
        'ł' => 'l',
        'Ł' => 'L',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_token(token: &str) -> bool {
        token.len() <= 50
            && !token.starts_with(' ')
            && !token.ends_with(' ')
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(sanitize("Juan Pérez"), "Juan_Perez");
        assert_eq!(sanitize("Torta de Chocolate"), "Torta_de_Chocolate");
        assert_eq!(sanitize("Ñandú añejo"), "Nandu_anejo");
    }

    #[test]
    fn drops_disallowed_characters() {
        assert_eq!(sanitize("torta (¡grande!) #3"), "torta_grande_3");
        assert_eq!(sanitize("a/b\\c:d"), "abcd");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(sanitize("  uno   dos\t tres  "), "uno_dos_tres");
    }

    #[test]
    fn empty_and_fully_disallowed_yield_empty() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("¡¿@#$%!"), "");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn truncates_to_fifty() {
        let long = "x".repeat(120);
        assert_eq!(sanitize(&long).len(), 50);
    }

    #[test]
    fn output_always_matches_token_class() {
        let inputs = [
            "",
            "   ",
            "Pérez-Soto_99",
            "torta súper especial de manjar y lúcuma con más texto que entra",
            "日本語テキスト",
            "tab\there\nnewline",
        ];
        for input in inputs {
            assert!(is_valid_token(&sanitize(input)), "input: {:?}", input);
        }
    }
}
