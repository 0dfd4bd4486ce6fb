use crate::error::SyntaxErrorCode;

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Resolve the body of a character reference (the text between `&` and `;`).
///
/// Contract:
/// - Named references `amp`, `apos`, `quot`, `lt`, `gt`, `shy` match ASCII
///   case-insensitively. `shy` resolves to nothing.
/// - `#NNN` is decimal, `#xNNNN` / `#XNNNN` is hexadecimal.
/// - An empty body is `EmptyCharacterReference`; an unknown name is
///   `UnknownCharacterReference`.
/// - A numeric body that does not parse to a Unicode scalar value resolves to
///   nothing and is not reported.
pub(crate) fn resolve_character_reference(body: &str) -> Result<Option<char>, SyntaxErrorCode> {
    if body.is_empty() {
        return Err(SyntaxErrorCode::EmptyCharacterReference);
    }

    if let Some(numeric) = body.strip_prefix('#') {
        return Ok(resolve_numeric(numeric));
    }

    let named = [
        ("amp", Some('&')),
        ("apos", Some('\'')),
        ("quot", Some('"')),
        ("lt", Some('<')),
        ("gt", Some('>')),
        ("shy", None),
    ];
    named
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(body))
        .map(|(_, ch)| *ch)
        .ok_or(SyntaxErrorCode::UnknownCharacterReference)
}

fn resolve_numeric(numeric: &str) -> Option<char> {
    let (digits, radix, max_digits) = match numeric.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16, MAX_HEX_DIGITS),
        None => (numeric, 10, MAX_DEC_DIGITS),
    };

    let well_formed = !digits.is_empty()
        && digits.len() <= max_digits
        && digits.bytes().all(|b| match radix {
            16 => b.is_ascii_hexdigit(),
            _ => b.is_ascii_digit(),
        });

    let resolved = well_formed
        .then(|| u32::from_str_radix(digits, radix).ok())
        .flatten()
        .and_then(char::from_u32);

    if resolved.is_none() {
        log::debug!(
            target: "markup.entities",
            "numeric character reference '#{numeric}' does not resolve; dropping it"
        );
    }
    resolved
}
