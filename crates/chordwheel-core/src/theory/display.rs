//! Cosmetic chord-symbol formatting

use super::pitch::split_note_prefix;

const SUFFIX_GLYPHS: [(&str, &str); 4] = [
    ("m7b5", "ø7"),
    ("dim7", "°7"),
    ("dim", "°"),
    ("aug", "+"),
];

/// Pretty-print a chord symbol for display: strips whitespace and uses
/// music glyphs for accidentals and altered qualities.
///
/// Total over any input; unrecognized text passes through with only the
/// glyph substitutions applied.
///
/// ```
/// use chordwheel_core::format_chord_for_display;
/// assert_eq!(format_chord_for_display("Bb m7b5"), "B♭ø7");
/// assert_eq!(format_chord_for_display("F#7#5/C#"), "F♯7♯5/C♯");
/// ```
pub fn format_chord_for_display(symbol: &str) -> String {
    let compact: String = symbol.chars().filter(|c| !c.is_whitespace()).collect();

    let (main, bass) = match compact.rsplit_once('/') {
        Some((main, bass)) if is_bare_note(bass) => (main, Some(bass)),
        _ => (compact.as_str(), None),
    };

    let mut out = String::with_capacity(compact.len() + 4);
    let suffix = push_root(&mut out, main);
    out.push_str(&suffix_glyphs(suffix));
    if let Some(bass) = bass {
        out.push('/');
        let rest = push_root(&mut out, bass);
        out.push_str(rest);
    }
    out
}

fn is_bare_note(text: &str) -> bool {
    matches!(split_note_prefix(text), Some((_, rest)) if rest.is_empty())
}

/// Copy a leading note name (letter uppercased, accidentals as glyphs) and
/// return the remainder.
fn push_root<'a>(out: &mut String, text: &'a str) -> &'a str {
    let mut chars = text.char_indices();
    let Some((_, letter)) = chars.next() else {
        return text;
    };
    if !matches!(letter.to_ascii_uppercase(), 'A'..='G') {
        return text;
    }
    out.push(letter.to_ascii_uppercase());

    let mut rest_start = letter.len_utf8();
    for (idx, ch) in chars {
        match ch {
            '#' | '♯' => out.push('♯'),
            'b' | '♭' => out.push('♭'),
            _ => break,
        }
        rest_start = idx + ch.len_utf8();
    }
    &text[rest_start..]
}

fn suffix_glyphs(suffix: &str) -> String {
    let mut text = suffix.to_string();
    for (from, to) in SUFFIX_GLYPHS {
        text = text.replace(from, to);
    }

    // Accidentals only count when they alter a numbered extension
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let before_digit = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
            match ch {
                'b' if before_digit => '♭',
                '#' if before_digit => '♯',
                other => other,
            }
        })
        .collect()
}
