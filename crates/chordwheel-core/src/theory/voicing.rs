//! Voicing suggestions parsed from free-text hints

use serde::{Deserialize, Serialize};

use super::chord::ChordQuality;

/// One selectable chord variant offered next to a wheel segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicingOption {
    pub quality: ChordQuality,
    pub label: String,
}

impl VoicingOption {
    pub fn new(quality: ChordQuality) -> Self {
        Self {
            quality,
            label: quality.label().to_string(),
        }
    }
}

/// Split a hint such as `"maj7, maj9, maj13 or 6"` into chord options.
///
/// The triad of `base_quality` always comes first. Unknown abbreviations and
/// repeats are dropped.
pub fn parse_voicing_suggestions(text: &str, base_quality: ChordQuality) -> Vec<VoicingOption> {
    let mut options = vec![VoicingOption::new(base_quality.triad())];

    let tokens = text
        .split(',')
        .flat_map(str::split_whitespace)
        .filter(|word| !word.eq_ignore_ascii_case("or"));

    for token in tokens {
        let Some(quality) = ChordQuality::from_abbreviation(token) else {
            tracing::debug!(token, "skipping unknown voicing abbreviation");
            continue;
        };
        if options.iter().all(|o| o.quality != quality) {
            options.push(VoicingOption::new(quality));
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualities(options: &[VoicingOption]) -> Vec<ChordQuality> {
        options.iter().map(|o| o.quality).collect()
    }

    #[test]
    fn test_comma_and_or_separated() {
        let options = parse_voicing_suggestions("maj7, maj9, maj13 or 6", ChordQuality::Major);
        assert_eq!(
            qualities(&options),
            vec![
                ChordQuality::Major,
                ChordQuality::Major7,
                ChordQuality::Major9,
                ChordQuality::Major13,
                ChordQuality::Major6,
            ]
        );
        assert_eq!(options[1].label, "maj7");
    }

    #[test]
    fn test_base_triad_is_prepended() {
        let options = parse_voicing_suggestions("m9 or m11", ChordQuality::Minor7);
        assert_eq!(
            qualities(&options),
            vec![ChordQuality::Minor, ChordQuality::Minor9, ChordQuality::Minor11]
        );
        assert_eq!(options[0].label, "Minor");
    }

    #[test]
    fn test_unknown_and_duplicate_tokens_are_dropped() {
        let options = parse_voicing_suggestions("7, wobble, 7,, OR 9", ChordQuality::Major);
        assert_eq!(
            qualities(&options),
            vec![ChordQuality::Major, ChordQuality::Dominant7, ChordQuality::Dominant9]
        );
        let only_base = parse_voicing_suggestions("", ChordQuality::Diminished7);
        assert_eq!(qualities(&only_base), vec![ChordQuality::Diminished]);
    }
}
