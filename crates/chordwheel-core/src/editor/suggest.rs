//! Next-section heuristic for "add suggested section"

use crate::song::SectionType;

/// Songs at least this long are treated as nearing their end
const LATE_FORM_SECTIONS: usize = 6;

/// Pick a plausible section type to append after `form`.
///
/// A small rule table keyed on the last section, with a couple of
/// context checks (how many choruses so far, whether a bridge exists).
pub fn suggest_next_section(form: &[SectionType]) -> SectionType {
    let Some(&last) = form.last() else {
        return SectionType::Verse;
    };
    let count = |t: SectionType| form.iter().filter(|&&s| s == t).count();
    let choruses = count(SectionType::Chorus);
    let has_bridge = count(SectionType::Bridge) > 0;
    let late = form.len() >= LATE_FORM_SECTIONS;

    match last {
        SectionType::Intro => SectionType::Verse,
        SectionType::Verse => SectionType::Chorus,
        SectionType::PreChorus => SectionType::Chorus,
        SectionType::Chorus => match choruses {
            c if c >= 3 || (has_bridge && c >= 2) => SectionType::Outro,
            2 => SectionType::Bridge,
            _ => SectionType::Verse,
        },
        SectionType::Bridge if late => SectionType::Outro,
        SectionType::Bridge => SectionType::Chorus,
        SectionType::Solo | SectionType::Interlude | SectionType::Breakdown => {
            SectionType::Chorus
        }
        SectionType::Hook => SectionType::Verse,
        SectionType::Outro => SectionType::Tag,
        SectionType::Tag => SectionType::Outro,
        SectionType::Custom => SectionType::Verse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SectionType::*;

    #[test]
    fn test_pop_form_progression() {
        let mut form = vec![Verse];
        for _ in 0..6 {
            form.push(suggest_next_section(&form));
        }
        assert_eq!(form, vec![Verse, Chorus, Verse, Chorus, Bridge, Chorus, Outro]);
    }

    #[test]
    fn test_rules() {
        assert_eq!(suggest_next_section(&[]), Verse);
        assert_eq!(suggest_next_section(&[Intro]), Verse);
        assert_eq!(suggest_next_section(&[Verse, PreChorus]), Chorus);
        assert_eq!(suggest_next_section(&[Verse, Solo]), Chorus);
        assert_eq!(suggest_next_section(&[Verse, Bridge]), Chorus);
        assert_eq!(
            suggest_next_section(&[Intro, Verse, Chorus, Verse, Chorus, Bridge]),
            Outro
        );
    }
}
