//! Line-level section classifier for well documents

use super::Aspect;
use std::collections::BTreeMap;

/// Keywords that route a line to the geological section.
const GEOLOGICAL_KEYWORDS: [&str; 4] = ["formation", "lithology", "geology", "strat"];

/// Keywords that route a line to the technical section.
const TECHNICAL_KEYWORDS: [&str; 5] = ["depth", "pressure", "rate", "volume", "porosity"];

/// Lines with more ASCII digits than this are treated as numerical data.
const DIGIT_THRESHOLD: usize = 3;

/// Partition a document into labeled sections, line by line.
///
/// The classifier carries a current section across lines, starting at
/// `well_info`. Each line is tested lower-cased against the keyword lists in
/// fixed priority order: geological keywords first, then technical keywords,
/// then digit density. A match switches the current section before the line
/// is appended, so lines that match nothing stay with their predecessor.
/// Every appended line keeps its original casing and gets a trailing newline.
/// Sections no line landed in are absent from the result.
pub fn classify(text: &str) -> BTreeMap<Aspect, String> {
    let mut sections: BTreeMap<Aspect, String> = BTreeMap::new();
    let mut current = Aspect::WellInfo;

    for line in text.lines() {
        let lowered = line.to_lowercase();

        if GEOLOGICAL_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            current = Aspect::GeologicalData;
        } else if TECHNICAL_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            current = Aspect::TechnicalData;
        } else if digit_count(line) > DIGIT_THRESHOLD {
            current = Aspect::NumericalData;
        }

        let section = sections.entry(current).or_default();
        section.push_str(line);
        section.push('\n');
    }

    sections
}

fn digit_count(line: &str) -> usize {
    line.chars().filter(|c| c.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_routes_by_keyword_and_digits() {
        let text = "Formation: sandstone\nDepth: 3000 ft\nAPI number 4212309876";
        let sections = classify(text);

        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections.get(&Aspect::GeologicalData).map(String::as_str),
            Some("Formation: sandstone\n")
        );
        assert_eq!(
            sections.get(&Aspect::TechnicalData).map(String::as_str),
            Some("Depth: 3000 ft\n")
        );
        assert_eq!(
            sections.get(&Aspect::NumericalData).map(String::as_str),
            Some("API number 4212309876\n")
        );
        assert!(!sections.contains_key(&Aspect::WellInfo));
    }

    #[test]
    fn test_classify_starts_in_well_info() {
        let text = "Well name: Smith #1\nOperator: Acme\nCounty: Reeves";
        let sections = classify(text);

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections.get(&Aspect::WellInfo).map(String::as_str),
            Some("Well name: Smith #1\nOperator: Acme\nCounty: Reeves\n")
        );
    }

    #[test]
    fn test_classify_unmatched_lines_follow_current_section() {
        let text = "Formation tops listed below\nSandstone\nShale with silt";
        let sections = classify(text);

        assert_eq!(
            sections.get(&Aspect::GeologicalData).map(String::as_str),
            Some("Formation tops listed below\nSandstone\nShale with silt\n")
        );
    }

    #[test]
    fn test_classify_geological_wins_over_technical_and_digits() {
        // Contains a technical keyword and 5 digits but the geological
        // keyword takes priority.
        let sections = classify("Formation depth 12345");

        assert!(sections.contains_key(&Aspect::GeologicalData));
        assert!(!sections.contains_key(&Aspect::TechnicalData));
        assert!(!sections.contains_key(&Aspect::NumericalData));
    }

    #[test]
    fn test_classify_technical_wins_over_digits() {
        let sections = classify("Pressure reading 98765 psi");

        assert!(sections.contains_key(&Aspect::TechnicalData));
        assert!(!sections.contains_key(&Aspect::NumericalData));
    }

    #[test]
    fn test_classify_digit_threshold_is_strictly_more_than_three() {
        // Three digits stay in the current section.
        let three = classify("serial abc 123");
        assert!(three.contains_key(&Aspect::WellInfo));
        assert!(!three.contains_key(&Aspect::NumericalData));

        // Four digits switch to numerical data.
        let four = classify("serial abc 1234");
        assert!(four.contains_key(&Aspect::NumericalData));
        assert!(!four.contains_key(&Aspect::WellInfo));
    }

    #[test]
    fn test_classify_digits_counted_across_the_whole_line() {
        // Digits need not be contiguous: 1 + 2 + 3 + 4 scattered still counts.
        let sections = classify("a1 b2 c3 d4");
        assert!(sections.contains_key(&Aspect::NumericalData));
    }

    #[test]
    fn test_classify_keyword_match_is_case_insensitive() {
        let sections = classify("FORMATION TOPS");
        assert!(sections.contains_key(&Aspect::GeologicalData));
    }

    #[test]
    fn test_classify_substring_keyword_matches() {
        // "strat" matches inside "stratigraphy".
        let sections = classify("Stratigraphy of the basin");
        assert!(sections.contains_key(&Aspect::GeologicalData));
    }

    #[test]
    fn test_classify_empty_text_yields_no_sections() {
        assert!(classify("").is_empty());
    }

    #[test]
    fn test_classify_state_persists_after_numerical_switch() {
        let text = "4212309876\nfollow-up line";
        let sections = classify(text);

        assert_eq!(
            sections.get(&Aspect::NumericalData).map(String::as_str),
            Some("4212309876\nfollow-up line\n")
        );
    }
}
