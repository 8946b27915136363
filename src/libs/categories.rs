//! Keyword-based task categorization.
//!
//! The productivity report groups tasks into named categories by keywords
//! found in their title or description. The table lives here as data so the
//! classifier is testable on its own, and the report prompt renders its
//! instructions from the same table, keeping the two in lockstep.

/// Keyword groups and the category each maps to, checked in order.
pub const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["report", "analysis"], "Reporting & Analysis"),
    (&["code", "develop"], "Development"),
    (&["meeting", "schedule"], "Meetings & Coordination"),
    (&["grill", "cook", "food"], "Cooking & Meals"),
    (&["fix", "repair"], "Maintenance & Repair"),
    (&["clean", "organize"], "Housekeeping"),
    (&["exercise", "workout"], "Health & Fitness"),
];

/// Category for text matching none of the keyword groups.
pub const DEFAULT_CATEGORY: &str = "General";

/// Classifies task text into a category. Matching is case-insensitive
/// substring search over the whole text; the first matching rule wins.
pub fn categorize(text: &str) -> &'static str {
    let haystack = text.to_lowercase();
    for (keywords, category) in CATEGORY_RULES {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return category;
        }
    }
    DEFAULT_CATEGORY
}

/// Renders the keyword table as prompt instructions, e.g.
/// `"report", "analysis" -> "Reporting & Analysis"; ...; otherwise "General"`.
pub fn prompt_rules() -> String {
    let mut rules: Vec<String> = CATEGORY_RULES
        .iter()
        .map(|(keywords, category)| {
            let kws = keywords
                .iter()
                .map(|kw| format!("\"{}\"", kw))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} -> \"{}\"", kws, category)
        })
        .collect();
    rules.push(format!("otherwise \"{}\"", DEFAULT_CATEGORY));
    rules.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_keyword_maps_to_its_category() {
        for (keywords, category) in CATEGORY_RULES {
            for kw in *keywords {
                assert_eq!(categorize(kw), *category, "keyword {:?}", kw);
            }
        }
    }

    #[test]
    fn test_matching_is_case_insensitive_and_substring() {
        assert_eq!(categorize("Fix the leaking tap"), "Maintenance & Repair");
        assert_eq!(categorize("WEEKLY REPORT for Q3"), "Reporting & Analysis");
        assert_eq!(categorize("Develop onboarding flow"), "Development");
        assert_eq!(categorize("Grill burgers on Saturday"), "Cooking & Meals");
    }

    #[test]
    fn test_unmatched_text_is_general() {
        assert_eq!(categorize("Buy a birthday present"), DEFAULT_CATEGORY);
        assert_eq!(categorize(""), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_prompt_rules_covers_every_category() {
        let rules = prompt_rules();
        for (_, category) in CATEGORY_RULES {
            assert!(rules.contains(category));
        }
        assert!(rules.contains(DEFAULT_CATEGORY));
    }
}
