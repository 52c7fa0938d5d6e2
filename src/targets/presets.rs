// src/targets/presets.rs
// =============================================================================
// Built-in target lists.
//
// Each preset is a named, ordered list of search-result queries against the
// Research Catalogue portal. The query strings are kept verbatim, including
// the repeated parameters (statusprogress, statuspublished, includelimited,
// includeprivate), because the API treats repeats as "any of".
// =============================================================================

use super::{RequestTarget, TargetError, TargetList};

pub const DEFAULT_PRESET: &str = "internal-research";

// (name, path) pairs, in output order
const INTERNAL_RESEARCH: [(&str, &str); 6] = [
    (
        "published-page-0",
        "portal/search-result?fulltext=&title=&autocomplete=&keyword=&portal=6&statusprogress=0&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&type_research=research&resulttype=research&format=json&limit=250&page=0",
    ),
    (
        "published-page-1",
        "portal/search-result?fulltext=&title=&autocomplete=&keyword=&portal=6&statusprogress=0&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&type_research=research&resulttype=research&format=json&limit=250&page=1",
    ),
    (
        "published-page-2",
        "portal/search-result?fulltext=&title=&autocomplete=&keyword=&portal=6&statusprogress=0&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&type_research=research&resulttype=research&format=json&limit=250&page=2",
    ),
    (
        "lectorate",
        "portal/search-result?fulltext=&title=&autocomplete=&keyword=KonCon+Lectorate&portal=&statusprogress=0&statusprogress=1&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&type_research=research&resulttype=research&format=json&limit=250&page=0",
    ),
    (
        "sonology",
        "portal/search-result?fulltext=&title=&autocomplete=&keyword=sonology&portal=6&statusprogress=0&statusprogress=1&statuspublished=0&includelimited=0&includeprivate=0&type_research=research&resulttype=research&format=json&limit=50&page=0",
    ),
    (
        "teachers",
        "portal/search-result?fulltext=&title=&autocomplete=&keyword=Research+by+teachers+of+the+Royal+Conservatoire&portal=&statusprogress=0&statusprogress=1&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&type_research=research&resulttype=research&format=json&limit=50&page=0",
    ),
];

// Just the three paged portal-6 queries
const PUBLISHED: [(&str, &str); 3] = [
    INTERNAL_RESEARCH[0],
    INTERNAL_RESEARCH[1],
    INTERNAL_RESEARCH[2],
];

const PRESETS: &[(&str, &[(&str, &str)])] = &[
    (DEFAULT_PRESET, &INTERNAL_RESEARCH),
    ("published", &PUBLISHED),
];

pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}

// Looks up a preset by name and turns it into a TargetList
pub fn preset(name: &str) -> Result<TargetList, TargetError> {
    let (_, entries) = PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .ok_or_else(|| TargetError::UnknownPreset(name.to_string(), preset_names().join(", ")))?;

    let targets = entries
        .iter()
        .map(|(target_name, path)| RequestTarget::new(*target_name, *path))
        .collect();

    TargetList::new(name, targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_has_six_targets_in_order() {
        let list = preset(DEFAULT_PRESET).unwrap();
        assert_eq!(list.len(), 6);
        let names: Vec<_> = list.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "published-page-0",
                "published-page-1",
                "published-page-2",
                "lectorate",
                "sonology",
                "teachers"
            ]
        );
    }

    #[test]
    fn test_every_preset_target_asks_for_json() {
        for name in preset_names() {
            for target in &preset(name).unwrap() {
                assert!(target.path.contains("format=json"), "{}", target.name);
            }
        }
    }

    #[test]
    fn test_unknown_preset() {
        let err = preset("nope").unwrap_err();
        assert!(matches!(err, TargetError::UnknownPreset(ref n, _) if n == "nope"));
    }
}
