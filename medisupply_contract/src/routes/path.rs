//! Path templates with `:name` placeholders

use std::collections::BTreeMap;
use std::fmt::Display;

/// Substitute `:name` placeholders with parameter values
///
/// Parameters are applied in the order given; each replaces the first
/// literal occurrence of `:key` in the current string. Placeholders without
/// a parameter stay in the output verbatim.
pub fn build_path<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut path = template.to_string();
    for (key, value) in params {
        let placeholder = format!(":{}", key.as_ref());
        path = path.replacen(&placeholder, &value.to_string(), 1);
    }
    log::trace!("Built path '{}' from template '{}'", path, template);
    path
}

/// Placeholder names in template order
pub fn placeholders(template: &str) -> Vec<&str> {
    template
        .split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Match a concrete path against a template, extracting placeholder values
pub fn match_template(template: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let template_segments: Vec<&str> = template.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if template_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in template_segments.iter().zip(&path_segments) {
        match expected.strip_prefix(':') {
            Some(name) if !name.is_empty() => {
                if actual.is_empty() {
                    return None;
                }
                params.insert(name.to_string(), actual.to_string());
            }
            _ if expected == actual => {}
            _ => return None,
        }
    }
    Some(params)
}

/// Template must be absolute with well-formed placeholder segments
pub fn is_well_formed(template: &str) -> bool {
    template.starts_with('/')
        && template
            .split('/')
            .skip(1)
            .all(|segment| !segment.is_empty() && segment != ":")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "/api/suppliers/:supplierId/medicines";

    #[test]
    fn test_build_path_substitutes_placeholder() {
        assert_eq!(
            build_path(LISTING, [("supplierId", "S1")]),
            "/api/suppliers/S1/medicines"
        );
    }

    #[test]
    fn test_missing_param_leaves_placeholder_verbatim() {
        // Deliberate: a missing parameter is not an error, the placeholder stays.
        let no_params: [(&str, &str); 0] = [];
        assert_eq!(build_path(LISTING, no_params), LISTING);
        assert_eq!(build_path(LISTING, [("pharmacyId", "P1")]), LISTING);
    }

    #[test]
    fn test_numeric_values_use_display() {
        assert_eq!(
            build_path("/api/orders/:orderId/items/:index", [("orderId", 42), ("index", 3)]),
            "/api/orders/42/items/3"
        );
    }

    #[test]
    fn test_only_first_occurrence_is_replaced() {
        assert_eq!(build_path("/a/:id/b/:id", [("id", "X")]), "/a/X/b/:id");
    }

    #[test]
    fn test_replacement_is_literal_substring() {
        // `:supplier` is a prefix of `:supplierId`, so it matches there.
        assert_eq!(
            build_path(LISTING, [("supplier", "S1")]),
            "/api/suppliers/S1Id/medicines"
        );
    }

    #[test]
    fn test_placeholder_shaped_values_chain() {
        let params = vec![("a", ":b"), ("b", "2")];
        assert_eq!(build_path("/x/:a", params), "/x/2");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(LISTING), vec!["supplierId"]);
        assert!(placeholders("/api/health").is_empty());
    }

    #[test]
    fn test_match_template() {
        let params = match_template(LISTING, "/api/suppliers/S1/medicines").expect("matches");
        assert_eq!(params.get("supplierId").map(String::as_str), Some("S1"));

        assert!(match_template(LISTING, "/api/suppliers//medicines").is_none());
        assert!(match_template(LISTING, "/api/suppliers/S1").is_none());
        assert!(match_template("/api/health", "/api/health").is_some());
        assert!(match_template("/api/health", "/api/state").is_none());
    }

    #[test]
    fn test_well_formed_templates() {
        assert!(is_well_formed(LISTING));
        assert!(is_well_formed("/api/health"));
        assert!(!is_well_formed("api/health"));
        assert!(!is_well_formed("/api//health"));
        assert!(!is_well_formed("/api/:/medicines"));
    }
}
