//! Neighbourhood tagging against a fixed Toronto-area gazetteer.

use super::haystack;

/// Returned when no gazetteer entry appears in the text.
pub const DEFAULT_NEIGHBOURHOOD: &str = "Toronto";

/// Place names searched in order; the first hit wins.
///
/// Neighbourhoods come before the surrounding municipalities and regions, and
/// the catch-all names (`GTA`, `Toronto`) sit at the end.
pub const GAZETTEER: &[&str] = &[
    "Downtown",
    "Etobicoke",
    "North York",
    "Scarborough",
    "East York",
    "Yorkville",
    "The Beaches",
    "Liberty Village",
    "King West",
    "Queen West",
    "Distillery District",
    "Financial District",
    "Entertainment District",
    "Harbourfront",
    "CityPlace",
    "Junction",
    "Leslieville",
    "Roncesvalles",
    "High Park",
    "Danforth",
    "Little Italy",
    "Kensington Market",
    "Chinatown",
    "Annex",
    "Forest Hill",
    "Rosedale",
    "Cabbagetown",
    "Riverdale",
    "Parkdale",
    "Bloor West Village",
    "Lawrence Park",
    "Don Mills",
    "Thorncliffe Park",
    "York Mills",
    "Willowdale",
    "Agincourt",
    "Malvern",
    "Mimico",
    "Long Branch",
    "Islington",
    "Kingsway",
    "Humber Bay",
    "Jane and Finch",
    "Downsview",
    "Eglinton West",
    "Leaside",
    "Brampton",
    "Mississauga",
    "Vaughan",
    "Markham",
    "Richmond Hill",
    "Oakville",
    "Burlington",
    "Pickering",
    "Ajax",
    "Whitby",
    "Oshawa",
    "Durham",
    "Peel",
    "Halton",
    "York Region",
    "GTA",
    "Toronto",
    "Simcoe",
];

/// Tag an article with the first gazetteer entry found in its headline or teaser.
pub fn tag_neighbourhood(title: &str, description: &str) -> &'static str {
    let text = haystack(title, description);
    GAZETTEER
        .iter()
        .find(|name| text.contains(&name.to_lowercase()))
        .copied()
        .unwrap_or(DEFAULT_NEIGHBOURHOOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downtown_matches_lowercase_mention() {
        assert_eq!(
            tag_neighbourhood("Man charged after robbery downtown", ""),
            "Downtown"
        );
    }

    #[test]
    fn test_no_match_defaults_to_toronto() {
        assert_eq!(
            tag_neighbourhood("Province announces new transit funding", ""),
            DEFAULT_NEIGHBOURHOOD
        );
    }

    #[test]
    fn test_first_entry_in_order_wins() {
        // both appear; North York is listed before Mississauga
        assert_eq!(
            tag_neighbourhood("Crash in Mississauga sends North York man to hospital", ""),
            "North York"
        );
    }

    #[test]
    fn test_neighbourhood_before_region() {
        assert_eq!(
            tag_neighbourhood("Water main break in Leaside", "Crews across the GTA respond"),
            "Leaside"
        );
    }

    #[test]
    fn test_description_is_searched() {
        assert_eq!(
            tag_neighbourhood("House fire overnight", "Firefighters were called to Parkdale"),
            "Parkdale"
        );
    }

    #[test]
    fn test_gazetteer_has_no_duplicates() {
        let mut names: Vec<_> = GAZETTEER.iter().map(|n| n.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), GAZETTEER.len());
    }
}
