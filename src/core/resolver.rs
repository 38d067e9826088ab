use crate::core::CatalogLookup;
use crate::domain::catalog::ProductMapping;
use crate::domain::model::{canonical_subtype, canonical_tag, Family, TILE_SUBTYPE};

/// Finds the board product for a family/sub-type/thickness/color combination.
///
/// Candidates are tried in catalog order and the first survivor wins; there is
/// no ranking by specificity. An empty `subtype` or `color` matches any
/// candidate. Panel requests (tiles) never compare thickness, since the form may
/// still carry a height from an earlier choice.
pub fn resolve<'a, C: CatalogLookup + ?Sized>(
    catalog: &'a C,
    family: Family,
    thickness_mm: u32,
    color: &str,
    subtype: &str,
) -> Option<&'a ProductMapping> {
    let subtype = canonical_subtype(subtype);
    let color = canonical_tag(color);
    let is_panel_request = subtype == TILE_SUBTYPE;

    let found = catalog.mappings().iter().find(|candidate| {
        if candidate.family != family {
            return false;
        }
        if !subtype.is_empty() {
            if let Some(candidate_subtype) = &candidate.subtype {
                if *candidate_subtype != subtype {
                    return false;
                }
            }
        }
        if !color.is_empty() {
            if let Some(candidate_color) = &candidate.color {
                if *candidate_color != color {
                    return false;
                }
            }
        }
        is_panel_request || candidate.thickness_mm == thickness_mm
    });

    match found {
        Some(mapping) => tracing::debug!(
            "Resolved {}/{}/{}mm/{} to catalog entry '{}'",
            family,
            subtype,
            thickness_mm,
            color,
            mapping.id
        ),
        None => tracing::debug!(
            "No catalog entry for {}/{}/{}mm/{}",
            family,
            subtype,
            thickness_mm,
            color
        ),
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{AccessoryTable, Catalog};
    use std::collections::BTreeMap;

    fn mapping(
        id: &str,
        family: Family,
        subtype: Option<&str>,
        color: Option<&str>,
        thickness_mm: u32,
    ) -> ProductMapping {
        ProductMapping {
            id: id.to_string(),
            family,
            subtype: subtype.map(str::to_string),
            color: color.map(str::to_string),
            label: id.to_string(),
            width_mm: if subtype == Some(TILE_SUBTYPE) { 0 } else { 140 },
            thickness_mm,
            product_id: 1,
            stock_lengths: BTreeMap::new(),
            product_length_mm: None,
        }
    }

    fn fixture() -> Catalog {
        Catalog::new(
            vec![
                mapping("bangkirai_21", Family::Wood, Some("bangkirai"), None, 21),
                mapping("bangkirai_25", Family::Wood, Some("bangkirai"), None, 25),
                mapping("douglas_28", Family::Wood, Some("douglas"), None, 28),
                mapping("bamboo_espresso", Family::Bamboo, Some("plank"), Some("espresso"), 18),
                mapping("bamboo_ebony", Family::Bamboo, Some("plank"), Some("ebony"), 18),
                mapping("tile_espresso", Family::Bamboo, Some("tile"), Some("espresso"), 0),
                mapping("tile_ebony", Family::Bamboo, Some("tile"), Some("ebony"), 0),
            ],
            AccessoryTable::default(),
        )
    }

    #[test]
    fn test_empty_catalog_is_not_found() {
        let catalog = Catalog::default();
        assert!(resolve(&catalog, Family::Wood, 21, "", "bangkirai").is_none());
    }

    #[test]
    fn test_family_mismatch_is_not_found() {
        let catalog = fixture();
        assert!(resolve(&catalog, Family::Composite, 23, "", "").is_none());
    }

    #[test]
    fn test_thickness_selects_entry() {
        let catalog = fixture();
        let found = resolve(&catalog, Family::Wood, 25, "", "bangkirai").unwrap();
        assert_eq!(found.id, "bangkirai_25");
        assert!(resolve(&catalog, Family::Wood, 27, "", "bangkirai").is_none());
    }

    #[test]
    fn test_empty_subtype_takes_first_in_catalog_order() {
        let catalog = fixture();
        let found = resolve(&catalog, Family::Wood, 28, "", "").unwrap();
        assert_eq!(found.id, "douglas_28");
    }

    #[test]
    fn test_color_filters_candidates() {
        let catalog = fixture();
        let found = resolve(&catalog, Family::Bamboo, 18, "Ebony", "plank").unwrap();
        assert_eq!(found.id, "bamboo_ebony");

        let any_color = resolve(&catalog, Family::Bamboo, 18, "", "plank").unwrap();
        assert_eq!(any_color.id, "bamboo_espresso");
    }

    #[test]
    fn test_panel_request_ignores_thickness() {
        let catalog = fixture();
        let stale_height = resolve(&catalog, Family::Bamboo, 18, "ebony", "tegel").unwrap();
        assert_eq!(stale_height.id, "tile_ebony");

        let zero_height = resolve(&catalog, Family::Bamboo, 0, "espresso", "tile").unwrap();
        assert_eq!(zero_height.id, "tile_espresso");
    }
}
