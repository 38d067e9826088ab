use decking_calc::config::catalog_config::DEFAULT_CATALOG;
use decking_calc::domain::catalog::{OilAccessory, OilContainer, SimpleAccessory};
use decking_calc::domain::model::Family;
use decking_calc::{
    CalcError, Catalog, CatalogConfig, Estimate, EstimateOutcome, Estimator, LineKind,
    QuoteRequest,
};

const BOLTS_ID: u64 = 9100;
const OIL_LARGE_ID: u64 = 9201;
const OIL_SMALL_ID: u64 = 9200;

fn estimator() -> Estimator<Catalog> {
    Estimator::new(Catalog::builtin().unwrap())
}

/// The built-in catalog with bolts and bamboo oil linked to shop products.
fn stocked_estimator() -> Estimator<Catalog> {
    let mut config = CatalogConfig::from_toml_str(DEFAULT_CATALOG).unwrap();
    config.accessories.bolts = Some(SimpleAccessory {
        label: "Carriage bolts".to_string(),
        product_id: BOLTS_ID,
        applicable: vec![],
    });
    config.accessories.oil = Some(OilAccessory {
        label: "Bamboo oil".to_string(),
        applicable: vec![Family::Bamboo],
        large: OilContainer {
            product_id: OIL_LARGE_ID,
            size: "2.5 L".to_string(),
        },
        small: OilContainer {
            product_id: OIL_SMALL_ID,
            size: "0.75 L".to_string(),
        },
    });
    Estimator::new(Catalog::try_from(config).unwrap())
}

/// `(product_id, variant_id, qty)` per line, in output order.
fn order(estimate: &Estimate) -> Vec<(u64, Option<u64>, u32)> {
    estimate
        .lines
        .iter()
        .map(|line| (line.product_id, line.variant_id, line.qty))
        .collect()
}

#[test]
fn test_free_standing_bangkirai_deck() {
    let request = QuoteRequest::new("wood", 4.0, 3.0)
        .with_subtype("bangkirai")
        .with_thickness(21);
    let estimate = estimator().estimate(&request).unwrap();

    assert_eq!(estimate.surface_m2, 12.0);
    assert_eq!(
        order(&estimate),
        vec![
            (1029, Some(4094), 20), // 20 rows of 4300 mm
            (1064, None, 9),        // hardwood beams
            (709, Some(713), 2),    // 360 screws
        ]
    );
    assert_eq!(estimate.lines[0].kind, LineKind::Variant);
    assert!(estimate.lines[0].summary.contains("rows: 20"));
    assert!(estimate.lines[2].summary.contains("5.5x40"));
}

fn staked_bangkirai(stake_size: &str) -> QuoteRequest {
    QuoteRequest::new("hout", 4.0, 3.0)
        .with_subtype("Bangkirai")
        .with_thickness(21)
        .staked(stake_size)
}

#[test]
fn test_staked_bangkirai_deck_adds_stakes() {
    let estimate = estimator().estimate(&staked_bangkirai("50x50")).unwrap();

    // bolts have no shop product in the built-in catalog
    assert_eq!(
        order(&estimate),
        vec![
            (1029, Some(4094), 20),
            (1064, None, 9),
            (3597, None, 36), // 9 beams x 4 stakes
            (709, Some(713), 2),
        ]
    );
    assert!(estimate.lines[1].summary.contains("garden"));
}

#[test]
fn test_staked_deck_with_bolts_in_catalog() {
    let estimate = stocked_estimator()
        .estimate(&staked_bangkirai("50x50"))
        .unwrap();

    assert_eq!(estimate.lines.len(), 5);
    assert_eq!(
        order(&estimate)[4],
        (BOLTS_ID, None, 2) // 36 bolts, 25 per box
    );
    assert!(estimate.lines[4].summary.contains("110mm"));
}

#[test]
fn test_only_exact_50x50_tag_orders_large_stakes() {
    let estimate = stocked_estimator()
        .estimate(&staked_bangkirai("150x150"))
        .unwrap();

    let stakes = &estimate.lines[2];
    assert_eq!((stakes.product_id, stakes.qty), (1068, 36));
    // the bolt still measures the stake as 50 mm
    assert!(estimate.lines[4].summary.contains("110mm [stake 50+beam 45+15]"));

    let small = stocked_estimator()
        .estimate(&staked_bangkirai("40x40"))
        .unwrap();
    assert_eq!(small.lines[2].product_id, 1068);
    assert!(small.lines[4].summary.contains("100mm"));
}

#[test]
fn test_douglas_uses_douglas_beams() {
    let request = QuoteRequest::new("wood", 4.0, 3.0)
        .with_subtype("douglas")
        .with_thickness(28);
    let estimate = estimator().estimate(&request).unwrap();

    assert_eq!(estimate.lines[0].product_id, 955);
    let beams = estimate.lines.iter().find(|l| l.product_id == 964).unwrap();
    assert_eq!(beams.qty, 9);
    // 28 mm has no own gauge, the default one is used
    assert!(estimate
        .lines
        .iter()
        .any(|l| l.product_id == 709 && l.variant_id == Some(711)));
}

#[test]
fn test_composite_deck() {
    let request = QuoteRequest::new("composiet", 3.0, 2.0)
        .with_thickness(23)
        .with_color("Teak");
    let estimate = estimator().estimate(&request).unwrap();

    assert_eq!(
        order(&estimate),
        vec![
            (4208, Some(4210), 14), // 14 rows of 4000 mm
            (2857, None, 7),        // composite beams
            (2859, None, 1),        // 98 clips
            (2858, None, 7),        // one start clip per beam
        ]
    );
    assert!(estimate.lines[2].summary.contains("14 rows x 7 beams = 98 pcs"));
}

#[test]
fn test_bamboo_plank_deck() {
    let request = QuoteRequest::new("bamboe", 5.0, 3.0)
        .with_subtype("vlonderplank")
        .with_thickness(18)
        .with_color("espresso");
    let estimate = estimator().estimate(&request).unwrap();

    assert_eq!(estimate.surface_m2, 15.0);
    assert_eq!(
        order(&estimate),
        vec![
            (2674, None, 57),
            (4206, None, 11),
            (2859, None, 3), // 21 rows x 11 beams = 231 clips
            (2858, None, 11),
        ]
    );
    assert!(estimate.lines[0].summary.contains("+3% saw waste"));

    let stocked = stocked_estimator().estimate(&request).unwrap();
    // one small oil container per 15 m²
    assert_eq!(order(&stocked)[4], (OIL_SMALL_ID, None, 1));
}

#[test]
fn test_bamboo_oil_prefers_large_containers() {
    let request = QuoteRequest::new("bamboo", 10.0, 5.0)
        .with_subtype("plank")
        .with_thickness(18)
        .with_color("espresso");
    let estimate = stocked_estimator().estimate(&request).unwrap();

    let oil: Vec<_> = estimate
        .lines
        .iter()
        .filter(|l| l.product_id == OIL_LARGE_ID || l.product_id == OIL_SMALL_ID)
        .map(|l| (l.product_id, l.qty))
        .collect();
    // 50 m² needs 4 small containers: one large plus one small
    assert_eq!(oil, vec![(OIL_LARGE_ID, 1), (OIL_SMALL_ID, 1)]);
}

#[test]
fn test_herringbone_deck() {
    let request = QuoteRequest::new("bamboo", 5.0, 2.0)
        .with_subtype("visgraat")
        .with_thickness(18)
        .with_color("espresso");
    let estimate = estimator().estimate(&request).unwrap();

    assert_eq!(
        order(&estimate),
        vec![
            (3790, None, 108),
            (4206, None, 11),
            (2859, None, 5), // 108 boards x 4 clips
        ]
    );
    assert!(!estimate.lines[0].summary.contains("rows:"));

    let stocked = stocked_estimator().estimate(&request).unwrap();
    assert_eq!(order(&stocked).last(), Some(&(OIL_SMALL_ID, None, 1)));
}

#[test]
fn test_tiles_are_sold_per_pack_without_accessories() {
    let request = QuoteRequest::new("bamboo", 1.8, 1.2)
        .with_subtype("tegel")
        .with_thickness(18) // ignored for tiles
        .with_color("ebony");
    let estimate = estimator().estimate(&request).unwrap();

    assert_eq!(estimate.surface_m2, 2.16);
    assert_eq!(order(&estimate), vec![(4224, None, 4)]);
    assert!(estimate.lines[0].summary.contains("24 tiles"));
}

#[test]
fn test_surface_is_rounded_product_of_dimensions() {
    let estimator = estimator();
    for (length, width) in [(4.5, 2.25), (3.33, 3.33), (7.0, 0.9)] {
        let request = QuoteRequest::new("composite", length, width)
            .with_thickness(23)
            .with_color("ipe");
        let estimate = estimator.estimate(&request).unwrap();
        let expected = ((length * width) * 100.0_f64).round() / 100.0;
        assert_eq!(estimate.surface_m2, expected);
        assert!(estimate.lines.iter().all(|l| l.qty > 0));
    }
}

#[test]
fn test_estimates_are_repeatable() {
    let estimator = estimator();
    let request = QuoteRequest::new("wood", 12.0, 3.0)
        .with_subtype("bangkirai")
        .with_thickness(25)
        .staked("40x40");

    let first = estimator.estimate(&request).unwrap();
    let second = estimator.estimate(&request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rejected_requests() {
    let estimator = estimator();

    let missing_size = QuoteRequest::new("wood", 0.0, 3.0).with_thickness(21);
    assert!(matches!(
        estimator.estimate(&missing_size),
        Err(CalcError::InvalidInput { .. })
    ));

    let no_family = QuoteRequest::new("", 4.0, 3.0);
    assert!(matches!(
        estimator.estimate(&no_family),
        Err(CalcError::InvalidInput { .. })
    ));

    let odd_thickness = QuoteRequest::new("wood", 4.0, 3.0).with_thickness(99);
    assert!(matches!(
        estimator.estimate(&odd_thickness),
        Err(CalcError::UnlinkedCombination { .. })
    ));

    let unknown_color = QuoteRequest::new("composite", 4.0, 3.0)
        .with_thickness(23)
        .with_color("purple");
    assert!(matches!(
        estimator.estimate(&unknown_color),
        Err(CalcError::UnlinkedCombination { .. })
    ));
}

#[test]
fn test_deck_too_large_to_count_is_rejected() {
    let request = QuoteRequest::new("composiet", 100_000.0, 100_000.0)
        .with_thickness(23)
        .with_color("teak")
        .staked("40x40");
    let err = estimator().estimate(&request).unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput { .. }));
    assert_eq!(
        err.user_friendly_message(),
        "Invalid input. Please enter a length and width."
    );
}

#[test]
fn test_outcome_json_shapes() {
    let estimator = estimator();

    let ok = EstimateOutcome::from(
        estimator.estimate(&QuoteRequest::new("composite", 3.0, 2.0).with_thickness(23)),
    );
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["surface_m2"], 6.0);
    assert_eq!(json["lines"][0]["kind"], "variant");
    assert!(json["lines"][1].get("variant_id").is_none());

    let rejected = EstimateOutcome::from(estimator.estimate(&QuoteRequest::new("wood", -1.0, 3.0)));
    assert_eq!(
        serde_json::to_value(&rejected).unwrap(),
        serde_json::json!({ "error": "Invalid input. Please enter a length and width." })
    );
}
