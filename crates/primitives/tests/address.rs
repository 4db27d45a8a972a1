use rangegraph_primitives::address::{column_index_to_letters, column_letters_to_index};
use rangegraph_primitives::{
    AddressError, BoundingBox, CellPosition, GridLimits, Range, UnboundedZone, Zone, MAX_INDEX,
};

#[test]
fn test_zone_from_str() {
    let zone: Zone = "b2:d4".parse().expect("zone");
    assert_eq!(zone, Zone::new(1, 1, 3, 3));
}

#[test]
fn test_column_letters_round_trip_at_boundaries() {
    for index in [0, 25, 26, 701, 702, 16_383] {
        let letters = column_index_to_letters(index);
        assert_eq!(column_letters_to_index(&letters).expect("letters"), index);
    }
    assert_eq!(column_index_to_letters(16_383), "XFD");
}

#[test]
fn test_whole_column_range_keeps_unbounded_form() {
    let limits = GridLimits::default();
    let zone = UnboundedZone::from_a1("Sheet1!C:C").expect("column");
    let range = Range::from_unbounded(4, zone, &limits);

    assert_eq!(range.zone, Zone::new(2, 0, 2, limits.max_rows - 1));
    assert_eq!(range.unbounded_zone, zone);
    assert_eq!(range.to_string(), "sheet 4!C:C");
}

#[test]
fn test_open_bottom_zone_without_limits() {
    let zone = UnboundedZone::from_a1("B2:C").expect("open bottom");
    assert_eq!(zone.to_zone(), Zone::new(1, 1, 2, MAX_INDEX));
}

#[test]
fn test_mixed_endpoints_are_rejected() {
    let err = UnboundedZone::from_a1("A:B3").expect_err("mixed endpoints");
    assert!(matches!(err, AddressError::InvalidRange(_)));
    assert_eq!(err.to_string(), "Invalid range: A:B3");
}

#[test]
fn test_position_display_and_bounding_box() {
    let position = CellPosition::new(2, 27, 4);
    assert_eq!(position.to_string(), "sheet 2!AB5");

    let range = Range::from_position(position);
    assert_eq!(range.bounding_box(), BoundingBox::new(2, Zone::cell(27, 4)));
    assert_eq!(range.bounding_box().to_string(), "sheet 2!AB5");
}

#[test]
fn test_range_serializes_open_edges_as_missing() {
    let range = Range::from_unbounded(
        1,
        UnboundedZone::full_rows(0, 0),
        &GridLimits::new(10, 10),
    );
    let json = serde_json::to_value(range).expect("json");
    assert_eq!(json["unbounded_zone"]["bottom"], 0);
    assert!(json["unbounded_zone"].get("right").is_none());
    assert_eq!(json["zone"]["right"], 9);
}
