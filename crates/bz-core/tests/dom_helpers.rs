//! DOM helpers over mock elements

use bz_core::dom::*;
use bz_testkit::{MockElement, MockOption, MockSelect};

fn values(options: &[MockOption]) -> Vec<String> {
    options.iter().map(SelectOption::value).collect()
}

#[test]
fn position_sums_offsets_and_skips_relative_ancestors() {
    let body = MockElement::new().at(5, 7);
    let container = MockElement::new()
        .at(100, 50)
        .positioned(Position::Relative)
        .inside(&body);
    let child = MockElement::new().at(10, 20).inside(&container);

    assert_eq!(find_pos_x(&child), 15);
    assert_eq!(find_pos_y(&child), 27);
}

#[test]
fn relative_element_skips_its_own_offset() {
    let body = MockElement::new().at(5, 7);
    let child = MockElement::new()
        .at(10, 20)
        .positioned(Position::Relative)
        .inside(&body);

    assert_eq!(find_pos_x(&child), 5);
    assert_eq!(find_pos_y(&child), 7);
}

#[test]
fn absolute_ancestors_are_counted() {
    let body = MockElement::new();
    let panel = MockElement::new()
        .at(300, 40)
        .positioned(Position::Absolute)
        .inside(&body);
    let field = MockElement::new().at(12, 8).inside(&panel);

    assert_eq!(find_pos_x(&field), 312);
    assert_eq!(find_pos_y(&field), 48);
}

#[test]
fn detached_element_falls_back_to_legacy_coordinates() {
    let legacy = MockElement::new().at(3, 3).legacy_xy(40, 60);
    assert_eq!(find_pos_x(&legacy), 40);
    assert_eq!(find_pos_y(&legacy), 60);

    let detached = MockElement::new().at(3, 3);
    assert_eq!(find_pos_x(&detached), 0);
    assert_eq!(find_pos_y(&detached), 0);
}

#[test]
fn full_size_is_the_larger_of_scroll_and_offset() {
    let overflowing = MockElement::new().sized(100, 100).scroll_size(250, 300);
    assert_eq!(full_width(&overflowing), 250);
    assert_eq!(full_height(&overflowing), 300);

    let fitting = MockElement::new().sized(100, 100).scroll_size(40, 50);
    assert_eq!(full_width(&fitting), 100);
    assert_eq!(full_height(&fitting), 100);
}

#[test]
fn overlay_sits_one_pixel_below_its_parent() {
    let body = MockElement::new();
    let parent = MockElement::new().at(10, 20).sized(200, 30).inside(&body);
    let menu = MockElement::new();

    let placement = overlay_below(&menu, &parent).unwrap();

    assert_eq!(
        placement,
        OverlayPlacement {
            left: 10,
            top: 51,
            z_index: 999
        }
    );
    assert_eq!(menu.style("position").as_deref(), Some("absolute"));
    assert_eq!(menu.style("left").as_deref(), Some("10px"));
    assert_eq!(menu.style("top").as_deref(), Some("51px"));
    assert_eq!(menu.style("z-index").as_deref(), Some("999"));
}

#[test]
fn toggle_class_flips_membership() {
    let row = MockElement::new().with_classes(&["bz_bug", "bz_closed"]);

    assert!(!toggle_class(&row, "bz_closed").unwrap());
    assert_eq!(row.classes(), vec!["bz_bug"]);

    assert!(toggle_class(&row, "bz_closed").unwrap());
    assert_eq!(row.classes(), vec!["bz_bug", "bz_closed"]);
}

#[test]
fn populate_replaces_existing_options() {
    let select = MockSelect::single(vec![MockOption::new("old", "Old")]);

    populate_from_pairs(&select, &[("1", "P1"), ("2", "P2"), ("3", "P3")]).unwrap();

    assert_eq!(select.values(), vec!["1", "2", "3"]);
    assert_eq!(select.texts(), vec!["P1", "P2", "P3"]);
}

#[test]
fn create_option_appends_and_returns_it() {
    let select = MockSelect::single(vec![MockOption::new("a", "A")]);

    let option = create_option(&select, "Bee", "b").unwrap();

    assert_eq!(option.value(), "b");
    assert_eq!(option.text(), "Bee");
    assert_eq!(select.values(), vec!["a", "b"]);
}

#[test]
fn clear_removes_everything() {
    let select = MockSelect::multiple(vec![
        MockOption::new("a", "A"),
        MockOption::new("b", "B"),
        MockOption::new("c", "C"),
    ]);

    clear_options(&select).unwrap();

    assert!(select.values().is_empty());
}

#[test]
fn selected_options_walks_from_first_selected() {
    let select = MockSelect::multiple(vec![
        MockOption::new("a", "A"),
        MockOption::new("b", "B").selected(),
        MockOption::new("c", "C"),
        MockOption::new("d", "D").selected(),
    ]);

    assert_eq!(values(&selected_options(&select)), vec!["b", "d"]);
}

#[test]
fn single_select_yields_at_most_one() {
    let select = MockSelect::single(vec![
        MockOption::new("a", "A"),
        MockOption::new("b", "B").selected(),
    ]);
    assert_eq!(values(&selected_options(&select)), vec!["b"]);

    let none = MockSelect::single(vec![MockOption::new("a", "A")]);
    assert!(selected_options(&none).is_empty());
}

#[test]
fn native_selected_options_are_preferred() {
    let select = MockSelect::multiple(vec![
        MockOption::new("a", "A").selected(),
        MockOption::new("b", "B"),
        MockOption::new("c", "C").selected(),
    ])
    .with_native_selected_options();

    assert_eq!(values(&selected_options(&select)), vec!["a", "c"]);
}

#[test]
fn preselected_options_follow_the_markup() {
    let options = || {
        vec![
            MockOption::new("a", "A").preselected(),
            MockOption::new("b", "B"),
            MockOption::new("c", "C").preselected(),
        ]
    };

    let multiple = MockSelect::multiple(options());
    assert_eq!(values(&preselected_options(&multiple)), vec!["a", "c"]);

    let single = MockSelect::single(options());
    assert_eq!(values(&preselected_options(&single)), vec!["a"]);

    // Selecting something else does not change what the markup said.
    let changed = options();
    changed[0].set_selected(false);
    changed[1].set_selected(true);
    let select = MockSelect::multiple(changed);
    assert_eq!(values(&preselected_options(&select)), vec!["a", "c"]);
}

#[test]
fn value_lookup_is_exact() {
    let select = MockSelect::single(vec![
        MockOption::new("NEW", "New"),
        MockOption::new("ASSIGNED", "Assigned").selected(),
    ]);

    assert!(value_selected(&select, "ASSIGNED"));
    assert!(!value_selected(&select, "assigned"));
    assert!(!value_selected(&select, "NEW"));

    assert_eq!(option_index(&select, "ASSIGNED"), Some(1));
    assert_eq!(option_index(&select, "RESOLVED"), None);
}
