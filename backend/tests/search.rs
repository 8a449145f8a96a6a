//! Search over restaurant and menu item names.

mod support;

use futures::executor::block_on;
use menu_directory::domain::ports::{ContentCommands, DirectorySearch};
use menu_directory::domain::{ErrorCode, MenuItemDraft};
use menu_directory::test_support::DirectoryHarness;
use rstest::{fixture, rstest};

use support::{actor, harness, register};

#[fixture]
fn stocked() -> DirectoryHarness {
    let harness = harness();
    let alice = actor(&harness, register(&harness, "alice"));
    let bistro = block_on(harness.content.create_restaurant(&alice, "Joe's Bistro"))
        .expect("created");
    block_on(harness.content.create_restaurant(&alice, "Noodle Bar")).expect("created");
    block_on(harness.content.create_menu_item(
        &alice,
        bistro.id,
        MenuItemDraft {
            name: "Tomato Soup".to_owned(),
            price: "4".to_owned(),
            ..MenuItemDraft::default()
        },
    ))
    .expect("item created");
    harness
}

#[rstest]
#[case("bistro")]
#[case("BISTRO")]
#[case("joe's")]
fn restaurant_names_match_case_insensitively(stocked: DirectoryHarness, #[case] query: &str) {
    let results = block_on(stocked.search.search(query)).expect("searched");
    let names = results
        .restaurants
        .iter()
        .map(|restaurant| restaurant.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["JoesBistro"]);
    assert!(results.menu_items.is_empty());
}

#[rstest]
fn menu_items_are_searched_alongside_restaurants(stocked: DirectoryHarness) {
    let results = block_on(stocked.search.search("soup")).expect("searched");
    assert!(results.restaurants.is_empty());
    let items = results
        .menu_items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(items, ["Tomato Soup"]);
}

#[rstest]
fn unmatched_queries_return_empty_results(stocked: DirectoryHarness) {
    let results = block_on(stocked.search.search("sushi")).expect("searched");
    assert!(results.restaurants.is_empty());
    assert!(results.menu_items.is_empty());
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("%_';--")]
fn queries_without_letters_or_digits_are_rejected(stocked: DirectoryHarness, #[case] query: &str) {
    let error = block_on(stocked.search.search(query))
        .err()
        .expect("blank query rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn escaped_entities_are_not_searchable_text() {
    let harness = harness();
    let alice = actor(&harness, register(&harness, "alice"));
    let chippy = block_on(harness.content.create_restaurant(&alice, "Chippy")).expect("created");
    block_on(harness.content.create_menu_item(
        &alice,
        chippy.id,
        MenuItemDraft {
            name: "Fish & Chips".to_owned(),
            price: "6".to_owned(),
            ..MenuItemDraft::default()
        },
    ))
    .expect("item created");

    let entity = block_on(harness.search.search("amp")).expect("searched");
    assert!(entity.menu_items.is_empty());

    for query in ["fish", "fish & chips"] {
        let found = block_on(harness.search.search(query)).expect("searched");
        let names = found
            .menu_items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Fish &amp; Chips"], "query {query:?}");
    }
}

#[rstest]
fn matching_restaurants_are_ordered_by_name() {
    let harness = harness();
    let alice = actor(&harness, register(&harness, "alice"));
    for name in ["Soup Zone", "Abbey Soup", "Mega Soup"] {
        block_on(harness.content.create_restaurant(&alice, name)).expect("created");
    }
    let results = block_on(harness.search.search("soup")).expect("searched");
    let names = results
        .restaurants
        .iter()
        .map(|restaurant| restaurant.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["AbbeySoup", "MegaSoup", "SoupZone"]);
}
