//! Behaviour tests for restaurants, menu items and ratings over the
//! in-memory directory.

mod support;

use std::cell::RefCell;

use futures::executor::block_on;
use menu_directory::domain::ports::{ContentCommands, ContentQueries};
use menu_directory::domain::{
    AuditAction, AuditOutcome, ErrorCode, MenuItem, MenuItemDraft, MenuItemEdit, Restaurant,
    Role, UserId,
};
use menu_directory::test_support::DirectoryHarness;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};

use support::{actor, harness, register, root, user};

struct Kitchen {
    harness: DirectoryHarness,
    alice: UserId,
    restaurant: Restaurant,
    last_error: RefCell<Option<ErrorCode>>,
}

#[fixture]
fn kitchen() -> Kitchen {
    let harness = harness();
    let alice = register(&harness, "alice");
    let restaurant = block_on(
        harness
            .content
            .create_restaurant(&actor(&harness, alice), "Joe's"),
    )
    .expect("restaurant created");
    Kitchen {
        harness,
        alice,
        restaurant,
        last_error: RefCell::new(None),
    }
}

fn add_soup(kitchen: &Kitchen) -> MenuItem {
    block_on(kitchen.harness.content.create_menu_item(
        &actor(&kitchen.harness, kitchen.alice),
        kitchen.restaurant.id,
        MenuItemDraft {
            name: "<b>Soup</b>".to_owned(),
            description: Some("Hot & spicy, 100% tomato!".to_owned()),
            price: "7.5".to_owned(),
            course: Some("Starter".to_owned()),
        },
    ))
    .expect("menu item created")
}

#[given("alice has created Joe's")]
fn alice_has_created_joes(kitchen: &Kitchen) {
    assert_eq!(kitchen.restaurant.owner_id, kitchen.alice);
}

#[then("the name keeps only letters and digits and alice becomes an owner")]
fn name_is_normalized_and_creator_promoted(kitchen: &Kitchen) {
    assert_eq!(kitchen.restaurant.name, "Joes");
    assert_eq!(user(&kitchen.harness, kitchen.alice).role(), Role::Owner);
}

#[when("bob tries to rename Joe's")]
fn bob_tries_to_rename(kitchen: &Kitchen) {
    let bob = register(&kitchen.harness, "bob");
    let result = block_on(kitchen.harness.content.edit_restaurant(
        &actor(&kitchen.harness, bob),
        kitchen.restaurant.id,
        Some("Bobs".to_owned()),
    ));
    *kitchen.last_error.borrow_mut() = result.err().map(|error| error.code());
}

#[then("the attempt is forbidden, audited and leaves the name unchanged")]
fn attempt_is_forbidden_and_audited(kitchen: &Kitchen) {
    assert_eq!(*kitchen.last_error.borrow(), Some(ErrorCode::Forbidden));
    let detail = block_on(
        kitchen
            .harness
            .content
            .get_restaurant(kitchen.restaurant.id),
    )
    .expect("restaurant still exists");
    assert_eq!(detail.restaurant.name, "Joes");
    let denied = kitchen
        .harness
        .directory
        .audit_events()
        .into_iter()
        .filter(|event| {
            event.action == AuditAction::EditRestaurant && event.outcome == AuditOutcome::Denied
        })
        .count();
    assert_eq!(denied, 1);
}

#[rstest]
fn creating_a_restaurant_normalizes_name_and_promotes_owner(kitchen: Kitchen) {
    alice_has_created_joes(&kitchen);
    name_is_normalized_and_creator_promoted(&kitchen);
}

#[rstest]
fn other_users_cannot_edit(kitchen: Kitchen) {
    alice_has_created_joes(&kitchen);
    bob_tries_to_rename(&kitchen);
    attempt_is_forbidden_and_audited(&kitchen);
}

#[rstest]
#[case("!!!")]
#[case("   ")]
fn names_without_letters_or_digits_are_rejected(#[case] name: &str) {
    let harness = harness();
    let alice = register(&harness, "alice");
    let error = block_on(
        harness
            .content
            .create_restaurant(&actor(&harness, alice), name),
    )
    .err()
    .expect("name rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(user(&harness, alice).role(), Role::Public);
}

#[rstest]
fn admins_stay_admins_when_creating_restaurants() {
    let harness = harness();
    let restaurant =
        block_on(harness.content.create_restaurant(&root(&harness), "Root Diner")).expect("created");
    assert_eq!(restaurant.name, "RootDiner");
    assert_eq!(user(&harness, harness.root_admin).role(), Role::Admin);
}

#[rstest]
fn renaming_escapes_markup_and_blank_names_change_nothing(kitchen: Kitchen) {
    let owner = actor(&kitchen.harness, kitchen.alice);
    let renamed = block_on(kitchen.harness.content.edit_restaurant(
        &owner,
        kitchen.restaurant.id,
        Some("<i>Joe</i> & Co".to_owned()),
    ))
    .expect("renamed");
    assert!(renamed.changed);
    assert_eq!(renamed.value.name, "&lt;i&gt;Joe&lt;/i&gt; &amp; Co");

    let untouched = block_on(kitchen.harness.content.edit_restaurant(
        &owner,
        kitchen.restaurant.id,
        Some("  ".to_owned()),
    ))
    .expect("no-op edit succeeds");
    assert!(!untouched.changed);
    assert_eq!(untouched.value.name, renamed.value.name);
}

#[rstest]
fn menu_items_are_sanitized_and_priced(kitchen: Kitchen) {
    let item = add_soup(&kitchen);
    assert_eq!(item.name, "&lt;b&gt;Soup&lt;/b&gt;");
    assert_eq!(item.description, "Hotspicy100tomato");
    assert_eq!(item.price, "$7.50");
    assert_eq!(item.course, "Starter");

    let menu = block_on(kitchen.harness.content.list_menu(kitchen.restaurant.id))
        .expect("menu listed");
    assert_eq!(menu.items, vec![item]);
}

#[rstest]
#[case("free")]
#[case("-1")]
#[case("7.999")]
#[case("$$7")]
fn malformed_prices_are_rejected(kitchen: Kitchen, #[case] price: &str) {
    let error = block_on(kitchen.harness.content.create_menu_item(
        &actor(&kitchen.harness, kitchen.alice),
        kitchen.restaurant.id,
        MenuItemDraft {
            name: "Soup".to_owned(),
            description: None,
            price: price.to_owned(),
            course: None,
        },
    ))
    .err()
    .expect("price rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn editing_a_menu_item_keeps_blank_fields(kitchen: Kitchen) {
    let item = add_soup(&kitchen);
    let edited = block_on(kitchen.harness.content.edit_menu_item(
        &actor(&kitchen.harness, kitchen.alice),
        kitchen.restaurant.id,
        item.id,
        MenuItemEdit {
            name: Some(String::new()),
            description: None,
            price: Some("$9".to_owned()),
            course: Some(String::new()),
        },
    ))
    .expect("edited");
    assert!(edited.changed);
    assert_eq!(edited.value.name, item.name);
    assert_eq!(edited.value.course, item.course);
    assert_eq!(edited.value.price, "$9.00");
}

#[rstest]
fn menu_items_are_scoped_to_their_restaurant(kitchen: Kitchen) {
    let item = add_soup(&kitchen);
    let other = block_on(kitchen.harness.content.create_restaurant(
        &actor(&kitchen.harness, kitchen.alice),
        "Second",
    ))
    .expect("second restaurant");

    let error = block_on(kitchen.harness.content.get_menu_item(other.id, item.id))
        .err()
        .expect("item not under the other restaurant");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
fn admins_may_edit_any_menu(kitchen: Kitchen) {
    let item = add_soup(&kitchen);
    block_on(kitchen.harness.content.delete_menu_item(
        &root(&kitchen.harness),
        kitchen.restaurant.id,
        item.id,
    ))
    .expect("admin deletes item");
    let menu = block_on(kitchen.harness.content.list_menu(kitchen.restaurant.id))
        .expect("menu listed");
    assert!(menu.items.is_empty());
}

#[rstest]
fn deleting_a_restaurant_removes_its_menu_and_ratings(kitchen: Kitchen) {
    add_soup(&kitchen);
    let carol = register(&kitchen.harness, "carol");
    block_on(kitchen.harness.content.rate_restaurant(
        &actor(&kitchen.harness, carol),
        kitchen.restaurant.id,
        4,
    ))
    .expect("rated");

    block_on(kitchen.harness.content.delete_restaurant(
        &actor(&kitchen.harness, kitchen.alice),
        kitchen.restaurant.id,
    ))
    .expect("deleted");

    let error = block_on(kitchen.harness.content.list_menu(kitchen.restaurant.id))
        .err()
        .expect("menu gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(kitchen.harness.directory.rating_rows(), 0);
}

#[rstest]
fn rerating_updates_the_single_rating_row(kitchen: Kitchen) {
    let carol = actor(&kitchen.harness, register(&kitchen.harness, "carol"));
    for score in [3, 5] {
        block_on(
            kitchen
                .harness
                .content
                .rate_restaurant(&carol, kitchen.restaurant.id, score),
        )
        .expect("rated");
    }

    assert_eq!(kitchen.harness.directory.rating_rows(), 1);
    let detail = block_on(
        kitchen
            .harness
            .content
            .get_restaurant(kitchen.restaurant.id),
    )
    .expect("detail");
    assert_eq!(detail.rating.count, 1);
    assert_eq!(detail.rating.average, Some(5.0));
}

#[rstest]
fn owners_cannot_rate_their_own_restaurant(kitchen: Kitchen) {
    let owner = actor(&kitchen.harness, kitchen.alice);
    let error = block_on(
        kitchen
            .harness
            .content
            .rate_restaurant(&owner, kitchen.restaurant.id, 5),
    )
    .err()
    .expect("owner refused");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(kitchen.harness.directory.rating_rows(), 0);
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(-3)]
fn scores_outside_one_to_five_are_rejected(kitchen: Kitchen, #[case] score: i64) {
    let carol = actor(&kitchen.harness, register(&kitchen.harness, "carol"));
    let error = block_on(
        kitchen
            .harness
            .content
            .rate_restaurant(&carol, kitchen.restaurant.id, score),
    )
    .err()
    .expect("score rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn restaurants_are_listed_by_name() {
    let harness = harness();
    let alice = register(&harness, "alice");
    for name in ["Zeta", "Alpha", "Mu"] {
        block_on(
            harness
                .content
                .create_restaurant(&actor(&harness, alice), name),
        )
        .expect("created");
    }
    let names = block_on(harness.content.list_restaurants())
        .expect("listed")
        .into_iter()
        .map(|restaurant| restaurant.name)
        .collect::<Vec<_>>();
    assert_eq!(names, ["Alpha", "Mu", "Zeta"]);
}
