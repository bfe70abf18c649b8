//! Tests for the inventory service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockSweetRepository;
use crate::domain::{ErrorCode, Role, StockLevel};
use crate::test_support::{fixture_clock, fixture_timestamp, identity, sample_sweet};

fn service(repo: MockSweetRepository) -> InventoryService<MockSweetRepository> {
    InventoryService::new(Arc::new(repo), fixture_clock())
}

fn fields(name: &str, category: &str, price: f64, quantity: i64) -> SweetFields {
    SweetFields {
        name: Some(name.to_owned()),
        category: Some(category.to_owned()),
        price: Some(price),
        quantity: Some(quantity),
    }
}

#[fixture]
fn shopper() -> Identity {
    identity(Role::User)
}

#[fixture]
fn admin() -> Identity {
    identity(Role::Admin)
}

#[rstest]
#[tokio::test]
async fn create_persists_and_stamps_both_timestamps(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_insert()
        .withf(|sweet| sweet.name() == "Fudge" && sweet.quantity().get() == 12)
        .times(1)
        .return_once(|_| Ok(()));

    let sweet = service(repo)
        .create(&shopper, fields("Fudge", "Toffee", 1.2, 12))
        .await
        .expect("create succeeds");

    assert_eq!(sweet.category(), "Toffee");
    assert_eq!(sweet.price().value(), 1.2);
    assert_eq!(sweet.created_at(), fixture_timestamp());
    assert_eq!(sweet.updated_at(), fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_rejects_missing_fields_without_touching_store(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_insert().times(0);

    let mut payload = fields("Fudge", "Toffee", 1.0, 1);
    payload.price = None;
    let error = service(repo)
        .create(&shopper, payload)
        .await
        .expect_err("missing price");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().contains("required"));
}

#[rstest]
#[tokio::test]
async fn create_maps_connection_error_to_service_unavailable(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_insert()
        .return_once(|_| Err(SweetRepositoryError::connection("refused")));

    let error = service(repo)
        .create(&shopper, fields("Fudge", "Toffee", 1.0, 1))
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn update_reports_missing_sweet(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_update().return_once(|_, _, _| Ok(None));

    let payload = SweetFields {
        price: Some(2.0),
        ..SweetFields::default()
    };
    let error = service(repo)
        .update(&shopper, SweetId::random(), payload)
        .await
        .expect_err("missing sweet");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Sweet not found");
}

#[rstest]
#[tokio::test]
async fn update_validates_before_writing(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_update().times(0);

    let payload = SweetFields {
        name: Some("Renamed".to_owned()),
        quantity: Some(-5),
        ..SweetFields::default()
    };
    let error = service(repo)
        .update(&shopper, SweetId::random(), payload)
        .await
        .expect_err("negative quantity");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_returns_written_record(shopper: Identity) {
    let existing = sample_sweet("Bar", "Chocolate", 2.5, 10);
    let id = existing.id();
    let mut repo = MockSweetRepository::new();
    repo.expect_update()
        .withf(move |sweet_id, _, now| *sweet_id == id && *now == fixture_timestamp())
        .times(1)
        .return_once(move |_, patch, now| Ok(Some(existing.patched(patch, now))));

    let payload = SweetFields {
        price: Some(3.25),
        ..SweetFields::default()
    };
    let updated = service(repo)
        .update(&shopper, id, payload)
        .await
        .expect("update succeeds");

    assert_eq!(updated.price().value(), 3.25);
    assert_eq!(updated.name(), "Bar");
}

#[rstest]
#[tokio::test]
async fn delete_is_forbidden_for_regular_users(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_delete().times(0);

    let error = service(repo)
        .delete(&shopper, SweetId::random())
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "Access denied. Admin privileges required.");
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_sweet(admin: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_delete().return_once(|_| Ok(false));

    let error = service(repo)
        .delete(&admin, SweetId::random())
        .await
        .expect_err("missing sweet");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(None)]
#[case(Some(0))]
#[case(Some(-1))]
#[tokio::test]
async fn purchase_requires_positive_quantity(shopper: Identity, #[case] quantity: Option<i64>) {
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock().times(0);

    let request = StockRequest {
        sweet_id: SweetId::random(),
        quantity,
    };
    let error = service(repo)
        .purchase(&shopper, request)
        .await
        .expect_err("invalid quantity");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn purchase_returns_updated_sweet_and_units(shopper: Identity) {
    let existing = sample_sweet("Lollipop", "Hard Candy", 0.5, 10);
    let id = existing.id();
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock()
        .withf(move |sweet_id, adjustment, _| {
            *sweet_id == id && matches!(adjustment, StockAdjustment::Decrement(units) if units.get() == 3)
        })
        .times(1)
        .return_once(move |_, adjustment, now| {
            let level = existing
                .quantity()
                .apply(adjustment)
                .expect("enough stock");
            Ok(StockOutcome::Adjusted(existing.with_quantity(level, now)))
        });

    let change = service(repo)
        .purchase(
            &shopper,
            StockRequest {
                sweet_id: id,
                quantity: Some(3),
            },
        )
        .await
        .expect("purchase succeeds");

    assert_eq!(change.units.get(), 3);
    assert_eq!(change.sweet.quantity().get(), 7);
}

#[rstest]
#[case(0, "Out of stock")]
#[case(2, "Insufficient stock. Only 2 items available")]
#[tokio::test]
async fn purchase_rejections_name_available_stock(
    shopper: Identity,
    #[case] available: i64,
    #[case] message: &str,
) {
    let level = StockLevel::new(available).expect("valid level");
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock()
        .return_once(move |_, _, _| Ok(StockOutcome::Rejected { available: level }));

    let error = service(repo)
        .purchase(
            &shopper,
            StockRequest {
                sweet_id: SweetId::random(),
                quantity: Some(5),
            },
        )
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), message);
}

#[rstest]
#[tokio::test]
async fn purchase_reports_missing_sweet(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock()
        .return_once(|_, _, _| Ok(StockOutcome::NotFound));

    let error = service(repo)
        .purchase(
            &shopper,
            StockRequest {
                sweet_id: SweetId::random(),
                quantity: Some(1),
            },
        )
        .await
        .expect_err("missing sweet");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn restock_checks_permission_before_payload(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock().times(0);

    let error = service(repo)
        .restock(
            &shopper,
            StockRequest {
                sweet_id: SweetId::random(),
                quantity: Some(-1),
            },
        )
        .await
        .expect_err("forbidden");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn restock_increments_for_admins(admin: Identity) {
    let existing = sample_sweet("Gummy Bears", "Gummies", 1.75, 0);
    let id = existing.id();
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock()
        .withf(|_, adjustment, _| matches!(adjustment, StockAdjustment::Increment(_)))
        .return_once(move |_, adjustment, now| {
            let level = existing.quantity().apply(adjustment).expect("within bound");
            Ok(StockOutcome::Adjusted(existing.with_quantity(level, now)))
        });

    let change = service(repo)
        .restock(
            &admin,
            StockRequest {
                sweet_id: id,
                quantity: Some(25),
            },
        )
        .await
        .expect("restock succeeds");

    assert_eq!(change.sweet.quantity().get(), 25);
    assert_eq!(change.units.get(), 25);
}

#[rstest]
#[tokio::test]
async fn restock_beyond_storage_bound_is_invalid(admin: Identity) {
    let level = StockLevel::new(i64::from(MAX_STOCK)).expect("valid level");
    let mut repo = MockSweetRepository::new();
    repo.expect_adjust_stock()
        .return_once(move |_, _, _| Ok(StockOutcome::Rejected { available: level }));

    let error = service(repo)
        .restock(
            &admin,
            StockRequest {
                sweet_id: SweetId::random(),
                quantity: Some(1),
            },
        )
        .await
        .expect_err("over bound");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn search_rejects_negative_price_bound(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_search().times(0);

    let request = SearchRequest {
        max_price: Some(-1.0),
        ..SearchRequest::default()
    };
    let error = service(repo)
        .search(&shopper, request)
        .await
        .expect_err("negative bound");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn search_forwards_normalised_filters(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_search()
        .withf(|filters| filters.category() == Some("chocolate") && filters.name().is_none())
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let request = SearchRequest {
        name: Some("   ".to_owned()),
        category: Some("Chocolate".to_owned()),
        ..SearchRequest::default()
    };
    let sweets = service(repo)
        .search(&shopper, request)
        .await
        .expect("search succeeds");

    assert!(sweets.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_maps_query_error_to_internal(shopper: Identity) {
    let mut repo = MockSweetRepository::new();
    repo.expect_list()
        .return_once(|| Err(SweetRepositoryError::query("syntax error")));

    let error = service(repo)
        .list(&shopper)
        .await
        .expect_err("query failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
