//! Create, read, update and delete scenarios for `/books`

use super::{FnScenario, Scenario, ScenarioContext, ScenarioFuture, ScenarioGroup};
use crate::assertions::{
    ensure, expect_contract, expect_contract_as, expect_entity, expect_eq, expect_error, expect_message,
    expect_message_contains, expect_status,
};
use crate::contract::names;
use crate::error::SuiteResult;
use crate::fixtures::{self, messages};
use crate::models::{Book, BookUpdate, DeleteResponse};

pub fn scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(FnScenario::new(
            "create book and fetch it back",
            ScenarioGroup::Create,
            create_round_trip,
        )),
        Box::new(FnScenario::new(
            "create book with only required fields",
            ScenarioGroup::Create,
            create_minimal,
        )),
        Box::new(FnScenario::new(
            "create book with missing fields",
            ScenarioGroup::Create,
            create_missing_fields,
        )),
        Box::new(FnScenario::new(
            "create book with invalid isbn",
            ScenarioGroup::Create,
            create_invalid_isbn,
        )),
        Box::new(FnScenario::new(
            "create book without token",
            ScenarioGroup::Create,
            create_without_token,
        )),
        Box::new(FnScenario::new(
            "fetch nonexistent book",
            ScenarioGroup::Read,
            fetch_nonexistent,
        )),
        Box::new(FnScenario::new(
            "list books includes created book",
            ScenarioGroup::Read,
            list_includes_created,
        )),
        Box::new(FnScenario::new(
            "update availability only",
            ScenarioGroup::Update,
            update_availability,
        )),
        Box::new(FnScenario::new(
            "update multiple fields",
            ScenarioGroup::Update,
            update_multiple_fields,
        )),
        Box::new(FnScenario::new(
            "update nonexistent book",
            ScenarioGroup::Update,
            update_nonexistent,
        )),
        Box::new(FnScenario::new(
            "update without token",
            ScenarioGroup::Update,
            update_without_token,
        )),
        Box::new(FnScenario::new(
            "delete book then fetch it",
            ScenarioGroup::Delete,
            delete_then_fetch,
        )),
        Box::new(FnScenario::new(
            "delete nonexistent book",
            ScenarioGroup::Delete,
            delete_nonexistent,
        )),
        Box::new(FnScenario::new(
            "delete without token",
            ScenarioGroup::Delete,
            delete_without_token,
        )),
    ]
}

/// Fetch `book` and check the server still reports exactly it
async fn expect_stored(ctx: &ScenarioContext, book: &Book, what: &str) -> SuiteResult<()> {
    let fetched = ctx.books().get(&book.id).await?;
    expect_status(&fetched, 200, what)?;
    expect_contract(&fetched, names::BOOK_ENVELOPE, what)?;
    let stored = expect_entity(&fetched, what)?;
    expect_eq(&stored, book, what)
}

fn create_round_trip(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let payload = fixtures::new_book();
        let token = ctx.token().await?;
        let created = ctx.books().create(&payload, Some(&token)).await?;
        ctx.track_created(&created);

        expect_status(&created, 201, "create book")?;
        expect_contract(&created, names::BOOK_ENVELOPE, "create book")?;
        expect_message(&created, messages::BOOK_CREATED, "create book")?;
        let book = expect_entity(&created, "create book")?;
        ensure(
            book.matches(&payload),
            format!("create book: {:?} does not reflect {:?}", book, payload),
        )?;

        expect_stored(ctx, &book, "fetch created book").await
    })
}

fn create_minimal(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let payload = fixtures::minimal_book();
        let book = ctx.create_book(&payload).await?;
        ensure(
            book.matches(&payload),
            format!("create minimal book: {:?} does not reflect {:?}", book, payload),
        )?;
        expect_stored(ctx, &book, "fetch minimal book").await
    })
}

fn create_missing_fields(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let token = ctx.token().await?;

        for (missing, payload) in fixtures::missing_field_payloads() {
            let outcome = ctx.books().create_raw(payload, Some(&token)).await?;
            ctx.track_created(&outcome);
            let what = format!("create book without {}", missing);

            expect_error(&outcome, 400, messages::BAD_REQUEST, messages::MISSING_FIELDS, &what)?;
        }
        Ok(())
    })
}

fn create_invalid_isbn(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let token = ctx.token().await?;

        for isbn in fixtures::invalid_isbns() {
            let outcome = ctx
                .books()
                .create(&fixtures::book_with_isbn(isbn), Some(&token))
                .await?;
            ctx.track_created(&outcome);
            let what = format!("create book with isbn {:?}", isbn);

            expect_error(&outcome, 400, messages::BAD_REQUEST, messages::INVALID_ISBN, &what)?;
        }
        Ok(())
    })
}

fn create_without_token(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let outcome = ctx.books().create(&fixtures::new_book(), None).await?;
        ctx.track_created(&outcome);

        expect_error(
            &outcome,
            401,
            messages::NO_TOKEN_ERROR,
            messages::NO_TOKEN_MESSAGE,
            "create book without token",
        )
    })
}

fn fetch_nonexistent(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let id = fixtures::nonexistent_book_id();
        let outcome = ctx.books().get(&id).await?;
        let what = "fetch nonexistent book";

        expect_error(
            &outcome,
            404,
            messages::NOT_FOUND,
            &messages::book_not_found(id.as_str()),
            what,
        )
    })
}

fn list_includes_created(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let book = ctx.create_book(&fixtures::new_book()).await?;
        let outcome = ctx.books().list().await?;
        let what = "list books";

        expect_status(&outcome, 200, what)?;
        expect_contract(&outcome, names::BOOK_LIST_ENVELOPE, what)?;
        let books = expect_entity(&outcome, what)?;
        ensure(
            books.iter().any(|listed| listed == &book),
            format!("{}: book {} missing from {} listed", what, book.id, books.len()),
        )
    })
}

/// Apply `update` to a fresh book and check exactly those fields changed
async fn check_partial_update(ctx: &mut ScenarioContext, update: BookUpdate, what: &str) -> SuiteResult<()> {
    let book = ctx.create_book(&fixtures::new_book()).await?;
    let token = ctx.token().await?;

    let outcome = ctx.books().update(&book.id, &update, Some(&token)).await?;
    expect_status(&outcome, 200, what)?;
    expect_contract(&outcome, names::BOOK_PARTIAL_ENVELOPE, what)?;
    expect_message(&outcome, messages::BOOK_UPDATED, what)?;

    expect_stored(ctx, &book.merged(&update), &format!("fetch after {}", what)).await
}

fn update_availability(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move { check_partial_update(ctx, BookUpdate::new().available(false), "update availability").await })
}

fn update_multiple_fields(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let update = BookUpdate::new()
            .title("Suite Book (revised)")
            .author("Suite Editor")
            .published_year(2025);
        check_partial_update(ctx, update, "update multiple fields").await
    })
}

fn update_nonexistent(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let id = fixtures::nonexistent_book_id();
        let token = ctx.token().await?;
        let outcome = ctx
            .books()
            .update(&id, &BookUpdate::new().title("Nobody"), Some(&token))
            .await?;
        let what = "update nonexistent book";

        expect_error(
            &outcome,
            404,
            messages::NOT_FOUND,
            &messages::book_not_found(id.as_str()),
            what,
        )
    })
}

fn update_without_token(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let book = ctx.create_book(&fixtures::new_book()).await?;
        let outcome = ctx
            .books()
            .update(&book.id, &BookUpdate::new().available(false), None)
            .await?;

        expect_error(
            &outcome,
            401,
            messages::NO_TOKEN_ERROR,
            messages::NO_TOKEN_MESSAGE,
            "update without token",
        )?;
        expect_stored(ctx, &book, "fetch after rejected update").await
    })
}

fn delete_then_fetch(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let book = ctx.create_book(&fixtures::new_book()).await?;
        let token = ctx.token().await?;
        let what = "delete book";

        let deleted = ctx.books().delete(&book.id, Some(&token)).await?;
        expect_status(&deleted, 200, what)?;
        let body: DeleteResponse = expect_contract_as(&deleted, names::BOOK_DELETED, what)?;
        ctx.forget(&book.id);
        expect_eq(&body.message.as_str(), &messages::BOOK_DELETED, what)?;
        expect_eq(&body.deleted_id, &book.id, "deletedId")?;

        let fetched = ctx.books().get(&book.id).await?;
        expect_status(&fetched, 404, "fetch deleted book")?;
        expect_message_contains(&fetched, book.id.as_str(), "fetch deleted book")
    })
}

fn delete_nonexistent(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let id = fixtures::nonexistent_book_id();
        let token = ctx.token().await?;
        let outcome = ctx.books().delete(&id, Some(&token)).await?;
        let what = "delete nonexistent book";

        expect_error(
            &outcome,
            404,
            messages::NOT_FOUND,
            &messages::book_not_found(id.as_str()),
            what,
        )
    })
}

fn delete_without_token(ctx: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let book = ctx.create_book(&fixtures::new_book()).await?;
        let outcome = ctx.books().delete(&book.id, None).await?;

        expect_error(
            &outcome,
            401,
            messages::NO_TOKEN_ERROR,
            messages::NO_TOKEN_MESSAGE,
            "delete without token",
        )?;
        expect_stored(ctx, &book, "fetch after rejected delete").await
    })
}
