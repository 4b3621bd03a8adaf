//! Integration tests for the ticket lifecycle and its ledger writes.

mod common;

use assert_matches::assert_matches;
use common::*;
use propdesk_core::error::CoreError;
use propdesk_core::roles::{Actor, Role};
use propdesk_core::status::{ConfirmationStatus, ExpenseStatus, PayerType, TicketStatus};
use propdesk_core::ticket::ConfirmationOutcome;
use propdesk_db::error::RepoError;
use propdesk_db::models::ticket::AssignTicket;
use propdesk_db::repositories::{ExpenseRepo, PayoutRepo, TicketRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_copies_landlord_from_property(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let t = ticket(&pool, prop.id, None).await;

    assert_eq!(t.landlord_id, LANDLORD);
    assert_eq!(t.requester_id, TENANT);
    assert_eq!(t.status().unwrap(), TicketStatus::Open);
    assert_eq!(t.confirmation_status().unwrap(), ConfirmationStatus::NotRequested);
    assert_eq!(t.payer_type().unwrap(), PayerType::Landlord);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_unknown_property(pool: PgPool) {
    let err = TicketRepo::create(
        &pool,
        &propdesk_db::models::ticket::CreateTicket {
            subject: "Broken window".to_string(),
            category: "glazing".to_string(),
            description: None,
            property_id: 9999,
            priority_id: None,
            payer_type_id: None,
            rent_cycle_id: None,
        },
        TENANT,
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::NotFound { entity: "Property", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cannot_bind_ticket_to_other_landlords_cycle(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let other_cycle = october_cycle(&pool, LANDLORD + 1).await;

    let err = TicketRepo::create(
        &pool,
        &propdesk_db::models::ticket::CreateTicket {
            subject: "Broken window".to_string(),
            category: "glazing".to_string(),
            description: None,
            property_id: prop.id,
            priority_id: None,
            payer_type_id: None,
            rent_cycle_id: Some(other_cycle.id),
        },
        TENANT,
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));
}

/// Confirm scenario: landlord payer, fixed at 5000, tenant confirms.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_scenario(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let cycle = october_cycle(&pool, LANDLORD).await;
    let (t, expense) = fixed_ticket(&pool, prop.id, Some(cycle.id), 5000).await;

    assert_eq!(t.status().unwrap(), TicketStatus::AwaitingConfirmation);
    assert_eq!(t.confirmation_status().unwrap(), ConfirmationStatus::Pending);
    assert_eq!(t.resolved_by, Some(STAFF));
    assert!(t.resolved_at.is_some());
    assert_eq!(expense.amount, money(5000));
    assert_eq!(expense.status().unwrap(), ExpenseStatus::Pending);
    assert_eq!(expense.ticket_id, Some(t.id));
    assert_eq!(expense.landlord_id, LANDLORD);
    assert_eq!(expense.expense_date, today());

    let confirmed =
        TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Confirmed, &tenant())
            .await
            .unwrap();

    assert_eq!(confirmed.ticket.status().unwrap(), TicketStatus::Resolved);
    assert_eq!(confirmed.ticket.confirmation_status().unwrap(), ConfirmationStatus::Confirmed);
    let approved = confirmed.approved_expense.unwrap();
    assert_eq!(approved.id, expense.id);
    assert_eq!(approved.status().unwrap(), ExpenseStatus::Approved);
}

/// Dispute scenario: the ticket reopens and the expense stays pending.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dispute_scenario(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, expense) = fixed_ticket(&pool, prop.id, None, 5000).await;

    let disputed =
        TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Disputed, &tenant())
            .await
            .unwrap();

    assert_eq!(disputed.ticket.status().unwrap(), TicketStatus::InProgress);
    assert_eq!(disputed.ticket.confirmation_status().unwrap(), ConfirmationStatus::Disputed);
    assert!(disputed.approved_expense.is_none());

    let stored = ExpenseRepo::find_by_id(&pool, expense.id).await.unwrap().unwrap();
    assert_eq!(stored.status().unwrap(), ExpenseStatus::Pending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refix_after_dispute_reprices_single_expense(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, expense) = fixed_ticket(&pool, prop.id, None, 5000).await;
    TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Disputed, &tenant())
        .await
        .unwrap();

    let refixed = TicketRepo::mark_fixed(&pool, t.id, &fixed(6500), STAFF, today())
        .await
        .unwrap();
    let repriced = refixed.expense.unwrap();
    assert_eq!(repriced.id, expense.id);
    assert_eq!(repriced.amount, money(6500));

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM landlord_expenses WHERE ticket_id = $1")
            .bind(t.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

/// A disputed landlord repair cannot be moved onto the company while its
/// pending expense is still in the ledger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payer_locked_while_expense_unsettled(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, expense) = fixed_ticket(&pool, prop.id, None, 5000).await;
    TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Disputed, &tenant())
        .await
        .unwrap();

    let to_company = AssignTicket {
        artisan_name: "Second Artisan".to_string(),
        artisan_phone: None,
        payer_type_id: PayerType::Company.id(),
        rent_cycle_id: None,
    };
    let err = TicketRepo::assign(&pool, t.id, &to_company).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::InvalidState(_)));

    let stored = TicketRepo::find_by_id(&pool, t.id).await.unwrap().unwrap();
    assert_eq!(stored.payer_type().unwrap(), PayerType::Landlord);
    let stored = ExpenseRepo::find_by_id(&pool, expense.id).await.unwrap().unwrap();
    assert_eq!(stored.status().unwrap(), ExpenseStatus::Pending);
    assert_eq!(stored.amount, money(5000));

    // Same payer, new artisan: fine.
    let reassigned = assign(&pool, t.id, PayerType::Landlord).await;
    assert_eq!(reassigned.status().unwrap(), TicketStatus::InProgress);
}

/// A company-paid ticket never approves a landlord expense, even one left
/// over from an earlier landlord-paid fix.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_confirmation_leaves_stale_expense_pending(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, expense) = fixed_ticket(&pool, prop.id, None, 5000).await;
    sqlx::query("UPDATE tickets SET payer_type_id = $2 WHERE id = $1")
        .bind(t.id)
        .bind(PayerType::Company.id())
        .execute(&pool)
        .await
        .unwrap();

    let confirmed =
        TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Confirmed, &tenant())
            .await
            .unwrap();
    assert_eq!(confirmed.ticket.status().unwrap(), TicketStatus::Resolved);
    assert!(confirmed.approved_expense.is_none());

    let stored = ExpenseRepo::find_by_id(&pool, expense.id).await.unwrap().unwrap();
    assert_eq!(stored.status().unwrap(), ExpenseStatus::Pending);
}

/// Two staff members marking the same ticket fixed at once: one wins, the
/// ticket keeps a single expense.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_mark_fixed_writes_one_expense(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let t = ticket(&pool, prop.id, None).await;
    assign(&pool, t.id, PayerType::Landlord).await;

    let first_fix = fixed(5000);
    let second_fix = fixed(7000);
    let (a, b) = tokio::join!(
        TicketRepo::mark_fixed(&pool, t.id, &first_fix, STAFF, today()),
        TicketRepo::mark_fixed(&pool, t.id, &second_fix, STAFF, today()),
    );

    let (won, lost) = match (a, b) {
        (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => (won, lost),
        (a, b) => panic!("expected exactly one fix to succeed, got {a:?} and {b:?}"),
    };
    assert_matches!(lost, RepoError::Core(CoreError::InvalidState(_)));

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM landlord_expenses WHERE ticket_id = $1")
            .bind(t.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
    let expense = won.expense.unwrap();
    assert_eq!(Some(expense.amount), won.ticket.cost_actual);
}

/// A ticket bound to a cycle that has since closed cannot be marked fixed
/// at the landlord's expense.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_fixed_rejected_once_bound_cycle_closed(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let cycle = october_cycle(&pool, LANDLORD).await;
    let t = ticket(&pool, prop.id, Some(cycle.id)).await;
    assign(&pool, t.id, PayerType::Landlord).await;
    PayoutRepo::generate_for_cycle(&pool, cycle.id, today()).await.unwrap();

    let err = TicketRepo::mark_fixed(&pool, t.id, &fixed(5000), STAFF, today())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Core(CoreError::AlreadyClosed { entity: "RentCycle", id }) if id == cycle.id
    );

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM landlord_expenses WHERE ticket_id = $1")
            .bind(t.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
    let stored = TicketRepo::find_by_id(&pool, t.id).await.unwrap().unwrap();
    assert_eq!(stored.status().unwrap(), TicketStatus::InProgress);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_company_payer_creates_no_expense(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let t = ticket(&pool, prop.id, None).await;
    assign(&pool, t.id, PayerType::Company).await;

    let marked = TicketRepo::mark_fixed(&pool, t.id, &fixed(0), STAFF, today())
        .await
        .unwrap();
    assert!(marked.expense.is_none());
    assert_eq!(marked.ticket.status().unwrap(), TicketStatus::AwaitingConfirmation);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_landlord_payer_requires_positive_cost(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let t = ticket(&pool, prop.id, None).await;

    let err = TicketRepo::mark_fixed(&pool, t.id, &fixed(0), STAFF, today())
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    // Nothing was written.
    let stored = TicketRepo::find_by_id(&pool, t.id).await.unwrap().unwrap();
    assert_eq!(stored.status().unwrap(), TicketStatus::Open);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_fixed_rejected_while_awaiting_confirmation(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, _) = fixed_ticket(&pool, prop.id, None, 5000).await;

    let err = TicketRepo::mark_fixed(&pool, t.id, &fixed(7000), STAFF, today())
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::InvalidState(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_requires_awaiting_confirmation(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let t = ticket(&pool, prop.id, None).await;

    let err = TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Confirmed, &tenant())
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::InvalidState(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_requester_or_admin_confirms(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, _) = fixed_ticket(&pool, prop.id, None, 5000).await;

    let stranger = Actor::new(TENANT + 1, Role::Tenant);
    let err = TicketRepo::confirm_resolution(
        &pool,
        t.id,
        ConfirmationOutcome::Confirmed,
        &stranger,
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Forbidden(_)));

    let staff = Actor::new(STAFF, Role::Staff);
    let err = TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Confirmed, &staff)
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Forbidden(_)));

    TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Confirmed, &admin())
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_close_only_after_resolution(pool: PgPool) {
    let prop = property(&pool, LANDLORD).await;
    let (t, _) = fixed_ticket(&pool, prop.id, None, 5000).await;

    let err = TicketRepo::close(&pool, t.id).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::InvalidState(_)));

    TicketRepo::confirm_resolution(&pool, t.id, ConfirmationOutcome::Confirmed, &tenant())
        .await
        .unwrap();
    let closed = TicketRepo::close(&pool, t.id).await.unwrap();
    assert_eq!(closed.status().unwrap(), TicketStatus::Closed);
}
