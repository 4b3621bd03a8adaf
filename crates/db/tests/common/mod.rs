//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use propdesk_core::roles::{Actor, Role};
use propdesk_core::status::PayerType;
use propdesk_core::types::{Date, DbId, Money};
use propdesk_db::models::expense::{CreateManualExpense, LandlordExpense};
use propdesk_db::models::lease::{CreateLease, Lease};
use propdesk_db::models::property::{CreateProperty, Property};
use propdesk_db::models::rent_cycle::{CreateRentCycle, RentCycle};
use propdesk_db::models::ticket::{AssignTicket, CreateTicket, MarkFixedRequest, Ticket};
use propdesk_db::repositories::{
    ExpenseRepo, LeaseRepo, PropertyRepo, RentCycleRepo, TicketRepo,
};
use sqlx::PgPool;

pub const LANDLORD: DbId = 500;
pub const TENANT: DbId = 700;
pub const STAFF: DbId = 20;
pub const ADMIN: DbId = 1;

pub fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd_opt(y, m, day).unwrap()
}

pub fn today() -> Date {
    d(2026, 10, 19)
}

pub fn money(n: i64) -> Money {
    Money::from(n)
}

pub fn admin() -> Actor {
    Actor::new(ADMIN, Role::Admin)
}

pub fn tenant() -> Actor {
    Actor::new(TENANT, Role::Tenant)
}

pub async fn property(pool: &PgPool, landlord_id: DbId) -> Property {
    PropertyRepo::create(
        pool,
        &CreateProperty {
            landlord_id,
            name: "12 Allen Avenue".to_string(),
            address: Some("Ikeja".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn lease(pool: &PgPool, property_id: DbId, rent: i64) -> Lease {
    LeaseRepo::create(
        pool,
        &CreateLease {
            tenant_id: TENANT,
            property_id,
            rent_amount: money(rent),
            billing_cycle_id: None,
            start_date: d(2026, 1, 1),
            end_date: None,
            service_charge: None,
            caution_deposit: None,
        },
    )
    .await
    .unwrap()
}

/// October 2026 cycle for the landlord.
pub async fn october_cycle(pool: &PgPool, landlord_id: DbId) -> RentCycle {
    RentCycleRepo::open(
        pool,
        &CreateRentCycle {
            landlord_id,
            start_date: d(2026, 10, 1),
            end_date: d(2026, 10, 31),
        },
    )
    .await
    .unwrap()
}

pub async fn ticket(pool: &PgPool, property_id: DbId, cycle_id: Option<DbId>) -> Ticket {
    TicketRepo::create(
        pool,
        &CreateTicket {
            subject: "Leaking kitchen tap".to_string(),
            category: "plumbing".to_string(),
            description: None,
            property_id,
            priority_id: None,
            payer_type_id: None,
            rent_cycle_id: cycle_id,
        },
        TENANT,
    )
    .await
    .unwrap()
}

pub async fn assign(pool: &PgPool, ticket_id: DbId, payer: PayerType) -> Ticket {
    TicketRepo::assign(
        pool,
        ticket_id,
        &AssignTicket {
            artisan_name: "Musa Plumbing".to_string(),
            artisan_phone: None,
            payer_type_id: payer.id(),
            rent_cycle_id: None,
        },
    )
    .await
    .unwrap()
}

pub fn fixed(cost: i64) -> MarkFixedRequest {
    MarkFixedRequest {
        resolution_note: "Replaced washer".to_string(),
        cost_actual: money(cost),
    }
}

/// A landlord-paid ticket marked fixed, returning the ticket and its
/// pending expense.
pub async fn fixed_ticket(
    pool: &PgPool,
    property_id: DbId,
    cycle_id: Option<DbId>,
    cost: i64,
) -> (Ticket, LandlordExpense) {
    let created = ticket(pool, property_id, cycle_id).await;
    assign(pool, created.id, PayerType::Landlord).await;
    let marked = TicketRepo::mark_fixed(pool, created.id, &fixed(cost), STAFF, today())
        .await
        .unwrap();
    (marked.ticket, marked.expense.unwrap())
}

pub async fn manual_expense(
    pool: &PgPool,
    property_id: DbId,
    amount: i64,
    date: Date,
) -> LandlordExpense {
    ExpenseRepo::create_manual(
        pool,
        &CreateManualExpense {
            property_id,
            amount: money(amount),
            description: "Gutter cleaning".to_string(),
            expense_date: Some(date),
        },
        today(),
    )
    .await
    .unwrap()
}
