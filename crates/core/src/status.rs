//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table, and its label matches the seeded
//! `name` column. Rows carry the raw `StatusId`; convert with `TryFrom`
//! before matching so every transition point is exhaustive.

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in discriminant order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the seeded lookup-table name.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = CoreError;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                match id {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {} id {other}",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

define_status_enum! {
    /// Maintenance ticket lifecycle status.
    TicketStatus {
        Open = 1 => "open",
        InProgress = 2 => "in_progress",
        AwaitingConfirmation = 3 => "awaiting_confirmation",
        Resolved = 4 => "resolved",
        Closed = 5 => "closed",
    }
}

define_status_enum! {
    /// Ticket urgency.
    TicketPriority {
        Low = 1 => "low",
        Medium = 2 => "medium",
        High = 3 => "high",
        Urgent = 4 => "urgent",
    }
}

define_status_enum! {
    /// Who bears the cost of a repair.
    PayerType {
        Landlord = 1 => "landlord",
        Company = 2 => "company",
    }
}

define_status_enum! {
    /// Tenant's verdict on a repair marked as fixed.
    ConfirmationStatus {
        /// No repair has been reported yet.
        NotRequested = 1 => "none",
        Pending = 2 => "pending",
        Confirmed = 3 => "confirmed",
        Disputed = 4 => "disputed",
    }
}

define_status_enum! {
    /// Landlord expense settlement status.
    ExpenseStatus {
        Pending = 1 => "pending",
        Approved = 2 => "approved",
        Deducted = 3 => "deducted",
    }
}

define_status_enum! {
    /// Landlord billing window status.
    RentCycleStatus {
        Open = 1 => "open",
        Closed = 2 => "closed",
    }
}

define_status_enum! {
    /// Payout record status.
    PayoutStatus {
        /// Net is zero or positive and awaits disbursement.
        Pending = 1 => "pending",
        Disbursed = 2 => "disbursed",
        /// Net was negative; nothing is owed and the deficit moved to the ledger.
        DeficitCarriedForward = 3 => "deficit_carried_forward",
    }
}

define_status_enum! {
    /// How often rent falls due on a lease.
    BillingCycle {
        Monthly = 1 => "monthly",
        Quarterly = 2 => "quarterly",
        Yearly = 3 => "yearly",
    }
}

define_status_enum! {
    /// Upstream rent payment verification status.
    PaymentStatus {
        Pending = 1 => "pending",
        Successful = 2 => "successful",
        Failed = 3 => "failed",
    }
}
