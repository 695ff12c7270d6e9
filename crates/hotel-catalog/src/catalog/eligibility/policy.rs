use super::super::domain::{
    EnrollmentId, HotelId, PurchasedTicket, TicketId, TicketStatus, TicketTypeId, UserId,
};

/// Outcome classes surfaced to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PaymentRequired,
    Unauthorized,
    /// Anything outside the eligibility taxonomy: store outages, broken data.
    Fatal,
}

impl FailureKind {
    pub const fn label(self) -> &'static str {
        match self {
            FailureKind::NotFound => "not_found",
            FailureKind::PaymentRequired => "payment_required",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Fatal => "fatal",
        }
    }
}

/// Reason a user was refused access to the hotel catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenial {
    #[error("no enrollment registered for user {0}")]
    EnrollmentNotFound(UserId),
    #[error("no ticket registered for enrollment {0}")]
    TicketNotFound(EnrollmentId),
    #[error("hotel {0} not found")]
    HotelNotFound(HotelId),
    #[error("ticket {ticket_id} is {status}; payment required")]
    PaymentRequired {
        ticket_id: TicketId,
        status: TicketStatus,
    },
    #[error("ticket type '{name}' does not include hotel access")]
    HotelNotIncluded {
        ticket_type_id: TicketTypeId,
        name: String,
        is_remote: bool,
        includes_hotel: bool,
    },
}

impl AccessDenial {
    pub const fn kind(&self) -> FailureKind {
        match self {
            AccessDenial::EnrollmentNotFound(_)
            | AccessDenial::TicketNotFound(_)
            | AccessDenial::HotelNotFound(_) => FailureKind::NotFound,
            AccessDenial::PaymentRequired { .. } => FailureKind::PaymentRequired,
            AccessDenial::HotelNotIncluded { .. } => FailureKind::Unauthorized,
        }
    }
}

/// Decide whether a purchased ticket grants hotel access.
///
/// Payment status is checked before the ticket type, so an unpaid ticket always reports
/// `PaymentRequired` whatever its category. Either disqualifying flag on its own denies access.
pub fn check_ticket(purchase: &PurchasedTicket) -> Result<(), AccessDenial> {
    let PurchasedTicket {
        ticket,
        ticket_type,
    } = purchase;

    if ticket.status != TicketStatus::Paid {
        return Err(AccessDenial::PaymentRequired {
            ticket_id: ticket.id,
            status: ticket.status,
        });
    }

    if ticket_type.is_remote || !ticket_type.includes_hotel {
        return Err(AccessDenial::HotelNotIncluded {
            ticket_type_id: ticket_type.id,
            name: ticket_type.name.clone(),
            is_remote: ticket_type.is_remote,
            includes_hotel: ticket_type.includes_hotel,
        });
    }

    Ok(())
}
