//! Status tables for the post-approval entities. Each entity carries its
//! allowed moves as data; `ensure_transition` is the single gate every
//! status-changing endpoint goes through.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEntity {
    Contract,
    Delivery,
    Invoice,
    StoreReceipt,
}

impl LifecycleEntity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Delivery => "delivery",
            Self::Invoice => "invoice",
            Self::StoreReceipt => "store receipt voucher",
        }
    }

    const fn transitions(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Contract => &[
                ("DRAFT", "ACTIVE"),
                ("DRAFT", "TERMINATED"),
                ("ACTIVE", "EXPIRED"),
                ("ACTIVE", "TERMINATED"),
            ],
            Self::Delivery => &[
                ("PENDING", "IN_TRANSIT"),
                ("PENDING", "DELIVERED"),
                ("IN_TRANSIT", "DELIVERED"),
                ("DELIVERED", "VERIFIED"),
                ("DELIVERED", "REJECTED"),
            ],
            Self::Invoice => &[
                ("DRAFT", "SUBMITTED"),
                ("SUBMITTED", "APPROVED"),
                ("SUBMITTED", "REJECTED"),
                ("APPROVED", "PAID"),
            ],
            Self::StoreReceipt => &[
                ("DRAFT", "SUBMITTED"),
                ("SUBMITTED", "APPROVED"),
                ("SUBMITTED", "REJECTED"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move {entity} from {from} to {to}")]
pub struct InvalidLifecycleTransition {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
}

pub fn ensure_transition(
    entity: LifecycleEntity,
    from: &str,
    to: &str,
) -> Result<(), InvalidLifecycleTransition> {
    if entity
        .transitions()
        .iter()
        .any(|(f, t)| *f == from && *t == to)
    {
        Ok(())
    } else {
        Err(InvalidLifecycleTransition {
            entity: entity.name(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_activation_and_termination() {
        assert!(ensure_transition(LifecycleEntity::Contract, "DRAFT", "ACTIVE").is_ok());
        assert!(ensure_transition(LifecycleEntity::Contract, "ACTIVE", "TERMINATED").is_ok());
        assert!(ensure_transition(LifecycleEntity::Contract, "EXPIRED", "ACTIVE").is_err());
    }

    #[test]
    fn delivery_verification_requires_delivered() {
        assert!(ensure_transition(LifecycleEntity::Delivery, "DELIVERED", "VERIFIED").is_ok());
        assert!(ensure_transition(LifecycleEntity::Delivery, "PENDING", "VERIFIED").is_err());
        assert!(ensure_transition(LifecycleEntity::Delivery, "VERIFIED", "REJECTED").is_err());
    }

    #[test]
    fn invoice_payment_follows_approval() {
        assert!(ensure_transition(LifecycleEntity::Invoice, "APPROVED", "PAID").is_ok());
        assert!(ensure_transition(LifecycleEntity::Invoice, "DRAFT", "PAID").is_err());
    }

    #[test]
    fn srv_rejection_only_from_submitted() {
        assert!(ensure_transition(LifecycleEntity::StoreReceipt, "SUBMITTED", "REJECTED").is_ok());
        assert!(ensure_transition(LifecycleEntity::StoreReceipt, "DRAFT", "REJECTED").is_err());
    }

    #[test]
    fn error_message_names_the_entity() {
        let err = ensure_transition(LifecycleEntity::Contract, "EXPIRED", "ACTIVE").unwrap_err();
        assert_eq!(err.to_string(), "cannot move contract from EXPIRED to ACTIVE");
    }
}
