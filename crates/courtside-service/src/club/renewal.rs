//! Monthly membership renewal.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_core::error::{AppError, ErrorKind, codes};
use courtside_core::result::AppResult;
use courtside_database::store::{ClubStore, MembershipStore};
use courtside_entity::club::{BillingStatus, ClubMembership, MembershipStatus};
use courtside_entity::payment::PaymentTarget;

use super::membership::one_month_after;
use crate::context::RequestContext;
use crate::payment::PaymentService;

/// Charges the club fee for an active membership and advances its billing
/// date. A declined charge leaves the membership `PAST_DUE`.
#[derive(Debug, Clone)]
pub struct RenewalService {
    memberships: Arc<dyn MembershipStore>,
    clubs: Arc<dyn ClubStore>,
    payments: Arc<PaymentService>,
    rbac: Arc<RbacEnforcer>,
}

impl RenewalService {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        clubs: Arc<dyn ClubStore>,
        payments: Arc<PaymentService>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            memberships,
            clubs,
            payments,
            rbac,
        }
    }

    pub async fn renew(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ClubMembership> {
        let membership = self
            .memberships
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Membership {id} not found")))?;
        if membership.user_id != ctx.user_id {
            self.rbac.require(ctx.role, Capability::ManagePayments)?;
        }
        if membership.status != MembershipStatus::Active {
            return Err(AppError::conflict("Only active memberships can be renewed")
                .with_code(codes::INVALID_STATE));
        }
        let club = self
            .clubs
            .find_by_id(membership.club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club not found"))?;

        let base = membership.next_billing_date.unwrap_or(ctx.request_time);
        let next = one_month_after(base)?;

        if club.monthly_fee_cents == 0 {
            return self
                .memberships
                .record_billing(id, BillingStatus::UpToDate, Some(next), None)
                .await;
        }

        let charged = self
            .payments
            .charge(
                membership.user_id,
                club.monthly_fee_cents,
                PaymentTarget::Membership(id),
                &format!("{} monthly fee", club.name),
            )
            .await;

        match charged {
            Ok(payment) => {
                let renewed = self
                    .memberships
                    .record_billing(id, BillingStatus::UpToDate, Some(next), Some(payment.id))
                    .await?;
                info!(membership_id = %id, payment_id = %payment.id, next_billing = %next, "Membership renewed");
                Ok(renewed)
            }
            Err(e) if e.kind == ErrorKind::PaymentDeclined => {
                self.memberships
                    .record_billing(id, BillingStatus::PastDue, None, None)
                    .await?;
                warn!(membership_id = %id, "Membership renewal declined, marked past due");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courtside_entity::club::NewClub;
    use courtside_entity::user::UserRole;

    use crate::payment::MockGateway;
    use crate::testing::Fixture;

    struct Setup {
        renewals: RenewalService,
        gateway: Arc<MockGateway>,
        member: RequestContext,
        membership: ClubMembership,
    }

    async fn setup(f: &Fixture) -> Setup {
        let gateway = Arc::new(MockGateway::new(false));
        let payments = Arc::new(PaymentService::new(
            f.stores.payments.clone(),
            f.stores.bookings.clone(),
            f.stores.enrollments.clone(),
            f.stores.classes.clone(),
            gateway.clone(),
            "EUR",
            f.rbac.clone(),
        ));
        let owner = f.actor(UserRole::Club).await;
        let member = f.actor(UserRole::Client).await;
        let club = f
            .stores
            .clubs
            .create(&NewClub {
                slug: "lobbers".into(),
                owner_id: owner.user_id,
                name: "Lobbers".into(),
                description: None,
                max_members: 10,
                monthly_fee_cents: 3500,
            })
            .await
            .unwrap();
        let membership = f
            .stores
            .memberships
            .add(club.id, member.user_id, Utc::now())
            .await
            .unwrap();
        Setup {
            renewals: RenewalService::new(
                f.stores.memberships.clone(),
                f.stores.clubs.clone(),
                payments,
                f.rbac.clone(),
            ),
            gateway,
            member,
            membership,
        }
    }

    #[tokio::test]
    async fn successful_renewal_advances_billing() {
        let f = Fixture::new();
        let s = setup(&f).await;
        let due = s.membership.next_billing_date.unwrap();

        let renewed = s.renewals.renew(&s.member, s.membership.id).await.unwrap();
        assert_eq!(renewed.billing_status, BillingStatus::UpToDate);
        assert_eq!(renewed.next_billing_date, Some(one_month_after(due).unwrap()));
        let payment_id = renewed.last_payment_id.unwrap();
        let payment = f.stores.payments.find_by_id(payment_id).await.unwrap().unwrap();
        assert_eq!(payment.amount_cents, 3500);
        assert_eq!(payment.target, PaymentTarget::Membership(s.membership.id));
    }

    #[tokio::test]
    async fn declined_renewal_marks_past_due() {
        let f = Fixture::new();
        let s = setup(&f).await;
        s.gateway.set_decline(true);

        let err = s.renewals.renew(&s.member, s.membership.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PaymentDeclined);
        let m = f
            .stores
            .memberships
            .find_by_id(s.membership.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.billing_status, BillingStatus::PastDue);
        assert_eq!(m.next_billing_date, s.membership.next_billing_date);
    }

    #[tokio::test]
    async fn inactive_membership_cannot_renew() {
        let f = Fixture::new();
        let s = setup(&f).await;
        f.stores
            .memberships
            .set_status(s.membership.id, MembershipStatus::Suspended, None)
            .await
            .unwrap();
        let err = s.renewals.renew(&s.member, s.membership.id).await.unwrap_err();
        assert!(err.has_code(codes::INVALID_STATE));
    }
}
