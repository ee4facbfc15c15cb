//! Wiring of every service over one [`StoreSet`].

use std::sync::Arc;

use courtside_auth::jwt::{JwtDecoder, JwtEncoder};
use courtside_auth::password::{PasswordHasher, PasswordValidator};
use courtside_auth::rbac::RbacEnforcer;
use courtside_auth::session::{SecurityAlertSink, SessionCleanup, SessionManager};
use courtside_core::config::AppConfig;
use courtside_database::StoreSet;

use crate::availability::{AvailabilityEngine, SchedulingRules};
use crate::booking::BookingService;
use crate::class::{ClassService, EnrollmentService};
use crate::club::{ClubService, MembershipService, RenewalService};
use crate::payment::{PaymentGateway, PaymentService};
use crate::pista::PistaService;
use crate::sweep::SweepService;
use crate::user::{StoreUserLookup, UserLookup, UserService};

/// Every service the HTTP layer, the worker and the CLI need.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    pub config: Arc<AppConfig>,
    pub stores: StoreSet,

    pub jwt_encoder: Arc<JwtEncoder>,
    pub jwt_decoder: Arc<JwtDecoder>,
    pub password_hasher: Arc<PasswordHasher>,
    pub password_validator: Arc<PasswordValidator>,
    pub rbac: Arc<RbacEnforcer>,
    pub sessions: Arc<SessionManager>,
    pub session_cleanup: Arc<SessionCleanup>,

    pub engine: Arc<AvailabilityEngine>,
    pub users: Arc<UserService>,
    pub pistas: Arc<PistaService>,
    pub bookings: Arc<BookingService>,
    pub classes: Arc<ClassService>,
    pub enrollments: Arc<EnrollmentService>,
    pub clubs: Arc<ClubService>,
    pub memberships: Arc<MembershipService>,
    pub renewals: Arc<RenewalService>,
    pub payments: Arc<PaymentService>,
    pub sweep: Arc<SweepService>,
}

impl ServiceRegistry {
    pub fn build(
        config: &AppConfig,
        stores: StoreSet,
        gateway: Arc<dyn PaymentGateway>,
        alerts: Arc<dyn SecurityAlertSink>,
    ) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let rbac = Arc::new(RbacEnforcer::new());

        let sessions = Arc::new(SessionManager::new(
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
            Arc::clone(&stores.users),
            Arc::clone(&stores.sessions),
            alerts,
        ));
        let session_cleanup = Arc::new(SessionCleanup::new(
            Arc::clone(&stores.sessions),
            config.worker.session_retention_days,
        ));

        let rules = Arc::new(SchedulingRules::new(config.scheduling.clone()));
        let engine = Arc::new(AvailabilityEngine::new(
            Arc::clone(&stores.pistas),
            Arc::clone(&stores.allocations),
        ));
        let lookup: Arc<dyn UserLookup> =
            Arc::new(StoreUserLookup::new(Arc::clone(&stores.users)));

        let users = Arc::new(UserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&sessions),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&rbac),
        ));
        let pistas = Arc::new(PistaService::new(
            Arc::clone(&stores.pistas),
            Arc::clone(&rbac),
        ));
        let bookings = Arc::new(BookingService::new(
            Arc::clone(&stores.bookings),
            Arc::clone(&engine),
            Arc::clone(&rules),
            Arc::clone(&rbac),
        ));
        let classes = Arc::new(ClassService::new(
            Arc::clone(&stores.classes),
            Arc::clone(&stores.enrollments),
            Arc::clone(&engine),
            Arc::clone(&rules),
            Arc::clone(&rbac),
        ));
        let enrollments = Arc::new(EnrollmentService::new(
            Arc::clone(&stores.enrollments),
            Arc::clone(&stores.classes),
            Arc::clone(&lookup),
            Arc::clone(&rbac),
        ));
        let clubs = Arc::new(ClubService::new(
            Arc::clone(&stores.clubs),
            Arc::clone(&stores.memberships),
            Arc::clone(&rbac),
        ));
        let memberships = Arc::new(MembershipService::new(
            Arc::clone(&stores.memberships),
            Arc::clone(&stores.clubs),
            Arc::clone(&lookup),
            Arc::clone(&rbac),
        ));
        let payments = Arc::new(PaymentService::new(
            Arc::clone(&stores.payments),
            Arc::clone(&stores.bookings),
            Arc::clone(&stores.enrollments),
            Arc::clone(&stores.classes),
            gateway,
            config.payments.currency.clone(),
            Arc::clone(&rbac),
        ));
        let renewals = Arc::new(RenewalService::new(
            Arc::clone(&stores.memberships),
            Arc::clone(&stores.clubs),
            Arc::clone(&payments),
            Arc::clone(&rbac),
        ));
        let sweep = Arc::new(SweepService::new(
            Arc::clone(&stores.bookings),
            Arc::clone(&stores.classes),
            config.worker.auto_cancel_unpaid,
        ));

        Self {
            config: Arc::new(config.clone()),
            stores,
            jwt_encoder,
            jwt_decoder,
            password_hasher,
            password_validator,
            rbac,
            sessions,
            session_cleanup,
            engine,
            users,
            pistas,
            bookings,
            classes,
            enrollments,
            clubs,
            memberships,
            renewals,
            payments,
            sweep,
        }
    }
}
