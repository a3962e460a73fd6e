pub mod application;
pub mod payment;
pub mod property;
pub mod timestamp;
pub mod user;

pub use application::{Application, ApplicationDraft, ApplicationStatus, KycOutcome};
pub use payment::{AdminStats, CommissionStats, Payment, PaymentInit, DEFAULT_COMMISSION_RATE};
pub use property::{Property, PropertyDraft, PropertyFilter, PropertyStatus, PropertyType};
pub use user::{LoginRequest, Registration, Role, TokenPair, User, UserProfile};
