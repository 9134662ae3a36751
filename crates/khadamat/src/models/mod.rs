//! Wire DTOs shared by the API client and the client-side stores.

pub mod account;
pub mod commerce;
pub mod maid;
pub mod office;
pub mod place;

pub use account::{
    AdminStats, AuthTokens, Credentials, DevicePlatform, LoginResponse, Registration, User,
    UserId, UserIntent, UserRole,
};
pub use commerce::{
    PaymentConfirmation, PaymentIntent, PaymentMethod, PaymentStatus, Quotation, QuotationId,
    QuotationResponse, QuotationStatus, Subscription, SubscriptionPlan, SubscriptionStatus,
};
pub use maid::{
    Availability, EmploymentType, FavoriteToggle, MaidContact, MaidDraft, MaidFilters, MaidId,
    MaidProfile, MaidSummary, MaritalStatus, Page,
};
pub use office::{Office, OfficeDraft, OfficeId, OfficeStatus};
pub use place::{Coordinates, Place};
