pub mod employee;
pub mod leave_application;
pub mod leave_card;
pub mod leave_entitlement;
