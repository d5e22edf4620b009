/**
* filename : mod
* author : HAMA
* date: 2026. 10. 19.
* description: 스튜디오 도메인 모델
**/

pub mod booking;
pub mod class;
pub mod person;
pub mod sales;

pub use booking::{Booking, BookingStatus, WaitlistEntry};
pub use class::Class;
pub use person::{DropInClient, Lead, Member, MembershipPlan, PackClient, Person, PersonKind};
pub use sales::{
  LineItem,
  Product,
  ProductCategory,
  Staff,
  StaffRole,
  Transaction,
  TOTAL_TOLERANCE,
};
