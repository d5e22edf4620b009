/**
* filename : mod
* author : HAMA
* date: 2026. 10. 19.
* description: 예약 엔진 및 출석/크레딧 차감
**/

pub mod check_in;
pub mod engine;

pub use check_in::{week_start, CheckIn, CreditDebit};
pub use engine::{BookingEngine, Cancellation, Promotion};
