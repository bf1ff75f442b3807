//! # ClinicSlot Core
//!
//! Domain types and the slot-allocation engine for recurring provider
//! schedules.
//!
//! A provider publishes one or more [`RecurringSchedule`]s: a time-of-day
//! window, a slot length and the weekdays it runs on. Patients reserve single
//! grid instants through a [`BookingLedger`]. The [`SlotAllocator`] expands
//! the schedules over a date range and subtracts the booked instants, giving
//! the ordered list of free slots.
//!
//! Storage lives behind the [`ScheduleCatalog`] and [`BookingLedger`] traits;
//! the `clinicslot-db` crate provides Postgres and in-memory implementations.
//!
//! [`RecurringSchedule`]: models::schedule::RecurringSchedule

pub mod allocator;
pub mod booking;
pub mod errors;
pub mod grid;
pub mod models;
pub mod store;
pub mod weekdays;

pub use allocator::SlotAllocator;
pub use booking::BookingService;
pub use store::{BookingLedger, ScheduleCatalog};
