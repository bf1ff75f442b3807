use async_trait::async_trait;
use chrono::{NaiveDateTime, Weekday};
use clinicslot_core::{
    errors::SlotResult,
    models::{
        booking::{Booking, BookingRequest, BookingStatus},
        schedule::{CreateScheduleRequest, RecurringSchedule},
    },
    store::{BookingLedger, ScheduleCatalog},
};
use mockall::mock;
use uuid::Uuid;

// Mock collaborators for testing
mock! {
    pub Catalog {}

    #[async_trait]
    impl ScheduleCatalog for Catalog {
        async fn active_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>>;

        async fn get_schedule(&self, id: Uuid) -> SlotResult<Option<RecurringSchedule>>;

        async fn list_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>>;

        async fn create_schedule(
            &self,
            provider_id: Uuid,
            request: &CreateScheduleRequest,
        ) -> SlotResult<RecurringSchedule>;

        async fn set_active(&self, id: Uuid, is_active: bool) -> SlotResult<RecurringSchedule>;

        async fn schedules_on(
            &self,
            provider_id: Uuid,
            weekday: Weekday,
        ) -> SlotResult<Vec<RecurringSchedule>>;
    }
}

mock! {
    pub Ledger {}

    #[async_trait]
    impl BookingLedger for Ledger {
        async fn bookings_between(
            &self,
            schedule_ids: &[Uuid],
            from: NaiveDateTime,
            until: NaiveDateTime,
        ) -> SlotResult<Vec<Booking>>;

        async fn reserve(&self, request: &BookingRequest) -> SlotResult<Booking>;

        async fn get_booking(&self, id: Uuid) -> SlotResult<Option<Booking>>;

        async fn provider_bookings(
            &self,
            provider_id: Uuid,
            from: NaiveDateTime,
            until: NaiveDateTime,
        ) -> SlotResult<Vec<Booking>>;

        async fn patient_bookings_after(
            &self,
            patient_id: Uuid,
            after: NaiveDateTime,
        ) -> SlotResult<Vec<Booking>>;

        async fn set_status(&self, id: Uuid, status: BookingStatus) -> SlotResult<Booking>;
    }
}
