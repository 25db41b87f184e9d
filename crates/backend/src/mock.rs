use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use slotwise_core::{
    errors::ScheduleResult,
    models::{
        appointment::{Appointment, AppointmentStatus},
        block::DateBlock,
        schedule::ScheduleSlot,
        session::Session,
    },
};
use uuid::Uuid;

use crate::models::AppointmentQuery;

// Mock backend for service and handler tests
mock! {
    pub Backend {}

    #[async_trait]
    impl crate::Backend for Backend {
        async fn fetch_schedule(&self, pro_id: Uuid) -> ScheduleResult<Vec<ScheduleSlot>>;

        async fn create_schedule(
            &self,
            pro_id: Uuid,
            slots: Vec<ScheduleSlot>,
        ) -> ScheduleResult<()>;

        async fn replace_schedule(
            &self,
            pro_id: Uuid,
            slots: Vec<ScheduleSlot>,
        ) -> ScheduleResult<()>;

        async fn list_blocks(&self, pro_id: Uuid) -> ScheduleResult<Vec<DateBlock>>;

        async fn create_block(&self, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()>;

        async fn delete_block(&self, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()>;

        async fn list_appointments(
            &self,
            query: AppointmentQuery,
        ) -> ScheduleResult<Vec<Appointment>>;

        async fn update_appointment_status(
            &self,
            id: Uuid,
            status: AppointmentStatus,
        ) -> ScheduleResult<()>;

        async fn list_sessions(&self, pro_id: Uuid) -> ScheduleResult<Vec<Session>>;
    }
}
