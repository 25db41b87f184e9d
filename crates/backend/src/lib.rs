//! # Slotwise Backend
//!
//! Access to the REST backend that owns schedules, date blocks, appointments
//! and sessions. [`Backend`] is the seam the service layer depends on;
//! [`BackendClient`] implements it over HTTP and [`mock::MockBackend`] stands
//! in for it in tests.

pub mod client;
pub mod mock;
pub mod models;
pub mod repositories;

use async_trait::async_trait;
use chrono::NaiveDate;
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

pub use client::BackendClient;
use models::AppointmentQuery;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_schedule(&self, pro_id: Uuid) -> ScheduleResult<Vec<ScheduleSlot>>;

    async fn create_schedule(&self, pro_id: Uuid, slots: Vec<ScheduleSlot>) -> ScheduleResult<()>;

    async fn replace_schedule(&self, pro_id: Uuid, slots: Vec<ScheduleSlot>)
    -> ScheduleResult<()>;

    async fn list_blocks(&self, pro_id: Uuid) -> ScheduleResult<Vec<DateBlock>>;

    async fn create_block(&self, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()>;

    async fn delete_block(&self, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()>;

    async fn list_appointments(&self, query: AppointmentQuery)
    -> ScheduleResult<Vec<Appointment>>;

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> ScheduleResult<()>;

    async fn list_sessions(&self, pro_id: Uuid) -> ScheduleResult<Vec<Session>>;
}

#[async_trait]
impl Backend for BackendClient {
    async fn fetch_schedule(&self, pro_id: Uuid) -> ScheduleResult<Vec<ScheduleSlot>> {
        repositories::schedule::fetch_schedule(self, pro_id).await
    }

    async fn create_schedule(&self, pro_id: Uuid, slots: Vec<ScheduleSlot>) -> ScheduleResult<()> {
        repositories::schedule::create_schedule(self, pro_id, &slots).await
    }

    async fn replace_schedule(
        &self,
        pro_id: Uuid,
        slots: Vec<ScheduleSlot>,
    ) -> ScheduleResult<()> {
        repositories::schedule::replace_schedule(self, pro_id, &slots).await
    }

    async fn list_blocks(&self, pro_id: Uuid) -> ScheduleResult<Vec<DateBlock>> {
        repositories::block::list_blocks(self, pro_id).await
    }

    async fn create_block(&self, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()> {
        repositories::block::create_block(self, pro_id, date).await
    }

    async fn delete_block(&self, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()> {
        repositories::block::delete_block(self, pro_id, date).await
    }

    async fn list_appointments(
        &self,
        query: AppointmentQuery,
    ) -> ScheduleResult<Vec<Appointment>> {
        repositories::appointment::list_appointments(self, &query).await
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> ScheduleResult<()> {
        repositories::appointment::update_appointment_status(self, id, status).await
    }

    async fn list_sessions(&self, pro_id: Uuid) -> ScheduleResult<Vec<Session>> {
        repositories::session::list_sessions(self, pro_id).await
    }
}
