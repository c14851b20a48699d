//! Flare episode use-cases on top of the lifecycle hooks.

use crate::calendar::ClockTime;
use crate::model::flare::{FlareEvent, FlareStatus};
use crate::model::record::{Record, RecordId};
use crate::registry::collections::BY_STATUS;
use crate::service::tracker_service::newest_first;
use crate::service::ServiceResult;
use crate::store::{Repository, StoreHandle};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

/// Caller-supplied fields for a new flare.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewFlare {
    pub triggers: Vec<String>,
    pub symptoms: Vec<String>,
    pub severity: u8,
    pub treatments_tried: Vec<String>,
    pub notes: String,
    pub related_tags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndPatch {
    end_date: NaiveDate,
    end_time: ClockTime,
}

pub struct FlareService<'h> {
    flares: Repository<'h, FlareEvent>,
}

impl<'h> FlareService<'h> {
    pub fn new(handle: &'h StoreHandle) -> Self {
        Self {
            flares: handle.repository(),
        }
    }

    /// Records a new active flare.
    pub fn start(
        &self,
        start_date: NaiveDate,
        start_time: ClockTime,
        fields: NewFlare,
    ) -> ServiceResult<Record<FlareEvent>> {
        let flare = FlareEvent {
            start_date,
            start_time,
            end_date: None,
            end_time: None,
            status: FlareStatus::Active,
            triggers: fields.triggers,
            symptoms: fields.symptoms,
            severity: fields.severity,
            treatments_tried: fields.treatments_tried,
            notes: fields.notes,
            related_tags: fields.related_tags,
            duration: None,
        };
        let record = self.flares.add(&flare)?;
        info!("event=flare_start module=flare status=ok id={}", record.id);
        Ok(record)
    }

    /// Resolves a flare; the store derives `duration` and `status`.
    pub fn end(
        &self,
        id: &RecordId,
        end_date: NaiveDate,
        end_time: ClockTime,
    ) -> ServiceResult<Record<FlareEvent>> {
        let record = self.flares.update(id, &EndPatch { end_date, end_time })?;
        info!("event=flare_end module=flare status=ok id={}", record.id);
        Ok(record)
    }

    /// Flares still active, in insertion order.
    pub fn active(&self) -> ServiceResult<Vec<Record<FlareEvent>>> {
        Ok(self
            .flares
            .get_all_by_index(BY_STATUS, FlareStatus::Active.as_str())?)
    }

    /// Every flare, newest start first.
    pub fn history(&self) -> ServiceResult<Vec<Record<FlareEvent>>> {
        let mut flares = self.flares.get_all()?;
        newest_first(&mut flares);
        Ok(flares)
    }

    pub fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        Ok(self.flares.delete(id)?)
    }
}
