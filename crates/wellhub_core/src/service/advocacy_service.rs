//! Advocacy toolkit: scripts, hearing prep, insurance calls, appeals,
//! boundary phrases and access-needs cards.

use crate::analytics::round_percent;
use crate::model::advocacy::{
    AccessNeedsCard, AdvocacyScript, AppealLetter, AppealStatus, BoundaryCategory, BoundaryPhrase, HearingPrep,
    InsuranceCallLog, ScriptCategory, ScriptTone,
};
use crate::model::record::{Record, RecordId};
use crate::registry::collections::{BY_CATEGORY, BY_STATUS, BY_TONE};
use crate::service::tracker_service::newest_first;
use crate::service::{ServiceError, ServiceResult};
use crate::store::{Repository, StoreHandle};
use serde_json::json;

pub struct AdvocacyService<'h> {
    scripts: Repository<'h, AdvocacyScript>,
    hearings: Repository<'h, HearingPrep>,
    calls: Repository<'h, InsuranceCallLog>,
    appeals: Repository<'h, AppealLetter>,
    boundaries: Repository<'h, BoundaryPhrase>,
    cards: Repository<'h, AccessNeedsCard>,
}

impl<'h> AdvocacyService<'h> {
    pub fn new(handle: &'h StoreHandle) -> Self {
        Self {
            scripts: handle.repository(),
            hearings: handle.repository(),
            calls: handle.repository(),
            appeals: handle.repository(),
            boundaries: handle.repository(),
            cards: handle.repository(),
        }
    }

    pub fn add_script(&self, script: &AdvocacyScript) -> ServiceResult<Record<AdvocacyScript>> {
        Ok(self.scripts.add(script)?)
    }

    pub fn toggle_favorite(&self, id: &RecordId) -> ServiceResult<Record<AdvocacyScript>> {
        let current = self.scripts.get(id)?;
        let patch = json!({ "favorite": !current.fields.favorite });
        Ok(self.scripts.update(id, &patch)?)
    }

    pub fn scripts_by_tone(&self, tone: ScriptTone) -> ServiceResult<Vec<Record<AdvocacyScript>>> {
        Ok(self.scripts.get_all_by_index(BY_TONE, tone.as_str())?)
    }

    pub fn scripts_by_category(
        &self,
        category: ScriptCategory,
    ) -> ServiceResult<Vec<Record<AdvocacyScript>>> {
        Ok(self.scripts.get_all_by_index(BY_CATEGORY, category.as_str())?)
    }

    pub fn favorite_scripts(&self) -> ServiceResult<Vec<Record<AdvocacyScript>>> {
        let mut scripts = self.scripts.get_all()?;
        scripts.retain(|script| script.fields.favorite);
        Ok(scripts)
    }

    /// Stores a hearing notebook with its completion derived from the checklist.
    pub fn add_hearing_prep(&self, prep: &HearingPrep) -> ServiceResult<Record<HearingPrep>> {
        Ok(self.hearings.add(&with_completion(prep.clone()))?)
    }

    /// Replaces a hearing notebook, recomputing `completionPercentage`.
    pub fn update_hearing_prep(
        &self,
        id: &RecordId,
        prep: &HearingPrep,
    ) -> ServiceResult<Record<HearingPrep>> {
        Ok(self.hearings.update(id, &with_completion(prep.clone()))?)
    }

    /// Marks one checklist item and recomputes completion.
    pub fn set_checklist_item(
        &self,
        id: &RecordId,
        index: usize,
        completed: bool,
    ) -> ServiceResult<Record<HearingPrep>> {
        let mut current = self.hearings.get(id)?;
        let item = current.fields.checklist.get_mut(index).ok_or_else(|| {
            ServiceError::InvalidInput(format!("checklist item {index} does not exist"))
        })?;
        item.completed = completed;
        self.update_hearing_prep(id, &current.fields)
    }

    pub fn log_call(&self, call: &InsuranceCallLog) -> ServiceResult<Record<InsuranceCallLog>> {
        Ok(self.calls.add(call)?)
    }

    /// Call log, newest first.
    pub fn insurance_calls(&self) -> ServiceResult<Vec<Record<InsuranceCallLog>>> {
        let mut calls = self.calls.get_all()?;
        newest_first(&mut calls);
        Ok(calls)
    }

    /// Calls still awaiting a follow-up, newest first.
    pub fn pending_follow_ups(&self) -> ServiceResult<Vec<Record<InsuranceCallLog>>> {
        let mut calls = self.insurance_calls()?;
        calls.retain(|call| call.fields.follow_up_needed);
        Ok(calls)
    }

    pub fn add_appeal(&self, letter: &AppealLetter) -> ServiceResult<Record<AppealLetter>> {
        Ok(self.appeals.add(letter)?)
    }

    pub fn set_appeal_status(
        &self,
        id: &RecordId,
        status: AppealStatus,
    ) -> ServiceResult<Record<AppealLetter>> {
        Ok(self.appeals.update(id, &json!({ "status": status }))?)
    }

    pub fn appeals_by_status(&self, status: AppealStatus) -> ServiceResult<Vec<Record<AppealLetter>>> {
        Ok(self.appeals.get_all_by_index(BY_STATUS, status.as_str())?)
    }

    pub fn add_boundary(&self, phrase: &BoundaryPhrase) -> ServiceResult<Record<BoundaryPhrase>> {
        Ok(self.boundaries.add(phrase)?)
    }

    pub fn boundaries_by_category(
        &self,
        category: BoundaryCategory,
    ) -> ServiceResult<Vec<Record<BoundaryPhrase>>> {
        Ok(self.boundaries.get_all_by_index(BY_CATEGORY, category.as_str())?)
    }

    pub fn add_access_card(
        &self,
        card: &AccessNeedsCard,
    ) -> ServiceResult<Record<AccessNeedsCard>> {
        if card.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "access card needs a title".to_string(),
            ));
        }
        Ok(self.cards.add(card)?)
    }

    /// Cards in creation order.
    pub fn access_cards(&self) -> ServiceResult<Vec<Record<AccessNeedsCard>>> {
        Ok(self.cards.get_all()?)
    }
}

fn with_completion(mut prep: HearingPrep) -> HearingPrep {
    let completed = prep.checklist.iter().filter(|item| item.completed).count();
    prep.completion_percentage = round_percent(completed, prep.checklist.len());
    prep
}

#[cfg(test)]
mod tests {
    use super::with_completion;
    use crate::model::advocacy::{ChecklistItem, HearingPrep, HearingType};

    fn prep(done: &[bool]) -> HearingPrep {
        HearingPrep {
            hearing_date: None,
            hearing_type: HearingType::Alj,
            checklist: done
                .iter()
                .enumerate()
                .map(|(index, completed)| ChecklistItem {
                    item: format!("step {index}"),
                    completed: *completed,
                    notes: None,
                })
                .collect(),
            documents_needed: Vec::new(),
            key_points: Vec::new(),
            medical_evidence: Vec::new(),
            questions: Vec::new(),
            answers: Vec::new(),
            notes: String::new(),
            completion_percentage: 0,
        }
    }

    #[test]
    fn completion_is_rounded_share_of_checked_items() {
        assert_eq!(with_completion(prep(&[])).completion_percentage, 0);
        assert_eq!(with_completion(prep(&[true, false, false])).completion_percentage, 33);
        assert_eq!(with_completion(prep(&[true, true, false])).completion_percentage, 67);
        assert_eq!(with_completion(prep(&[true, true])).completion_percentage, 100);
    }
}
