//! The annotation engine: machine + viewer + store, wired together.
//!
//! The engine owns the transition machine, the live settings, the latest
//! entity snapshot and both collaborators. `dispatch` runs one input
//! event through the machine and executes the resulting effects in
//! order. Commit and reload failures never tear the session down; they
//! are queued as operator notices and the draft stays on screen.

use tracing::{debug, warn};

use panolot_api::ElementStore;
use panolot_core::{Entity, LiveSettings, ProjectId, Result};
use panolot_viewer::{MarkerId, PanoramaViewer, ViewerEvent};

use crate::bridge;
use crate::effects::Effect;
use crate::events::InputEvent;
use crate::machine::{Annotator, Context};
use crate::reconcile::{
    self, EditorKind, LotForm, PoiForm, RoadForm,
};
use crate::scale_sync;
use crate::session::{Mode, Session};

/// Drives the annotation layer for one project.
pub struct AnnotationEngine<V, S> {
    viewer: V,
    store: S,
    project_id: ProjectId,
    machine: Annotator,
    settings: LiveSettings,
    entities: Vec<Entity>,
    /// Bumped on project switch so a reload started against the old
    /// project discards its result instead of rendering stale markers.
    generation: u64,
    open_editor: Option<EditorKind>,
    status: Option<String>,
    notices: Vec<String>,
}

impl<V, S> AnnotationEngine<V, S>
where
    V: PanoramaViewer,
    S: ElementStore,
{
    /// Creates an engine over the given collaborators. Call
    /// [`reload`](Self::reload) (or deliver [`ViewerEvent::Ready`]) to
    /// populate the initial marker set.
    pub fn new(viewer: V, store: S, project_id: ProjectId) -> Self {
        Self {
            viewer,
            store,
            project_id,
            machine: Annotator::new(),
            settings: LiveSettings::default(),
            entities: Vec::new(),
            generation: 0,
            open_editor: None,
            status: None,
            notices: Vec::new(),
        }
    }

    /// The current drawing session.
    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    /// Latest loaded entity snapshot.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Current live settings.
    pub fn settings(&self) -> &LiveSettings {
        &self.settings
    }

    /// The editor surface currently open, if any.
    pub fn open_editor(&self) -> Option<EditorKind> {
        self.open_editor
    }

    /// Last status line emitted for the operator.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Drains the queued operator notices (validation and backend
    /// failures).
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Read access to the hosted viewer.
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Read access to the hosted store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the hosted viewer (zoom changes in tests).
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Switches to another project and reloads its annotations.
    pub async fn set_project(&mut self, project_id: ProjectId) -> Result<()> {
        self.generation += 1;
        self.project_id = project_id;
        let effects = self.transition(&InputEvent::SetMode(None));
        for effect in effects {
            self.run_marker_effect(effect);
        }
        self.reload().await
    }

    /// Runs one input event through the machine and executes the effects.
    pub async fn dispatch(&mut self, event: InputEvent) -> Result<()> {
        let effects = self.transition(&event);
        for effect in effects {
            self.run_effect(effect).await?;
        }
        Ok(())
    }

    /// Delivers a viewer event.
    pub async fn on_viewer_event(&mut self, event: ViewerEvent) -> Result<()> {
        self.dispatch(InputEvent::Viewer(event)).await
    }

    /// Selects a tool (`None` deactivates).
    pub async fn set_mode(&mut self, mode: Option<Mode>) -> Result<()> {
        self.dispatch(InputEvent::SetMode(mode)).await
    }

    /// Finishes the in-progress shape (Enter).
    pub async fn finish_drawing(&mut self) -> Result<()> {
        self.dispatch(InputEvent::FinishDrawing).await
    }

    /// Removes the last captured point (Ctrl+Z).
    pub async fn undo_last_point(&mut self) -> Result<()> {
        self.dispatch(InputEvent::UndoLastPoint).await
    }

    /// Abandons the current draft (Escape).
    pub async fn cancel_draft(&mut self) -> Result<()> {
        self.dispatch(InputEvent::CancelDraft).await
    }

    /// Closes the active editor without committing.
    pub async fn close_editor(&mut self) -> Result<()> {
        self.dispatch(InputEvent::CloseEditor).await
    }

    /// Confirms the pending deletion.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        self.dispatch(InputEvent::ConfirmDelete).await
    }

    /// Validates and submits the lot editor form. Form-level validation
    /// errors are returned for inline display; backend failures surface
    /// as notices.
    pub async fn submit_lot_editor(&mut self, form: &LotForm) -> Result<()> {
        let attrs = reconcile::lot_attributes(form)?;
        self.dispatch(InputEvent::SubmitLot(attrs)).await
    }

    /// Validates and submits the point-of-interest editor form.
    pub async fn submit_poi_editor(&mut self, form: &PoiForm) -> Result<()> {
        let attrs = reconcile::poi_attributes(form)?;
        self.dispatch(InputEvent::SubmitPoi(attrs)).await
    }

    /// Lot editor form pre-filled for the entity being edited, or seeded
    /// from the live settings for a new lot.
    pub fn lot_form(&self) -> LotForm {
        if let Some(Entity::Lot(lot)) = self.editing_entity() {
            return LotForm::prefill(lot);
        }
        LotForm {
            number: String::new(),
            price: String::new(),
            area: String::new(),
            status: panolot_core::LotStatus::Available,
            stroke_width: self.settings.lot_stroke_width,
        }
    }

    /// Point-of-interest editor form pre-filled for the entity being
    /// edited, or seeded from the live settings for a new point.
    pub fn poi_form(&self) -> PoiForm {
        if let Some(Entity::Poi(poi)) = self.editing_entity() {
            return PoiForm::prefill(poi);
        }
        PoiForm::from_settings(&self.settings)
    }

    /// Applies road panel edits and refreshes any live preview.
    pub async fn set_road_style(&mut self, form: &RoadForm) -> Result<()> {
        reconcile::apply_road_settings(&mut self.settings, form);
        self.dispatch(InputEvent::SettingsChanged).await
    }

    /// Applies the lot stroke slider and refreshes any live preview.
    pub async fn set_lot_stroke(&mut self, stroke_width: f64) -> Result<()> {
        reconcile::apply_lot_settings(&mut self.settings, stroke_width);
        self.dispatch(InputEvent::SettingsChanged).await
    }

    /// Applies point-of-interest panel edits and refreshes any
    /// provisional marker.
    pub async fn set_poi_style(&mut self, form: &PoiForm) -> Result<()> {
        reconcile::apply_poi_settings(&mut self.settings, form);
        self.dispatch(InputEvent::SettingsChanged).await
    }

    /// Reloads the project's annotations and re-renders everything.
    pub async fn reload(&mut self) -> Result<()> {
        let generation = self.generation;
        let records = self.store.list(self.project_id).await?;
        if self.generation != generation {
            debug!(project = self.project_id, "discarding superseded reload");
            return Ok(());
        }
        self.entities = bridge::decode_records(&records);
        bridge::render_entities(&mut self.viewer, &self.entities);
        Ok(())
    }

    fn editing_entity(&self) -> Option<&Entity> {
        let editing = self.machine.session().draft.editing?;
        self.entities.iter().find(|e| e.id() == editing)
    }

    fn transition(&mut self, event: &InputEvent) -> Vec<Effect> {
        let ctx = Context {
            zoom: self.viewer.zoom_level(),
            settings: &self.settings,
            entities: &self.entities,
        };
        self.machine.handle(event, &ctx)
    }

    async fn run_effect(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::CommitLot {
                attrs,
                points,
                editing,
            } => {
                let outcome = bridge::commit_lot(
                    &self.store,
                    self.project_id,
                    &self.entities,
                    &attrs,
                    &points,
                    editing,
                )
                .await;
                self.after_commit(outcome).await
            }
            Effect::CommitRoad { points, editing } => {
                let outcome = bridge::commit_road(
                    &self.store,
                    self.project_id,
                    &self.settings,
                    &points,
                    editing,
                )
                .await;
                self.after_commit(outcome).await
            }
            Effect::CommitPoi {
                attrs,
                anchor,
                editing,
            } => {
                let outcome =
                    bridge::commit_poi(&self.store, self.project_id, &attrs, anchor, editing)
                        .await;
                self.after_commit(outcome).await
            }
            Effect::DeleteEntity(id) => {
                // Delete mode stays armed for further deletions.
                match bridge::remove(&self.store, id).await {
                    Ok(()) => self.reload().await,
                    Err(e) => {
                        self.notify(e.to_string());
                        Ok(())
                    }
                }
            }
            Effect::Reload => self.reload().await,
            other => {
                self.run_marker_effect(other);
                Ok(())
            }
        }
    }

    /// On success: close the editor, reset to idle (sweeping every
    /// temporary marker) and reload. On failure: keep the draft and the
    /// editor so the operator can correct and retry.
    async fn after_commit(&mut self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.open_editor = None;
                // Mode reset emits marker and visibility ops only.
                let effects = self.transition(&InputEvent::SetMode(None));
                for effect in effects {
                    self.run_marker_effect(effect);
                }
                self.reload().await
            }
            Err(e) => {
                self.notify(e.to_string());
                Ok(())
            }
        }
    }

    /// Executes the synchronous, viewer/UI-facing effects.
    fn run_marker_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AddMarker(descriptor) => self.viewer.add_marker(descriptor),
            Effect::UpdateMarker(id, patch) => self.viewer.update_marker(id, patch),
            Effect::RemoveMarker(id) => self.viewer.remove_marker(id),
            Effect::SetSnapVisibility(visible) => self.set_snap_visibility(visible),
            Effect::OpenEditor(kind) => self.open_editor = Some(kind),
            Effect::CloseEditor => self.open_editor = None,
            Effect::Status(line) => {
                debug!(status = %line);
                self.status = Some(line);
            }
            Effect::Notify(message) => self.notify(message),
            Effect::RestyleAll => scale_sync::restyle_all(&mut self.viewer, &self.entities),
            // Async effects are handled in run_effect.
            Effect::CommitLot { .. }
            | Effect::CommitRoad { .. }
            | Effect::CommitPoi { .. }
            | Effect::DeleteEntity(_)
            | Effect::Reload => {}
        }
    }

    fn set_snap_visibility(&mut self, visible: bool) {
        let snaps: Vec<MarkerId> = self
            .viewer
            .markers()
            .into_iter()
            .map(|m| m.id)
            .filter(MarkerId::is_snap)
            .collect();
        for id in snaps {
            self.viewer.set_visible(id, visible);
        }
    }

    fn notify(&mut self, message: String) {
        warn!(notice = %message);
        self.notices.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panolot_api::MemoryElementStore;
    use panolot_core::{LotStatus, SphericalPoint};
    use panolot_viewer::MemoryViewer;

    fn engine() -> AnnotationEngine<MemoryViewer, MemoryElementStore> {
        let mut viewer = MemoryViewer::new();
        viewer.set_zoom(100.0);
        AnnotationEngine::new(viewer, MemoryElementStore::new(), 1)
    }

    async fn click(
        engine: &mut AnnotationEngine<MemoryViewer, MemoryElementStore>,
        yaw: f64,
        pitch: f64,
    ) {
        engine
            .on_viewer_event(ViewerEvent::Click(SphericalPoint::new(yaw, pitch)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ready_event_triggers_the_initial_load() {
        let mut e = engine();
        e.on_viewer_event(ViewerEvent::Ready).await.unwrap();
        assert_eq!(e.store().list_count(), 1);
        assert!(e.entities().is_empty());
    }

    #[tokio::test]
    async fn road_commit_resets_to_idle_and_rerenders() {
        let mut e = engine();
        e.set_mode(Some(Mode::Road)).await.unwrap();
        click(&mut e, 0.0, 0.0).await;
        click(&mut e, 0.2, 0.0).await;
        assert!(!e.viewer().temporary_ids().is_empty());

        e.finish_drawing().await.unwrap();
        assert_eq!(e.session().mode, None);
        assert!(e.viewer().temporary_ids().is_empty());
        assert_eq!(e.entities().len(), 1);
        assert!(e.viewer().marker(MarkerId::Road(1)).is_some());
    }

    #[tokio::test]
    async fn failed_commit_keeps_the_draft_and_queues_a_notice() {
        let mut e = engine();
        e.set_mode(Some(Mode::Road)).await.unwrap();
        click(&mut e, 0.0, 0.0).await;
        click(&mut e, 0.2, 0.0).await;

        e.store().fail_next(
            panolot_core::TransportError::Api {
                status: 500,
                message: "boom".to_string(),
            }
            .into(),
        );
        e.finish_drawing().await.unwrap();

        assert_eq!(e.session().mode, Some(Mode::Road));
        assert_eq!(e.session().draft.points.len(), 2);
        let notices = e.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("boom"));
    }

    #[tokio::test]
    async fn lot_form_validation_errors_come_back_inline() {
        let mut e = engine();
        e.set_mode(Some(Mode::Lot)).await.unwrap();
        click(&mut e, 0.0, 0.0).await;
        click(&mut e, 0.1, 0.0).await;
        e.finish_drawing().await.unwrap();
        assert_eq!(e.open_editor(), Some(EditorKind::Lot));

        let mut form = e.lot_form();
        form.price = "cheap".to_string();
        let err = e.submit_lot_editor(&form).await.unwrap_err();
        assert!(err.is_validation());
        // Editor stays open, nothing was persisted.
        assert_eq!(e.open_editor(), Some(EditorKind::Lot));
        assert_eq!(e.store().create_count(), 0);
    }

    #[tokio::test]
    async fn lot_submit_persists_and_renders_badge() {
        let mut e = engine();
        e.set_mode(Some(Mode::Lot)).await.unwrap();
        click(&mut e, 0.0, 0.0).await;
        click(&mut e, 0.1, 0.0).await;
        click(&mut e, 0.1, 0.1).await;
        e.finish_drawing().await.unwrap();

        let mut form = e.lot_form();
        form.number = "A1".to_string();
        form.price = "45.000".to_string();
        form.area = "500".to_string();
        form.status = LotStatus::Available;
        e.submit_lot_editor(&form).await.unwrap();

        assert_eq!(e.open_editor(), None);
        assert_eq!(e.entities().len(), 1);
        assert!(e.viewer().marker(MarkerId::Badge(1)).is_some());
    }

    #[tokio::test]
    async fn project_switch_discards_the_old_picture() {
        let mut e = engine();
        e.set_mode(Some(Mode::Road)).await.unwrap();
        click(&mut e, 0.0, 0.0).await;
        click(&mut e, 0.2, 0.0).await;
        e.finish_drawing().await.unwrap();
        assert_eq!(e.entities().len(), 1);

        e.set_project(2).await.unwrap();
        assert!(e.entities().is_empty());
        assert!(e.viewer().is_empty());
        assert_eq!(e.session().mode, None);
    }
}
