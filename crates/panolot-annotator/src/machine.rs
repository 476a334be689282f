//! The annotation transition machine.
//!
//! `Annotator::handle` advances the session for one input event and
//! returns the effects the engine must run. The machine never touches the
//! viewer or the network; everything it needs to read (zoom, live
//! settings, the loaded entity set) arrives in a [`Context`].

use panolot_core::{Entity, EntityId, LiveSettings, SphericalPoint, ValidationError};
use panolot_viewer::{MarkerId, MarkerPatch, ViewerEvent};

use crate::effects::Effect;
use crate::events::InputEvent;
use crate::projection;
use crate::reconcile::EditorKind;
use crate::session::{Draft, Mode, Session};

/// Read-only inputs for one transition.
pub struct Context<'a> {
    /// Current zoom percentage (0–100).
    pub zoom: f64,
    /// Live drawing settings.
    pub settings: &'a LiveSettings,
    /// Latest loaded entity set.
    pub entities: &'a [Entity],
}

impl Context<'_> {
    /// Resolves a snap marker id to the vertex it guards.
    fn snap_position(&self, id: MarkerId) -> Option<SphericalPoint> {
        let MarkerId::Snap { entity, vertex } = id else {
            return None;
        };
        self.entity(entity)
            .and_then(|e| e.snap_vertices().get(vertex).copied())
    }

    /// Resolves an entity-backed marker id to its entity.
    fn entity_for_marker(&self, id: MarkerId) -> Option<&Entity> {
        let entity_id = match id {
            MarkerId::Polygon(e)
            | MarkerId::Badge(e)
            | MarkerId::Road(e)
            | MarkerId::Poi(e)
            | MarkerId::Snap { entity: e, .. } => e,
            _ => return None,
        };
        self.entity(entity_id)
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }
}

/// The annotation state machine.
#[derive(Debug, Default)]
pub struct Annotator {
    session: Session,
}

impl Annotator {
    /// Creates an idle machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Advances the machine by one event, returning the effects to run.
    pub fn handle(&mut self, event: &InputEvent, ctx: &Context<'_>) -> Vec<Effect> {
        match event {
            InputEvent::Viewer(v) => self.handle_viewer(v, ctx),
            InputEvent::SetMode(mode) => self.set_mode(*mode),
            InputEvent::FinishDrawing => self.finish_drawing(),
            InputEvent::UndoLastPoint => self.undo_last_point(ctx),
            InputEvent::CancelDraft => self.cancel_draft(),
            InputEvent::CloseEditor => self.close_editor(),
            InputEvent::SubmitLot(attrs) => self.submit_lot(attrs.clone()),
            InputEvent::SubmitPoi(attrs) => self.submit_poi(attrs.clone()),
            InputEvent::ConfirmDelete => self.confirm_delete(),
            InputEvent::SettingsChanged => self.settings_changed(ctx),
        }
    }

    fn handle_viewer(&mut self, event: &ViewerEvent, ctx: &Context<'_>) -> Vec<Effect> {
        match event {
            ViewerEvent::Ready => vec![Effect::Reload],
            ViewerEvent::ZoomUpdated(_) => vec![Effect::RestyleAll],
            ViewerEvent::Click(pos) => self.on_click(*pos, ctx),
            ViewerEvent::MouseMove(pos) => self.on_mouse_move(*pos, ctx),
            ViewerEvent::SelectMarker(id) => self.on_select(*id, ctx),
            ViewerEvent::EnterMarker(id) => {
                if id.is_snap() {
                    self.session.active_snap = ctx.snap_position(*id);
                }
                Vec::new()
            }
            ViewerEvent::LeaveMarker(id) => {
                if id.is_snap() {
                    self.session.active_snap = None;
                }
                Vec::new()
            }
        }
    }

    /// Pointer click on the panorama itself.
    ///
    /// While a snap point is hovered the raw click is ignored: the
    /// viewer delivers the same gesture as a marker selection, which is
    /// the path that applies the magnetism.
    fn on_click(&mut self, pos: SphericalPoint, ctx: &Context<'_>) -> Vec<Effect> {
        match self.session.mode {
            None | Some(Mode::Delete) => Vec::new(),
            Some(Mode::Poi) => {
                self.session.draft.points = vec![pos];
                self.session.draft.has_temp_poi = true;
                self.session.editor = Some(EditorKind::Poi);
                vec![
                    Effect::AddMarker(projection::temp_poi_marker(pos, ctx.settings)),
                    Effect::OpenEditor(EditorKind::Poi),
                ]
            }
            Some(mode) => {
                if self.session.active_snap.is_some() {
                    return Vec::new();
                }
                self.append_point(mode, pos, ctx)
            }
        }
    }

    fn append_point(
        &mut self,
        mode: Mode,
        pos: SphericalPoint,
        ctx: &Context<'_>,
    ) -> Vec<Effect> {
        self.session.draft.points.push(pos);
        let count = self.session.draft.points.len();
        let mut effects = vec![
            Effect::AddMarker(projection::temp_point_marker(count, pos)),
            Effect::Status(format!("Points: {count} (Enter to finish)")),
        ];
        effects.extend(self.preview_effects(mode, ctx));
        effects
    }

    /// Rebuilds the incremental preview, dropping any stale elastic band.
    fn preview_effects(&self, mode: Mode, ctx: &Context<'_>) -> Vec<Effect> {
        let mut effects = vec![
            Effect::RemoveMarker(MarkerId::Preview),
            Effect::RemoveMarker(MarkerId::Elastic),
        ];
        if let Some(preview) = projection::preview_marker(
            mode,
            &self.session.draft.points,
            ctx.settings,
            ctx.zoom,
        ) {
            effects.push(Effect::AddMarker(preview));
        }
        effects
    }

    fn on_mouse_move(&mut self, pos: SphericalPoint, ctx: &Context<'_>) -> Vec<Effect> {
        let Some(mode) = self.session.mode.filter(Mode::is_shape_drawing) else {
            return Vec::new();
        };
        let Some(last) = self.session.draft.points.last().copied() else {
            return Vec::new();
        };
        let dest = self.session.active_snap.unwrap_or(pos);
        let mut effects = vec![Effect::RemoveMarker(MarkerId::Elastic)];
        if let Some(band) = projection::elastic_marker(mode, last, dest, ctx.settings, ctx.zoom) {
            effects.push(Effect::AddMarker(band));
        }
        effects
    }

    fn on_select(&mut self, id: MarkerId, ctx: &Context<'_>) -> Vec<Effect> {
        // Delete tool: any entity-backed marker asks for confirmation.
        if self.session.mode == Some(Mode::Delete) {
            let Some(entity) = ctx.entity_for_marker(id) else {
                return Vec::new();
            };
            self.session.pending_delete = Some(entity.id());
            self.session.editor = Some(EditorKind::ConfirmDelete);
            return vec![Effect::OpenEditor(EditorKind::ConfirmDelete)];
        }

        // Drawing tools: clicking a snap marker appends its exact vertex.
        if let Some(mode) = self.session.mode.filter(Mode::is_shape_drawing) {
            if id.is_snap() {
                if let Some(pos) = ctx.snap_position(id) {
                    return self.append_point(mode, pos, ctx);
                }
            }
            return Vec::new();
        }

        // Idle: selecting an interactive marker re-enters the matching
        // drawing state pre-populated for edit-in-place.
        if self.session.mode.is_none() {
            match ctx.entity_for_marker(id) {
                Some(Entity::Poi(poi)) => {
                    self.session.mode = Some(Mode::Poi);
                    self.session.draft = Draft {
                        points: vec![poi.anchor],
                        editing: Some(poi.id),
                        has_temp_poi: false,
                    };
                    self.session.editor = Some(EditorKind::Poi);
                    return vec![
                        Effect::SetSnapVisibility(false),
                        Effect::OpenEditor(EditorKind::Poi),
                    ];
                }
                Some(Entity::Lot(lot)) => {
                    self.session.draft = Draft {
                        points: lot.polygon.clone(),
                        editing: Some(lot.id),
                        has_temp_poi: false,
                    };
                    self.session.editor = Some(EditorKind::Lot);
                    return vec![Effect::OpenEditor(EditorKind::Lot)];
                }
                Some(Entity::Road(road)) => {
                    // Roads have no attribute editor; selecting one in
                    // idle offers deletion.
                    self.session.pending_delete = Some(road.id);
                    self.session.editor = Some(EditorKind::ConfirmDelete);
                    return vec![Effect::OpenEditor(EditorKind::ConfirmDelete)];
                }
                None => return Vec::new(),
            }
        }
        Vec::new()
    }

    /// Tool selection. Clears any leftover draft and its markers, then
    /// arms the new mode and the snap-point visibility it wants.
    fn set_mode(&mut self, mode: Option<Mode>) -> Vec<Effect> {
        let mut effects = self.sweep_temp_markers();
        self.session.draft = Draft::default();
        self.session.pending_delete = None;
        self.session.mode = mode;
        match mode {
            Some(m) if m.is_shape_drawing() => {
                effects.push(Effect::SetSnapVisibility(true));
                effects.push(Effect::Status("Click to begin".to_string()));
            }
            Some(Mode::Poi) => {
                effects.push(Effect::SetSnapVisibility(false));
                effects.push(Effect::Status("Click to place the point".to_string()));
            }
            Some(Mode::Delete) => {
                effects.push(Effect::SetSnapVisibility(false));
                effects.push(Effect::Status("Select an annotation to delete".to_string()));
            }
            _ => {
                self.session.active_snap = None;
                effects.push(Effect::SetSnapVisibility(false));
            }
        }
        effects
    }

    /// Removal effects for every temporary marker of the current draft.
    fn sweep_temp_markers(&self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = (1..=self.session.draft.points.len())
            .map(|i| Effect::RemoveMarker(MarkerId::TempPoint(i)))
            .collect();
        effects.push(Effect::RemoveMarker(MarkerId::Preview));
        effects.push(Effect::RemoveMarker(MarkerId::Elastic));
        if self.session.draft.has_temp_poi {
            effects.push(Effect::RemoveMarker(MarkerId::TempPoi));
        }
        effects
    }

    fn finish_drawing(&mut self) -> Vec<Effect> {
        let Some(mode) = self.session.mode.filter(Mode::is_shape_drawing) else {
            return Vec::new();
        };
        let count = self.session.draft.points.len();
        if count < 2 {
            return vec![Effect::Notify(
                ValidationError::TooFewPoints {
                    needed: 2,
                    got: count,
                }
                .to_string(),
            )];
        }
        match mode {
            Mode::Road => vec![Effect::CommitRoad {
                points: self.session.draft.points.clone(),
                editing: self.session.draft.editing,
            }],
            _ => {
                self.session.editor = Some(EditorKind::Lot);
                vec![Effect::OpenEditor(EditorKind::Lot)]
            }
        }
    }

    fn undo_last_point(&mut self, ctx: &Context<'_>) -> Vec<Effect> {
        let Some(mode) = self.session.mode.filter(Mode::is_shape_drawing) else {
            return Vec::new();
        };
        let count = self.session.draft.points.len();
        if count == 0 {
            return Vec::new();
        }
        self.session.draft.points.pop();
        let mut effects = vec![
            Effect::RemoveMarker(MarkerId::TempPoint(count)),
            Effect::Status(format!("Points: {}", count - 1)),
        ];
        effects.extend(self.preview_effects(mode, ctx));
        effects
    }

    /// Escape: unconditionally back to idle, discarding the draft. The
    /// reload restores the committed picture.
    fn cancel_draft(&mut self) -> Vec<Effect> {
        let mut effects = self.set_mode(None);
        self.session.editor = None;
        effects.push(Effect::CloseEditor);
        effects.push(Effect::Reload);
        effects
    }

    fn close_editor(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.session.draft.has_temp_poi {
            effects.push(Effect::RemoveMarker(MarkerId::TempPoi));
        }
        self.session.draft.has_temp_poi = false;
        self.session.draft.editing = None;
        self.session.pending_delete = None;
        self.session.editor = None;
        // Without an active drawing tool the captured points are stale.
        if !matches!(self.session.mode, Some(m) if m.is_shape_drawing()) {
            self.session.draft.points.clear();
        }
        effects.push(Effect::CloseEditor);
        effects
    }

    fn submit_lot(&mut self, attrs: crate::reconcile::LotAttributes) -> Vec<Effect> {
        let count = self.session.draft.points.len();
        if count < 2 {
            return vec![Effect::Notify(
                ValidationError::TooFewPoints {
                    needed: 2,
                    got: count,
                }
                .to_string(),
            )];
        }
        vec![Effect::CommitLot {
            attrs,
            points: self.session.draft.points.clone(),
            editing: self.session.draft.editing,
        }]
    }

    fn submit_poi(&mut self, attrs: crate::reconcile::PoiAttributes) -> Vec<Effect> {
        let Some(anchor) = self.session.draft.points.first().copied() else {
            return vec![Effect::Notify("No anchor captured for the point".to_string())];
        };
        vec![Effect::CommitPoi {
            attrs,
            anchor,
            editing: self.session.draft.editing,
        }]
    }

    fn confirm_delete(&mut self) -> Vec<Effect> {
        let Some(id) = self.session.pending_delete.take() else {
            return Vec::new();
        };
        self.session.editor = None;
        vec![Effect::CloseEditor, Effect::DeleteEntity(id)]
    }

    /// Live settings changed mid-session: restyle the preview and any
    /// provisional point-of-interest marker.
    fn settings_changed(&mut self, ctx: &Context<'_>) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(mode) = self.session.mode.filter(Mode::is_shape_drawing) {
            effects.extend(self.preview_effects(mode, ctx));
        }
        if self.session.draft.has_temp_poi {
            effects.push(Effect::UpdateMarker(
                MarkerId::TempPoi,
                MarkerPatch {
                    html: Some(projection::poi_html(
                        projection::NEW_POI_TITLE,
                        None,
                        ctx.settings.poi_height,
                        &ctx.settings.poi_background,
                        &ctx.settings.poi_text_color,
                        ctx.settings.poi_orientation,
                        ctx.settings.poi_size,
                    )),
                    ..MarkerPatch::default()
                },
            ));
        } else if let (Some(Mode::Poi), Some(editing)) =
            (self.session.mode, self.session.draft.editing)
        {
            if let Some(Entity::Poi(poi)) = ctx.entity(editing) {
                effects.push(Effect::UpdateMarker(
                    MarkerId::Poi(editing),
                    MarkerPatch {
                        html: Some(projection::poi_html(
                            &poi.title,
                            poi.description.as_deref(),
                            ctx.settings.poi_height,
                            &ctx.settings.poi_background,
                            &ctx.settings.poi_text_color,
                            ctx.settings.poi_orientation,
                            ctx.settings.poi_size,
                        )),
                        ..MarkerPatch::default()
                    },
                ));
            }
        }
        effects
    }
}
